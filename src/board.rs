//! Mutable game position: units on territories and supply-center ownership.

use serde::Serialize;
use thiserror::Error;

use crate::map::{
    Coast, Nation, NationSet, Terrain, Territory, ALL_NATIONS, ALL_TERRITORIES, TERRITORY_COUNT,
};

/// Army or fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnitKind {
    Army,
    Fleet,
}

impl UnitKind {
    pub fn letter(self) -> char {
        match self {
            UnitKind::Army => 'A',
            UnitKind::Fleet => 'F',
        }
    }
}

/// A unit on the board. `coast` is set iff the unit is a fleet occupying a
/// bicoastal territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub kind: UnitKind,
    pub nation: Nation,
    pub coast: Coast,
}

impl Unit {
    pub fn army(nation: Nation) -> Unit {
        Unit { kind: UnitKind::Army, nation, coast: Coast::None }
    }

    pub fn fleet(nation: Nation) -> Unit {
        Unit { kind: UnitKind::Fleet, nation, coast: Coast::None }
    }

    pub fn fleet_on(nation: Nation, coast: Coast) -> Unit {
        Unit { kind: UnitKind::Fleet, nation, coast }
    }

    pub fn is_fleet(self) -> bool {
        self.kind == UnitKind::Fleet
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TerritoryState {
    occupier: Option<Unit>,
    owner: Option<Nation>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("{} is already occupied", .0.name())]
    Occupied(Territory),
    #[error("a {kind:?} cannot occupy {}", .territory.name())]
    TerrainMismatch { territory: Territory, kind: UnitKind },
    #[error("{} requires a named coast", .0.name())]
    CoastRequired(Territory),
    #[error("invalid coast for {}", .0.name())]
    BadCoast(Territory),
}

/// Units and ownership over the 75 territories.
#[derive(Debug, Clone)]
pub struct Board {
    slots: [TerritoryState; TERRITORY_COUNT],
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Board {
    pub fn empty() -> Board {
        Board { slots: [TerritoryState::default(); TERRITORY_COUNT] }
    }

    /// The standard 1901 opening: 22 units, every home center owned by its
    /// power, neutral centers unowned.
    pub fn standard_opening() -> Board {
        use Nation::*;
        use Territory::*;

        let mut board = Board::empty();
        for t in ALL_TERRITORIES {
            if let Some(nation) = t.home_nation() {
                board.slots[t.index()].owner = Some(nation);
            }
        }

        let openings: [(Territory, Unit); 22] = [
            (Vie, Unit::army(Austria)),
            (Bud, Unit::army(Austria)),
            (Tri, Unit::fleet(Austria)),
            (Lon, Unit::fleet(England)),
            (Edi, Unit::fleet(England)),
            (Lvp, Unit::army(England)),
            (Bre, Unit::fleet(France)),
            (Par, Unit::army(France)),
            (Mar, Unit::army(France)),
            (Kie, Unit::fleet(Germany)),
            (Ber, Unit::army(Germany)),
            (Mun, Unit::army(Germany)),
            (Nap, Unit::fleet(Italy)),
            (Rom, Unit::army(Italy)),
            (Ven, Unit::army(Italy)),
            (Stp, Unit::fleet_on(Russia, Coast::South)),
            (Mos, Unit::army(Russia)),
            (War, Unit::army(Russia)),
            (Sev, Unit::fleet(Russia)),
            (Ank, Unit::fleet(Turkey)),
            (Con, Unit::army(Turkey)),
            (Smy, Unit::army(Turkey)),
        ];
        for (t, unit) in openings {
            board.slots[t.index()].occupier = Some(unit);
        }
        board
    }

    /// Place a unit, validating terrain, coast arity and vacancy.
    pub fn place(&mut self, t: Territory, unit: Unit) -> Result<(), BoardError> {
        match (unit.kind, t.terrain()) {
            (UnitKind::Army, Terrain::Sea) | (UnitKind::Fleet, Terrain::Inland) => {
                return Err(BoardError::TerrainMismatch { territory: t, kind: unit.kind });
            }
            _ => {}
        }
        if unit.is_fleet() && t.is_bicoastal() {
            if unit.coast == Coast::None {
                return Err(BoardError::CoastRequired(t));
            }
            if !t.coasts().contains(&unit.coast) {
                return Err(BoardError::BadCoast(t));
            }
        } else if unit.coast != Coast::None {
            return Err(BoardError::BadCoast(t));
        }
        if self.slots[t.index()].occupier.is_some() {
            return Err(BoardError::Occupied(t));
        }
        self.slots[t.index()].occupier = Some(unit);
        Ok(())
    }

    /// Place without validation. Callers guarantee legality (used when
    /// applying adjudicated results, which are valid by construction).
    pub(crate) fn put(&mut self, t: Territory, unit: Unit) {
        self.slots[t.index()].occupier = Some(unit);
    }

    pub fn remove(&mut self, t: Territory) -> Option<Unit> {
        self.slots[t.index()].occupier.take()
    }

    pub fn occupier(&self, t: Territory) -> Option<Unit> {
        self.slots[t.index()].occupier
    }

    pub fn owner(&self, t: Territory) -> Option<Nation> {
        self.slots[t.index()].owner
    }

    pub fn set_owner(&mut self, t: Territory, owner: Option<Nation>) {
        self.slots[t.index()].owner = owner;
    }

    /// Supply centers change hands to whoever occupies them. Vacant centers
    /// keep their owner.
    pub fn capture_centers(&mut self) {
        for t in ALL_TERRITORIES {
            if !t.is_supply_center() {
                continue;
            }
            if let Some(unit) = self.slots[t.index()].occupier {
                self.slots[t.index()].owner = Some(unit.nation);
            }
        }
    }

    pub fn unit_count(&self, nation: Nation) -> usize {
        self.slots
            .iter()
            .filter(|s| s.occupier.is_some_and(|u| u.nation == nation))
            .count()
    }

    pub fn center_count(&self, nation: Nation) -> usize {
        ALL_TERRITORIES
            .iter()
            .filter(|t| t.is_supply_center() && self.owner(**t) == Some(nation))
            .count()
    }

    /// All units of a nation in territory order.
    pub fn units_of(&self, nation: Nation) -> Vec<(Territory, Unit)> {
        ALL_TERRITORIES
            .iter()
            .filter_map(|t| {
                self.occupier(*t)
                    .filter(|u| u.nation == nation)
                    .map(|u| (*t, u))
            })
            .collect()
    }

    pub fn nations_on_board(&self) -> NationSet {
        self.slots
            .iter()
            .filter_map(|s| s.occupier.map(|u| u.nation))
            .collect()
    }

    /// Home centers of `nation` that are owned by it and vacant, i.e. the
    /// places it may build.
    pub fn vacant_home_centers(&self, nation: Nation) -> Vec<Territory> {
        ALL_TERRITORIES
            .iter()
            .copied()
            .filter(|t| {
                t.home_nation() == Some(nation)
                    && self.owner(*t) == Some(nation)
                    && self.occupier(*t).is_none()
            })
            .collect()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut units = Vec::new();
        let mut centers = Vec::new();
        for t in ALL_TERRITORIES {
            if let Some(u) = self.occupier(t) {
                units.push(UnitEntry {
                    territory: t.abbr(),
                    kind: u.kind,
                    nation: u.nation,
                    coast: (u.coast != Coast::None).then(|| u.coast.abbr()),
                });
            }
            if let Some(owner) = self.owner(t) {
                if t.is_supply_center() {
                    centers.push(CenterEntry { territory: t.abbr(), owner });
                }
            }
        }
        BoardSnapshot { units, centers }
    }
}

/// Serializable view of the position, consumed by the display layer.
#[derive(Debug, Serialize)]
pub struct BoardSnapshot {
    pub units: Vec<UnitEntry>,
    pub centers: Vec<CenterEntry>,
}

#[derive(Debug, Serialize)]
pub struct UnitEntry {
    pub territory: &'static str,
    pub kind: UnitKind,
    pub nation: Nation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coast: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct CenterEntry {
    pub territory: &'static str,
    pub owner: Nation,
}

/// Total units and centers across all nations, for sanity checks.
pub fn totals(board: &Board) -> (usize, usize) {
    let units = ALL_NATIONS.iter().map(|n| board.unit_count(*n)).sum();
    let centers = ALL_NATIONS.iter().map(|n| board.center_count(*n)).sum();
    (units, centers)
}
