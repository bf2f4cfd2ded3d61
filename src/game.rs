//! The turn state machine: phases, dates, order intake, victory.
//!
//! A [`Game`] owns the board and the pending order set, validates incoming
//! orders against the current phase, and applies adjudication results.
//! Rejected commands never change state.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::board::{Board, BoardSnapshot};
use crate::judge::{self, JudgedOrder, Quota, Retreat};
use crate::map::{Coast, Nation, NationSet, Territory};
use crate::orders::{Order, OrderKind, OrderSet, OrderSetError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Season {
    Spring,
    Autumn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Movement,
    Retreat,
    Build,
}

/// Game calendar. Year zero does not exist: 1 BC is followed by 1 AD,
/// kept as `-1` and `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Date {
    year: i32,
    season: Season,
}

impl Date {
    pub fn new(year: i32, season: Season) -> Result<Date, GameError> {
        if year == 0 {
            return Err(GameError::YearZero);
        }
        Ok(Date { year, season })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn season(&self) -> Season {
        self.season
    }

    /// Spring to Autumn, Autumn to next year's Spring.
    pub fn advance(&mut self) {
        match self.season {
            Season::Spring => self.season = Season::Autumn,
            Season::Autumn => {
                self.year = if self.year == -1 { 1 } else { self.year + 1 };
                self.season = Season::Spring;
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("select a nation first")]
    NoNationSelected,
    #[error("there is no year zero")]
    YearZero,
    #[error("order not valid in the {0:?} phase")]
    WrongPhase(Phase),
    #[error("no unit in {}", .0.name())]
    VacantOrigin(Territory),
    #[error("the unit in {} belongs to another nation", .0.name())]
    ForeignUnit(Territory),
    #[error("no dislodged unit in {}", .0.name())]
    NotDislodged(Territory),
    #[error("{} requires a named coast", .0.name())]
    CoastRequired(Territory),
    #[error("invalid coast for {}", .0.name())]
    BadCoast(Territory),
    #[error(transparent)]
    Orders(#[from] OrderSetError),
    #[error(transparent)]
    Adjustment(#[from] judge::AdjustmentError),
}

/// Everything a front end needs to report one adjudication.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReport {
    /// Date after the turn was applied.
    pub date: Date,
    /// Phase the game moved into.
    pub phase: Phase,
    pub judged: Vec<JudgedOrder>,
    /// Dislodged units now awaiting retreat orders.
    pub dislodged: Vec<Retreat>,
    /// Build/disband entitlements, when the new phase is Build.
    pub quotas: Vec<Quota>,
}

impl TurnReport {
    /// Nations that owe builds or disbands.
    pub fn adjusting_nations(&self) -> NationSet {
        self.quotas.iter().map(|q| q.nation).collect()
    }
}

/// A running game.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    orders: OrderSet,
    date: Date,
    phase: Phase,
    selected: Option<Nation>,
    pending_retreats: Vec<Retreat>,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// Standard opening position, Spring 1901, Movement phase.
    pub fn new() -> Game {
        Game {
            board: Board::standard_opening(),
            orders: OrderSet::new(),
            date: Date { year: 1901, season: Season::Spring },
            phase: Phase::Movement,
            selected: None,
            pending_retreats: Vec::new(),
        }
    }

    /// Start from an arbitrary position, for scenarios and variants of the
    /// opening year.
    pub fn from_position(board: Board, date: Date) -> Game {
        Game {
            board,
            orders: OrderSet::new(),
            date,
            phase: Phase::Movement,
            selected: None,
            pending_retreats: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected_nation(&self) -> Option<Nation> {
        self.selected
    }

    pub fn pending_retreats(&self) -> &[Retreat] {
        &self.pending_retreats
    }

    pub fn select_nation(&mut self, nation: Nation) {
        self.selected = Some(nation);
    }

    /// Rewind or fast-forward the calendar between turns.
    pub fn set_date(&mut self, year: i32, season: Season) -> Result<(), GameError> {
        self.date = Date::new(year, season)?;
        Ok(())
    }

    fn acting_nation(&self, explicit: Option<Nation>) -> Result<Nation, GameError> {
        explicit.or(self.selected).ok_or(GameError::NoNationSelected)
    }

    /// Register an order for `nation`, or for the selected nation when
    /// `None`. Validation is phase- and registration-level only; strength
    /// contests happen at adjudication.
    pub fn register_order(
        &mut self,
        nation: Option<Nation>,
        order: Order,
    ) -> Result<(), GameError> {
        let nation = self.acting_nation(nation)?;
        match self.phase {
            Phase::Movement => self.check_movement_order(nation, &order)?,
            Phase::Retreat => self.check_retreat_order(nation, &order)?,
            Phase::Build => self.check_build_order(nation, &order)?,
        }
        self.orders.set(nation, order);
        Ok(())
    }

    fn check_movement_order(&self, nation: Nation, order: &Order) -> Result<(), GameError> {
        match order.kind {
            OrderKind::Hold
            | OrderKind::Move { .. }
            | OrderKind::SupportHold { .. }
            | OrderKind::SupportMove { .. }
            | OrderKind::Convoy { .. } => {}
            OrderKind::Build { .. } | OrderKind::Disband => {
                return Err(GameError::WrongPhase(self.phase));
            }
        }
        let unit = self
            .board
            .occupier(order.origin)
            .ok_or(GameError::VacantOrigin(order.origin))?;
        if unit.nation != nation {
            return Err(GameError::ForeignUnit(order.origin));
        }
        if let OrderKind::Move { dest, dest_coast, .. } = order.kind {
            check_coast_arity(unit.is_fleet(), dest, dest_coast)?;
        }
        Ok(())
    }

    fn check_retreat_order(&self, nation: Nation, order: &Order) -> Result<(), GameError> {
        match order.kind {
            OrderKind::Move { .. } | OrderKind::Disband => {}
            _ => return Err(GameError::WrongPhase(self.phase)),
        }
        let retreat = self
            .pending_retreats
            .iter()
            .find(|r| r.origin == order.origin)
            .ok_or(GameError::NotDislodged(order.origin))?;
        if retreat.unit.nation != nation {
            return Err(GameError::ForeignUnit(order.origin));
        }
        if let OrderKind::Move { dest, dest_coast, .. } = order.kind {
            check_coast_arity(retreat.unit.is_fleet(), dest, dest_coast)?;
        }
        Ok(())
    }

    fn check_build_order(&self, nation: Nation, order: &Order) -> Result<(), GameError> {
        match order.kind {
            OrderKind::Build { kind, coast } => {
                check_coast_arity(kind == crate::board::UnitKind::Fleet, order.origin, coast)
            }
            OrderKind::Disband => {
                let unit = self
                    .board
                    .occupier(order.origin)
                    .ok_or(GameError::VacantOrigin(order.origin))?;
                if unit.nation != nation {
                    return Err(GameError::ForeignUnit(order.origin));
                }
                Ok(())
            }
            _ => Err(GameError::WrongPhase(self.phase)),
        }
    }

    pub fn delete_orders(&mut self, ranges: &[(usize, usize)]) -> Result<usize, GameError> {
        Ok(self.orders.delete(ranges)?)
    }

    pub fn clear_orders(&mut self) {
        self.orders.clear();
    }

    /// Numbered orders, all nations or one. Numbers are global either way.
    pub fn list_orders(&self, nation: Option<Nation>) -> Vec<(usize, Nation, Order)> {
        self.orders.list(nation)
    }

    /// Resolve the current phase with whatever orders are pending, apply
    /// the outcome, and advance. On error (a malformed disband request)
    /// nothing changes and orders stay as submitted.
    pub fn adjudicate(&mut self) -> Result<TurnReport, GameError> {
        match self.phase {
            Phase::Movement => {
                let judgement = judge::adjudicate_movement(&self.board, &self.orders);
                judge::apply_movement(&mut self.board, &judgement);
                self.orders.clear();
                if judgement.retreats.is_empty() {
                    let quotas = self.advance_season();
                    Ok(self.report(judgement.orders, Vec::new(), quotas))
                } else {
                    self.phase = Phase::Retreat;
                    info!(
                        dislodged = judgement.retreats.len(),
                        "entering retreat phase"
                    );
                    self.pending_retreats = judgement.retreats.clone();
                    Ok(self.report(judgement.orders, judgement.retreats, Vec::new()))
                }
            }
            Phase::Retreat => {
                let judged = judge::adjudicate_retreats(&self.orders, &self.pending_retreats);
                judge::apply_retreats(&mut self.board, &judged, &self.pending_retreats);
                self.pending_retreats.clear();
                self.orders.clear();
                let quotas = self.advance_season();
                Ok(self.report(judged, Vec::new(), quotas))
            }
            Phase::Build => {
                let judged = judge::adjudicate_adjustments(&self.board, &self.orders)?;
                judge::apply_adjustments(&mut self.board, &judged);
                self.orders.clear();
                self.phase = Phase::Movement;
                info!(year = self.date.year(), "adjustments applied, movement phase");
                Ok(self.report(judged, Vec::new(), Vec::new()))
            }
        }
    }

    /// Advance the calendar after a completed season. Entering Spring
    /// captures centers and opens a Build phase if any nation's counts
    /// diverge; otherwise play proceeds straight to Movement.
    fn advance_season(&mut self) -> Vec<Quota> {
        self.date.advance();
        if self.date.season() == Season::Spring {
            self.board.capture_centers();
            let quotas = judge::quotas(&self.board);
            if !quotas.is_empty() {
                self.phase = Phase::Build;
                info!(year = self.date.year(), nations = quotas.len(), "entering build phase");
                return quotas;
            }
        }
        self.phase = Phase::Movement;
        info!(year = self.date.year(), season = ?self.date.season(), "movement phase");
        Vec::new()
    }

    fn report(
        &self,
        judged: Vec<JudgedOrder>,
        dislodged: Vec<Retreat>,
        quotas: Vec<Quota>,
    ) -> TurnReport {
        TurnReport { date: self.date, phase: self.phase, judged, dislodged, quotas }
    }

    /// The nation holding 18 or more supply centers, if any.
    pub fn winner(&self) -> Option<Nation> {
        judge::build::winner(&self.board)
    }

    /// Serializable view for the display layer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            year: self.date.year(),
            season: self.date.season(),
            phase: self.phase,
            board: self.board.snapshot(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub year: i32,
    pub season: Season,
    pub phase: Phase,
    pub board: BoardSnapshot,
}

fn check_coast_arity(is_fleet: bool, dest: Territory, coast: Coast) -> Result<(), GameError> {
    if is_fleet && dest.is_bicoastal() {
        if coast == Coast::None {
            return Err(GameError::CoastRequired(dest));
        }
        if !dest.coasts().contains(&coast) {
            return Err(GameError::BadCoast(dest));
        }
    } else if coast != Coast::None {
        return Err(GameError::BadCoast(dest));
    }
    Ok(())
}
