//! Build-phase resolution: builds, disbands, quotas and civil disorder.

use thiserror::Error;
use tracing::{debug, info};

use crate::board::{Board, Unit, UnitKind};
use crate::map::{self, Coast, Nation, Terrain, Territory, ALL_NATIONS};
use crate::orders::{Order, OrderKind, OrderSet};

use super::{JudgedOrder, Verdict, VoidReason};

/// How far a nation's units and centers have diverged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Quota {
    pub nation: Nation,
    /// Builds available: center surplus, capped by vacant owned home centers.
    pub builds: usize,
    /// Disbands owed: unit surplus.
    pub disbands: usize,
}

/// Per-nation build/disband entitlements. Nations in balance are omitted.
pub fn quotas(board: &Board) -> Vec<Quota> {
    let mut out = Vec::new();
    for nation in ALL_NATIONS {
        let centers = board.center_count(nation);
        let units = board.unit_count(nation);
        let quota = if centers > units {
            Quota {
                nation,
                builds: (centers - units).min(board.vacant_home_centers(nation).len()),
                disbands: 0,
            }
        } else {
            Quota { nation, builds: 0, disbands: units - centers }
        };
        if quota.builds > 0 || quota.disbands > 0 {
            out.push(quota);
        }
    }
    out
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdjustmentError {
    #[error("{} must disband exactly {required} units, got {submitted}", .nation.name())]
    DisbandCount { nation: Nation, required: usize, submitted: usize },
    #[error("{} has no unit to disband in {}", .nation.name(), .territory.name())]
    DisbandTarget { nation: Nation, territory: Territory },
}

/// Judge all build-phase orders. Illegal builds fail individually with a
/// named reason; a malformed disband request rejects the whole submission
/// so it can be corrected and resubmitted. Nations owing disbands that
/// submit none fall into civil disorder and lose their units farthest
/// from home.
pub fn adjudicate_adjustments(
    board: &Board,
    orders: &OrderSet,
) -> Result<Vec<JudgedOrder>, AdjustmentError> {
    let mut judged = Vec::new();

    for nation in ALL_NATIONS {
        let centers = board.center_count(nation);
        let units = board.unit_count(nation);
        let list = orders.orders_of(nation);

        if centers > units {
            let allowed = centers - units;
            let mut built = 0usize;
            for order in list {
                let verdict = match order.kind {
                    OrderKind::Build { kind, coast } => {
                        match validate_build(board, nation, order.origin, kind, coast) {
                            Err(reason) => Verdict::Void(reason),
                            Ok(()) if built >= allowed => Verdict::Void(VoidReason::TooManyBuilds),
                            Ok(()) => {
                                built += 1;
                                Verdict::Succeeds
                            }
                        }
                    }
                    _ => Verdict::Void(VoidReason::WrongPhase),
                };
                judged.push(JudgedOrder { nation, order: *order, verdict });
            }
        } else if units > centers {
            let required = units - centers;
            let disbands: Vec<&Order> = list
                .iter()
                .filter(|o| o.kind == OrderKind::Disband)
                .collect();

            for order in list {
                if order.kind != OrderKind::Disband {
                    judged.push(JudgedOrder {
                        nation,
                        order: *order,
                        verdict: Verdict::Void(VoidReason::WrongPhase),
                    });
                }
            }

            if disbands.is_empty() {
                info!(nation = nation.name(), required, "civil disorder");
                judged.extend(civil_disorder(board, nation, required));
            } else if disbands.len() != required {
                return Err(AdjustmentError::DisbandCount {
                    nation,
                    required,
                    submitted: disbands.len(),
                });
            } else {
                for order in &disbands {
                    let owned = board
                        .occupier(order.origin)
                        .is_some_and(|u| u.nation == nation);
                    if !owned {
                        return Err(AdjustmentError::DisbandTarget {
                            nation,
                            territory: order.origin,
                        });
                    }
                }
                for order in disbands {
                    judged.push(JudgedOrder { nation, order: *order, verdict: Verdict::Succeeds });
                }
            }
        } else {
            for order in list {
                judged.push(JudgedOrder {
                    nation,
                    order: *order,
                    verdict: Verdict::Void(VoidReason::WrongPhase),
                });
            }
        }
    }
    Ok(judged)
}

fn validate_build(
    board: &Board,
    nation: Nation,
    t: Territory,
    kind: UnitKind,
    coast: Coast,
) -> Result<(), VoidReason> {
    if t.home_nation() != Some(nation) {
        return Err(VoidReason::NotAHomeCenter);
    }
    if board.owner(t) != Some(nation) {
        return Err(VoidReason::NotOwned);
    }
    if board.occupier(t).is_some() {
        return Err(VoidReason::Occupied);
    }
    if kind == UnitKind::Fleet && t.terrain() == Terrain::Inland {
        return Err(VoidReason::TerrainMismatch);
    }
    if kind == UnitKind::Fleet && t.is_bicoastal() {
        if coast == Coast::None {
            return Err(VoidReason::CoastRequired);
        }
        if !t.coasts().contains(&coast) {
            return Err(VoidReason::BadCoast);
        }
    } else if coast != Coast::None {
        return Err(VoidReason::BadCoast);
    }
    Ok(())
}

/// Disband the units farthest from the nation's home centers: greater
/// distance first, fleets before armies, then territory order.
fn civil_disorder(board: &Board, nation: Nation, count: usize) -> Vec<JudgedOrder> {
    let mut units = board.units_of(nation);
    units.sort_by(|(ta, ua), (tb, ub)| {
        distance_to_home(nation, *tb)
            .cmp(&distance_to_home(nation, *ta))
            .then_with(|| ub.is_fleet().cmp(&ua.is_fleet()))
            .then_with(|| ta.index().cmp(&tb.index()))
    });

    units
        .into_iter()
        .take(count)
        .map(|(t, _)| {
            debug!(nation = nation.name(), territory = t.abbr(), "auto-disband");
            JudgedOrder { nation, order: Order::disband(t), verdict: Verdict::Succeeds }
        })
        .collect()
}

/// Breadth-first hop count to the nearest home center, over all edges
/// regardless of unit kind.
fn distance_to_home(nation: Nation, from: Territory) -> u32 {
    if from.home_nation() == Some(nation) {
        return 0;
    }
    let mut dist = [u32::MAX; map::TERRITORY_COUNT];
    dist[from.index()] = 0;
    let mut queue = std::collections::VecDeque::from([from]);
    while let Some(t) = queue.pop_front() {
        for link in map::links_from(t) {
            if dist[link.to.index()] == u32::MAX {
                dist[link.to.index()] = dist[t.index()] + 1;
                if link.to.home_nation() == Some(nation) {
                    return dist[link.to.index()];
                }
                queue.push_back(link.to);
            }
        }
    }
    u32::MAX
}

/// Apply adjudicated builds and disbands to the board.
pub fn apply_adjustments(board: &mut Board, judged: &[JudgedOrder]) {
    for jo in judged {
        if !jo.verdict.succeeded() {
            continue;
        }
        match jo.order.kind {
            OrderKind::Build { kind, coast } => {
                board.put(jo.order.origin, Unit { kind, nation: jo.nation, coast });
            }
            OrderKind::Disband => {
                board.remove(jo.order.origin);
            }
            _ => {}
        }
    }
}

/// A nation owning this many centers has won.
pub const VICTORY_CENTERS: usize = 18;

/// The winner, if any nation holds [`VICTORY_CENTERS`] or more.
pub fn winner(board: &Board) -> Option<Nation> {
    ALL_NATIONS
        .into_iter()
        .find(|n| board.center_count(*n) >= VICTORY_CENTERS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Nation::*;
    use crate::map::Territory::*;
    use crate::map::ALL_TERRITORIES;

    /// France with extra centers: owns its three homes plus Spain and
    /// Portugal, with armies only in Spain and Portugal.
    fn france_plus_two() -> Board {
        let mut board = Board::empty();
        for t in [Bre, Mar, Par, Spa, Por] {
            board.set_owner(t, Some(France));
        }
        board.put(Spa, Unit::army(France));
        board.put(Por, Unit::army(France));
        board
    }

    #[test]
    fn quota_is_capped_by_vacant_home_centers() {
        let mut board = france_plus_two();
        assert_eq!(
            quotas(&board),
            vec![Quota { nation: France, builds: 3, disbands: 0 }]
        );
        board.put(Par, Unit::army(France));
        // 5 centers, 3 units, but only Bre and Mar free to build in
        assert_eq!(
            quotas(&board),
            vec![Quota { nation: France, builds: 2, disbands: 0 }]
        );
    }

    #[test]
    fn surplus_offers_builds_and_rejects_one_too_many() {
        let mut board = france_plus_two();
        board.put(Par, Unit::army(France));
        // 5 centers, 3 units: exactly two builds
        let mut orders = OrderSet::new();
        orders.set(France, Order::build(Bre, UnitKind::Fleet));
        orders.set(France, Order::build(Mar, UnitKind::Army));
        let judged = adjudicate_adjustments(&board, &orders).unwrap();
        assert!(judged.iter().all(|j| j.verdict == Verdict::Succeeds));

        // a third build is refused even though Paris would be free if it
        // weren't occupied: Gascony is simply not a home center
        orders.set(France, Order::build(Gas, UnitKind::Army));
        let judged = adjudicate_adjustments(&board, &orders).unwrap();
        let gas = judged.iter().find(|j| j.order.origin == Gas).unwrap();
        assert_eq!(gas.verdict, Verdict::Void(VoidReason::NotAHomeCenter));
    }

    #[test]
    fn builds_beyond_the_center_surplus_are_refused() {
        let mut board = Board::empty();
        for t in [Bre, Mar, Par, Spa] {
            board.set_owner(t, Some(France));
        }
        board.put(Spa, Unit::army(France));
        board.put(Por, Unit::army(France));
        // 4 centers, 2 units: two builds, though all three homes are free
        let mut orders = OrderSet::new();
        orders.set(France, Order::build(Bre, UnitKind::Fleet));
        orders.set(France, Order::build(Mar, UnitKind::Army));
        orders.set(France, Order::build(Par, UnitKind::Army));
        let judged = adjudicate_adjustments(&board, &orders).unwrap();
        let verdict = |t: Territory| judged.iter().find(|j| j.order.origin == t).unwrap().verdict;
        assert_eq!(verdict(Bre), Verdict::Succeeds);
        assert_eq!(verdict(Mar), Verdict::Succeeds);
        assert_eq!(verdict(Par), Verdict::Void(VoidReason::TooManyBuilds));
    }

    #[test]
    fn build_failure_reasons() {
        let mut board = france_plus_two();
        board.set_owner(Bre, Some(England));
        board.put(Mar, Unit::army(Austria));
        // keep Austria in balance so no disband is synthesized for Mar
        board.set_owner(Vie, Some(Austria));
        let mut orders = OrderSet::new();
        orders.set(France, Order::build(Bre, UnitKind::Fleet));
        orders.set(France, Order::build(Mar, UnitKind::Army));
        orders.set(France, Order::build(Par, UnitKind::Fleet));
        let judged = adjudicate_adjustments(&board, &orders).unwrap();
        let verdict = |t: Territory| judged.iter().find(|j| j.order.origin == t).unwrap().verdict;
        assert_eq!(verdict(Bre), Verdict::Void(VoidReason::NotOwned));
        assert_eq!(verdict(Mar), Verdict::Void(VoidReason::Occupied));
        assert_eq!(verdict(Par), Verdict::Void(VoidReason::TerrainMismatch));
    }

    #[test]
    fn fleet_build_on_bicoastal_center_needs_a_coast() {
        let mut board = Board::empty();
        for t in [Mos, Sev, Stp, War, Rum] {
            board.set_owner(t, Some(Russia));
        }
        board.put(Mos, Unit::army(Russia));
        let mut orders = OrderSet::new();
        orders.set(Russia, Order::build(Stp, UnitKind::Fleet));
        let judged = adjudicate_adjustments(&board, &orders).unwrap();
        assert_eq!(judged[0].verdict, Verdict::Void(VoidReason::CoastRequired));

        orders.set(Russia, Order::build_fleet_on(Stp, Coast::East));
        let judged = adjudicate_adjustments(&board, &orders).unwrap();
        assert_eq!(judged[0].verdict, Verdict::Void(VoidReason::BadCoast));

        orders.set(Russia, Order::build_fleet_on(Stp, Coast::North));
        let judged = adjudicate_adjustments(&board, &orders).unwrap();
        assert_eq!(judged[0].verdict, Verdict::Succeeds);
        let mut board = board;
        apply_adjustments(&mut board, &judged);
        assert_eq!(
            board.occupier(Stp),
            Some(Unit::fleet_on(Russia, Coast::North))
        );
    }

    #[test]
    fn wrong_disband_count_rejects_wholesale() {
        let mut board = Board::empty();
        board.set_owner(Ber, Some(Germany));
        board.put(Ber, Unit::army(Germany));
        board.put(Mun, Unit::army(Germany));
        board.put(Kie, Unit::fleet(Germany));
        // 1 center, 3 units: must disband exactly two
        let mut orders = OrderSet::new();
        orders.set(Germany, Order::disband(Mun));
        assert_eq!(
            adjudicate_adjustments(&board, &orders),
            Err(AdjustmentError::DisbandCount { nation: Germany, required: 2, submitted: 1 })
        );

        orders.set(Germany, Order::disband(Par));
        assert_eq!(
            adjudicate_adjustments(&board, &orders),
            Err(AdjustmentError::DisbandTarget { nation: Germany, territory: Par })
        );

        orders.delete(&[(2, 2)]).unwrap();
        orders.set(Germany, Order::disband(Kie));
        let judged = adjudicate_adjustments(&board, &orders).unwrap();
        assert_eq!(judged.len(), 2);
        assert!(judged.iter().all(|j| j.verdict == Verdict::Succeeds));
    }

    #[test]
    fn civil_disorder_disbands_farthest_fleet_first() {
        let mut board = Board::empty();
        board.set_owner(Ber, Some(Germany));
        board.put(Ber, Unit::army(Germany));
        board.put(Swe, Unit::fleet(Germany));
        board.put(Pie, Unit::army(Germany));
        // 1 center, 3 units, no orders: two auto-disbands. Sweden and
        // Piedmont are both two hops from the nearest home center; the
        // fleet goes first.
        let judged = adjudicate_adjustments(&board, &OrderSet::new()).unwrap();
        let disbanded: Vec<Territory> = judged.iter().map(|j| j.order.origin).collect();
        assert_eq!(disbanded, vec![Swe, Pie]);
    }

    #[test]
    fn distance_to_home_counts_hops() {
        assert_eq!(distance_to_home(Germany, Mun), 0);
        assert_eq!(distance_to_home(Germany, Den), 1);
        assert_eq!(distance_to_home(Germany, Swe), 2);
        assert_eq!(distance_to_home(Turkey, Arm), 1);
    }

    #[test]
    fn winner_at_eighteen_centers() {
        let mut board = Board::empty();
        let centers: Vec<Territory> = ALL_TERRITORIES
            .into_iter()
            .filter(|t| t.is_supply_center())
            .collect();
        for t in centers.iter().take(17) {
            board.set_owner(*t, Some(Turkey));
        }
        assert_eq!(winner(&board), None);
        board.set_owner(centers[17], Some(Turkey));
        assert_eq!(winner(&board), Some(Turkey));
    }
}
