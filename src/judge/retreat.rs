//! Retreat-phase resolution.
//!
//! No strength arithmetic here: a retreat succeeds iff it names a legal
//! destination and no other retreat targets the same territory. Everything
//! else disbands, including units whose owner submitted no order.

use tracing::debug;

use crate::board::Board;
use crate::map::{Coast, Territory};
use crate::orders::{Order, OrderKind, OrderSet};

use super::{JudgedOrder, Retreat, Verdict, VoidReason};

/// Judge the retreat orders against the pending retreat set. Every
/// dislodged unit gets exactly one verdict; units without orders get a
/// synthesized disband.
pub fn adjudicate_retreats(orders: &OrderSet, pending: &[Retreat]) -> Vec<JudgedOrder> {
    let mut judged: Vec<JudgedOrder> = Vec::with_capacity(pending.len());

    for retreat in pending {
        let nation = retreat.unit.nation;
        let verdict_and_order = match orders.find(nation, retreat.origin) {
            None => {
                debug!(origin = retreat.origin.abbr(), "no retreat order, disbanding");
                (Order::disband(retreat.origin), Verdict::Succeeds)
            }
            Some(order) => match order.kind {
                OrderKind::Disband => (*order, Verdict::Succeeds),
                OrderKind::Move { dest, dest_coast, .. } => {
                    if retreat.destinations.contains(&(dest, dest_coast)) {
                        (*order, Verdict::Succeeds)
                    } else {
                        (*order, Verdict::Fails)
                    }
                }
                _ => (*order, Verdict::Void(VoidReason::WrongPhase)),
            },
        };
        judged.push(JudgedOrder { nation, order: verdict_and_order.0, verdict: verdict_and_order.1 });
    }

    // two retreats into one territory disband both, regardless of coast;
    // contests are read off before any verdict is downgraded
    let dests: Vec<Option<Territory>> = judged.iter().map(retreat_dest).collect();
    for (i, jo) in judged.iter_mut().enumerate() {
        let Some(dest) = dests[i] else { continue };
        let contested = dests
            .iter()
            .enumerate()
            .any(|(k, d)| k != i && *d == Some(dest));
        if contested {
            jo.verdict = Verdict::Fails;
        }
    }
    judged
}

fn retreat_dest(jo: &JudgedOrder) -> Option<Territory> {
    match (jo.verdict, jo.order.kind) {
        (Verdict::Succeeds, OrderKind::Move { dest, .. }) => Some(dest),
        _ => None,
    }
}

/// Put the surviving retreaters back on the board. Failed or disbanded
/// units simply stay off it.
pub fn apply_retreats(board: &mut Board, judged: &[JudgedOrder], pending: &[Retreat]) {
    for jo in judged {
        let (Verdict::Succeeds, OrderKind::Move { dest, dest_coast, .. }) =
            (jo.verdict, jo.order.kind)
        else {
            continue;
        };
        let Some(retreat) = pending
            .iter()
            .find(|r| r.origin == jo.order.origin && r.unit.nation == jo.nation)
        else {
            continue;
        };
        let mut unit = retreat.unit;
        unit.coast = if unit.is_fleet() && dest.is_bicoastal() {
            dest_coast
        } else {
            Coast::None
        };
        board.put(dest, unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Unit;
    use crate::map::Nation::*;
    use crate::map::Territory::*;

    fn pending(origin: Territory, unit: Unit, attacker_from: Territory, dests: &[(Territory, Coast)]) -> Retreat {
        Retreat { origin, unit, attacker_from, destinations: dests.to_vec() }
    }

    #[test]
    fn legal_retreat_succeeds_and_applies() {
        let mut board = Board::empty();
        let pend = vec![pending(
            Bur,
            Unit::army(Germany),
            Par,
            &[(Ruh, Coast::None), (Mun, Coast::None)],
        )];
        let mut orders = OrderSet::new();
        orders.set(Germany, Order::mv(Bur, Mun));
        let judged = adjudicate_retreats(&orders, &pend);
        assert_eq!(judged.len(), 1);
        assert_eq!(judged[0].verdict, Verdict::Succeeds);
        apply_retreats(&mut board, &judged, &pend);
        assert_eq!(board.occupier(Mun), Some(Unit::army(Germany)));
    }

    #[test]
    fn retreat_outside_legal_destinations_disbands() {
        let pend = vec![pending(Bur, Unit::army(Germany), Par, &[(Ruh, Coast::None)])];
        let mut orders = OrderSet::new();
        orders.set(Germany, Order::mv(Bur, Mar));
        let judged = adjudicate_retreats(&orders, &pend);
        assert_eq!(judged[0].verdict, Verdict::Fails);
    }

    #[test]
    fn missing_order_becomes_disband() {
        let pend = vec![pending(Bur, Unit::army(Germany), Par, &[(Ruh, Coast::None)])];
        let judged = adjudicate_retreats(&OrderSet::new(), &pend);
        assert_eq!(judged.len(), 1);
        assert_eq!(judged[0].order, Order::disband(Bur));
        assert_eq!(judged[0].verdict, Verdict::Succeeds);
    }

    #[test]
    fn converging_retreats_all_disband() {
        let pend = vec![
            pending(Bur, Unit::army(Germany), Par, &[(Ruh, Coast::None)]),
            pending(Kie, Unit::army(Russia), Ber, &[(Ruh, Coast::None)]),
        ];
        let mut orders = OrderSet::new();
        orders.set(Germany, Order::mv(Bur, Ruh));
        orders.set(Russia, Order::mv(Kie, Ruh));
        let judged = adjudicate_retreats(&orders, &pend);
        assert!(judged.iter().all(|j| j.verdict == Verdict::Fails));
        let mut board = Board::empty();
        apply_retreats(&mut board, &judged, &pend);
        assert_eq!(board.occupier(Ruh), None);
    }

    #[test]
    fn fleet_retreat_lands_on_named_coast() {
        let mut board = Board::empty();
        let pend = vec![pending(
            Mar,
            Unit::fleet(France),
            Pie,
            &[(Spa, Coast::South)],
        )];
        let mut orders = OrderSet::new();
        orders.set(France, Order::mv_coast(Mar, Spa, Coast::South));
        let judged = adjudicate_retreats(&orders, &pend);
        assert_eq!(judged[0].verdict, Verdict::Succeeds);
        apply_retreats(&mut board, &judged, &pend);
        assert_eq!(board.occupier(Spa), Some(Unit::fleet_on(France, Coast::South)));
    }

    #[test]
    fn wrong_coast_disbands() {
        let pend = vec![pending(Mar, Unit::fleet(France), Pie, &[(Spa, Coast::South)])];
        let mut orders = OrderSet::new();
        orders.set(France, Order::mv_coast(Mar, Spa, Coast::North));
        let judged = adjudicate_retreats(&orders, &pend);
        assert_eq!(judged[0].verdict, Verdict::Fails);
    }
}
