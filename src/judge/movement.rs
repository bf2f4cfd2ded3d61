//! Simultaneous movement resolution.
//!
//! Resolution is guess-and-check over the order dependency graph: each
//! order is optimistically assumed to succeed, and when evaluation loops
//! back on itself the whole cycle is re-tried under the opposite
//! assumption. A cycle that stays consistent either way is broken by
//! rule: a pure ring of moves rotates, while a cycle pulled through a
//! convoy keeps the optimistic evaluation.

use tracing::debug;

use crate::board::{Board, Unit};
use crate::map::{self, Coast, Nation, Terrain, Territory, ALL_TERRITORIES, TERRITORY_COUNT};
use crate::orders::{Order, OrderKind, OrderSet};

use super::{JudgedOrder, Judgement, Retreat, Verdict, VoidReason};

const NO_ENTRY: i16 = -1;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Progress {
    Untouched,
    Guessing,
    Settled,
}

/// A validated movement-phase order.
#[derive(Debug, Clone, Copy)]
struct Entry {
    nation: Nation,
    unit: Unit,
    origin: Territory,
    action: Action,
    progress: Progress,
    outcome: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Hold,
    Move { dest: Territory, dest_coast: Coast, convoyed: bool },
    SupportHold { target: Territory },
    SupportMove { from: Territory, to: Territory },
    Convoy { from: Territory, to: Territory },
}

struct Resolver<'a> {
    board: &'a Board,
    entries: Vec<Entry>,
    at: [i16; TERRITORY_COUNT],
    /// Orders whose current value is a guess that fed back into itself.
    deps: Vec<usize>,
}

/// Adjudicate the movement phase. Pure; the board is not touched.
pub fn adjudicate_movement(board: &Board, orders: &OrderSet) -> Judgement {
    let (entries, voided) = classify(board, orders);
    debug!(valid = entries.len(), void = voided.len(), "resolving movement");

    let mut at = [NO_ENTRY; TERRITORY_COUNT];
    for (i, e) in entries.iter().enumerate() {
        at[e.origin.index()] = i as i16;
    }

    let mut resolver = Resolver { board, entries, at, deps: Vec::new() };
    for i in 0..resolver.entries.len() {
        let origin = resolver.entries[i].origin;
        resolver.settle(origin);
    }
    resolver.finish(orders, &voided)
}

/// Apply a movement judgement to the board: dislodged units leave (they
/// live in the retreat set until the Retreat phase ends), successful moves
/// relocate. Two passes so rotations and swaps cannot clobber each other.
pub fn apply_movement(board: &mut Board, judgement: &Judgement) {
    for retreat in &judgement.retreats {
        board.remove(retreat.origin);
    }

    let mut arrivals: Vec<(Territory, Unit)> = Vec::new();
    for jo in &judgement.orders {
        if let OrderKind::Move { dest, dest_coast, .. } = jo.order.kind {
            if jo.verdict.succeeded() {
                if let Some(mut unit) = board.remove(jo.order.origin) {
                    unit.coast = if unit.is_fleet() && dest.is_bicoastal() {
                        dest_coast
                    } else {
                        Coast::None
                    };
                    arrivals.push((dest, unit));
                }
            }
        }
    }
    for (dest, unit) in arrivals {
        board.put(dest, unit);
    }
}

type Voided = Vec<(Nation, Territory, VoidReason)>;

/// Split submitted orders into resolvable entries and voids.
fn classify(board: &Board, orders: &OrderSet) -> (Vec<Entry>, Voided) {
    let mut entries = Vec::new();
    let mut voided = Voided::new();

    for (nation, order) in orders.entries() {
        match validate(board, orders, nation, &order) {
            Ok(action) => {
                if let Some(unit) = board.occupier(order.origin) {
                    entries.push(Entry {
                        nation,
                        unit,
                        origin: order.origin,
                        action,
                        progress: Progress::Untouched,
                        outcome: false,
                    });
                }
            }
            Err(reason) => voided.push((nation, order.origin, reason)),
        }
    }
    (entries, voided)
}

fn validate(
    board: &Board,
    orders: &OrderSet,
    nation: Nation,
    order: &Order,
) -> Result<Action, VoidReason> {
    let origin = order.origin;
    let unit = board.occupier(origin).ok_or(VoidReason::VacantOrigin)?;
    if unit.nation != nation {
        return Err(VoidReason::ForeignUnit);
    }

    match order.kind {
        OrderKind::Hold => Ok(Action::Hold),

        OrderKind::Move { dest, dest_coast, via_convoy } => {
            if dest == origin {
                return Err(VoidReason::Unreachable);
            }
            let convoyed = if unit.is_fleet() {
                if via_convoy || !map::reachable(origin, unit.coast, dest, dest_coast, true) {
                    return Err(VoidReason::Unreachable);
                }
                false
            } else {
                let direct = map::reachable(origin, Coast::None, dest, Coast::None, false);
                let convoyable = origin.terrain() == Terrain::Coastal
                    && dest.terrain() == Terrain::Coastal;
                if !direct && !convoyable {
                    return Err(VoidReason::Unreachable);
                }
                !direct || (via_convoy && convoyable)
            };
            check_own_target(board, orders, nation, dest)?;
            Ok(Action::Move { dest, dest_coast, convoyed })
        }

        OrderKind::SupportHold { target } => {
            if target == origin || !can_touch(origin, unit, target) {
                return Err(VoidReason::Unreachable);
            }
            Ok(Action::SupportHold { target })
        }

        OrderKind::SupportMove { from, to } => {
            if to == origin || !can_touch(origin, unit, to) {
                return Err(VoidReason::Unreachable);
            }
            check_own_target(board, orders, nation, to)?;
            Ok(Action::SupportMove { from, to })
        }

        OrderKind::Convoy { from, to } => {
            if !unit.is_fleet() || origin.terrain() != Terrain::Sea {
                return Err(VoidReason::Unreachable);
            }
            Ok(Action::Convoy { from, to })
        }

        OrderKind::Build { .. } | OrderKind::Disband => Err(VoidReason::WrongPhase),
    }
}

/// Whether the unit could move to `target`, ignoring landing coasts.
fn can_touch(origin: Territory, unit: Unit, target: Territory) -> bool {
    map::reachable(origin, unit.coast, target, Coast::None, unit.is_fleet())
}

/// Moves and support-moves against one's own stationary unit are void.
/// (An own unit that has a move order resolves dynamically instead: if
/// the move fails, the attack strength against it drops to zero.)
fn check_own_target(
    board: &Board,
    orders: &OrderSet,
    nation: Nation,
    target: Territory,
) -> Result<(), VoidReason> {
    if let Some(occ) = board.occupier(target) {
        if occ.nation == nation {
            let moving = orders
                .find(nation, target)
                .is_some_and(|o| matches!(o.kind, OrderKind::Move { .. }));
            if !moving {
                return Err(VoidReason::SelfDislodgement);
            }
        }
    }
    Ok(())
}

impl Resolver<'_> {
    fn index_of(&self, t: Territory) -> Option<usize> {
        let i = self.at[t.index()];
        (i != NO_ENTRY).then_some(i as usize)
    }

    /// Resolve the order at `t` to a stable outcome.
    fn settle(&mut self, t: Territory) -> bool {
        match self.index_of(t) {
            Some(i) => self.settle_entry(i),
            None => false,
        }
    }

    fn settle_entry(&mut self, i: usize) -> bool {
        match self.entries[i].progress {
            Progress::Settled => return self.entries[i].outcome,
            Progress::Guessing => {
                if !self.deps.contains(&i) {
                    self.deps.push(i);
                }
                return self.entries[i].outcome;
            }
            Progress::Untouched => {}
        }

        let marker = self.deps.len();
        self.entries[i].progress = Progress::Guessing;
        self.entries[i].outcome = true;
        let first = self.evaluate(i);

        if self.deps.len() == marker {
            // nothing looped back through this order; the answer is final
            if self.entries[i].progress != Progress::Settled {
                self.entries[i].progress = Progress::Settled;
                self.entries[i].outcome = first;
            }
            return self.entries[i].outcome;
        }
        if self.deps[marker] != i {
            // inside a cycle that closes further up; pass the guess along
            self.deps.push(i);
            self.entries[i].outcome = first;
            return first;
        }

        // this order heads the cycle: try the opposite guess
        self.reopen(marker);
        self.entries[i].progress = Progress::Guessing;
        self.entries[i].outcome = false;
        let second = self.evaluate(i);

        if first == second {
            // the same answer under both guesses is the answer
            self.reopen(marker);
            self.entries[i].progress = Progress::Settled;
            self.entries[i].outcome = first;
            return first;
        }

        let through_convoy = self.deps[marker..].iter().any(|&k| {
            matches!(
                self.entries[k].action,
                Action::Convoy { .. } | Action::Move { convoyed: true, .. }
            )
        });
        if through_convoy {
            // convoy paradox: commit the optimistic evaluation wholesale
            self.reopen(marker);
            self.entries[i].progress = Progress::Guessing;
            self.entries[i].outcome = true;
            let outcome = self.evaluate(i);
            for k in self.deps.split_off(marker) {
                self.entries[k].progress = Progress::Settled;
            }
            self.entries[i].progress = Progress::Settled;
            self.entries[i].outcome = outcome;
            return outcome;
        }

        // a pure ring of moves rotates as one
        for k in self.deps.split_off(marker) {
            if matches!(self.entries[k].action, Action::Move { .. }) {
                self.entries[k].progress = Progress::Settled;
                self.entries[k].outcome = true;
            } else {
                self.entries[k].progress = Progress::Untouched;
                self.entries[k].outcome = false;
            }
        }
        self.settle_entry(i)
    }

    /// Throw away everything settled on the back of the guesses at
    /// `deps[marker..]` so it can be re-evaluated.
    fn reopen(&mut self, marker: usize) {
        for k in self.deps.split_off(marker) {
            self.entries[k].progress = Progress::Untouched;
            self.entries[k].outcome = false;
        }
    }

    fn evaluate(&mut self, i: usize) -> bool {
        match self.entries[i].action {
            Action::Hold => true,
            Action::Move { .. } => self.move_succeeds(i),
            Action::SupportHold { .. } | Action::SupportMove { .. } => self.support_stands(i),
            Action::Convoy { .. } => self.convoy_survives(i),
        }
    }

    fn move_succeeds(&mut self, i: usize) -> bool {
        let Action::Move { dest, convoyed, .. } = self.entries[i].action else {
            return false;
        };
        let origin = self.entries[i].origin;

        if convoyed && !self.convoy_path_open(i) {
            return false;
        }

        let atk = self.attack_strength(i);
        if atk <= self.hold_strength_of(dest) {
            return false;
        }

        // head-to-head: neither side convoyed, each bound for the other's
        // territory; the stronger attack wins, ties bounce
        if let Some(j) = self.index_of(dest) {
            if let Action::Move { dest: back, convoyed: other_convoyed, .. } =
                self.entries[j].action
            {
                if back == origin && !convoyed && !other_convoyed && atk <= self.attack_strength(j)
                {
                    return false;
                }
            }
        }

        for k in 0..self.entries.len() {
            if k == i {
                continue;
            }
            if let Action::Move { dest: rival_dest, .. } = self.entries[k].action {
                if rival_dest == dest && atk <= self.prevent_strength(k) {
                    return false;
                }
            }
        }
        true
    }

    /// Strength of the move at entry `i` against its destination.
    fn attack_strength(&mut self, i: usize) -> i32 {
        let Action::Move { dest, .. } = self.entries[i].action else {
            return 0;
        };
        let origin = self.entries[i].origin;
        let nation = self.entries[i].nation;

        // a nation never dislodges or bumps its own unit, and no support
        // counts toward dislodging a unit of the supporter's own nation
        let mut staying: Option<Nation> = None;
        if let Some(occ) = self.board.occupier(dest) {
            let vacates = match self.index_of(dest) {
                Some(j) => match self.entries[j].action {
                    Action::Move { dest: next, .. } if next != origin => self.settle(dest),
                    _ => false,
                },
                None => false,
            };
            if !vacates {
                if occ.nation == nation {
                    return 0;
                }
                staying = Some(occ.nation);
            }
        }

        1 + self.support_move_count(origin, dest, staying)
    }

    /// Strength with which the move at entry `k` contests its destination
    /// without necessarily winning it.
    fn prevent_strength(&mut self, k: usize) -> i32 {
        let Action::Move { dest, convoyed, .. } = self.entries[k].action else {
            return 0;
        };
        let origin = self.entries[k].origin;

        if convoyed && !self.convoy_path_open(k) {
            return 0;
        }

        // the loser of a head-to-head exerts no prevent strength
        if let Some(j) = self.index_of(dest) {
            if let Action::Move { dest: back, .. } = self.entries[j].action {
                if back == origin && self.settle(dest) {
                    return 0;
                }
            }
        }

        // prevent strength keeps every support, whoever holds the ground
        1 + self.support_move_count(origin, dest, None)
    }

    /// Defensive strength of a territory: zero if vacated, one if the
    /// occupant's move failed, otherwise one plus standing hold supports.
    /// Units without orders defend like holders.
    fn hold_strength_of(&mut self, t: Territory) -> i32 {
        match self.index_of(t) {
            Some(j) => match self.entries[j].action {
                Action::Move { .. } => {
                    if self.settle(t) {
                        0
                    } else {
                        1
                    }
                }
                _ => 1 + self.support_hold_count(t),
            },
            None => {
                if self.board.occupier(t).is_some() {
                    1 + self.support_hold_count(t)
                } else {
                    0
                }
            }
        }
    }

    fn support_hold_count(&mut self, target: Territory) -> i32 {
        let mut n = 0;
        for k in 0..self.entries.len() {
            if let Action::SupportHold { target: held } = self.entries[k].action {
                if held == target {
                    let supporter = self.entries[k].origin;
                    if self.settle(supporter) {
                        n += 1;
                    }
                }
            }
        }
        n
    }

    fn support_move_count(
        &mut self,
        from: Territory,
        to: Territory,
        excluding: Option<Nation>,
    ) -> i32 {
        let mut n = 0;
        for k in 0..self.entries.len() {
            if let Action::SupportMove { from: f, to: t } = self.entries[k].action {
                if f == from && t == to && Some(self.entries[k].nation) != excluding {
                    let supporter = self.entries[k].origin;
                    if self.settle(supporter) {
                        n += 1;
                    }
                }
            }
        }
        n
    }

    /// A support stands unless cut. Cuts never come from the supporter's
    /// own nation nor, short of dislodgement, from the territory the
    /// support is directed against; a convoyed attack only cuts if its
    /// convoy chain is intact.
    fn support_stands(&mut self, i: usize) -> bool {
        let origin = self.entries[i].origin;
        let nation = self.entries[i].nation;
        let guarded = match self.entries[i].action {
            Action::SupportMove { to, .. } => Some(to),
            _ => None,
        };

        for k in 0..self.entries.len() {
            let Action::Move { dest, convoyed, .. } = self.entries[k].action else {
                continue;
            };
            if dest != origin || self.entries[k].nation == nation {
                continue;
            }
            if Some(self.entries[k].origin) == guarded {
                // only an outright dislodgement from there cuts
                let attacker = self.entries[k].origin;
                if self.settle(attacker) {
                    return false;
                }
                continue;
            }
            if convoyed && !self.convoy_path_open(k) {
                continue;
            }
            return false;
        }
        true
    }

    /// A convoying fleet survives unless dislodged.
    fn convoy_survives(&mut self, i: usize) -> bool {
        let origin = self.entries[i].origin;
        for k in 0..self.entries.len() {
            if let Action::Move { dest, .. } = self.entries[k].action {
                if dest == origin {
                    let attacker = self.entries[k].origin;
                    if self.settle(attacker) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Whether an unbroken chain of surviving matching convoy fleets links
    /// the move's origin to its destination.
    fn convoy_path_open(&mut self, i: usize) -> bool {
        let Action::Move { dest, .. } = self.entries[i].action else {
            return false;
        };
        let origin = self.entries[i].origin;

        let mut fleets: Vec<Territory> = Vec::new();
        for k in 0..self.entries.len() {
            if let Action::Convoy { from, to } = self.entries[k].action {
                if from == origin && to == dest {
                    let fleet = self.entries[k].origin;
                    if self.settle(fleet) {
                        fleets.push(fleet);
                    }
                }
            }
        }

        let mut queue: Vec<Territory> = fleets
            .iter()
            .copied()
            .filter(|f| map::reachable(*f, Coast::None, origin, Coast::None, true))
            .collect();
        let mut seen = queue.clone();
        while let Some(sea) = queue.pop() {
            if map::reachable(sea, Coast::None, dest, Coast::None, true) {
                return true;
            }
            for next in &fleets {
                if !seen.contains(next)
                    && map::reachable(sea, Coast::None, *next, Coast::None, true)
                {
                    seen.push(*next);
                    queue.push(*next);
                }
            }
        }
        false
    }

    /// Assemble verdicts, the retreat set and standoffs. All entries are
    /// settled by now.
    fn finish(&mut self, orders: &OrderSet, voided: &Voided) -> Judgement {
        // who successfully entered each territory
        let mut entered: [Option<Territory>; TERRITORY_COUNT] = [None; TERRITORY_COUNT];
        let mut contested = [0u8; TERRITORY_COUNT];
        for e in &self.entries {
            if let Action::Move { dest, .. } = e.action {
                contested[dest.index()] += 1;
                if e.outcome {
                    entered[dest.index()] = Some(e.origin);
                }
            }
        }

        let moved_away = |r: &Self, t: Territory| -> bool {
            match r.index_of(t) {
                Some(j) => {
                    matches!(r.entries[j].action, Action::Move { .. }) && r.entries[j].outcome
                }
                None => false,
            }
        };

        let mut dislodged: Vec<(Territory, Unit, Territory)> = Vec::new();
        let mut occupied_after = [false; TERRITORY_COUNT];
        for t in ALL_TERRITORIES {
            let stayed = self.board.occupier(t).is_some() && !moved_away(self, t);
            if let (true, Some(from)) = (stayed, entered[t.index()]) {
                if let Some(unit) = self.board.occupier(t) {
                    dislodged.push((t, unit, from));
                }
            }
            occupied_after[t.index()] = entered[t.index()].is_some() || stayed;
        }

        let standoffs: Vec<Territory> = ALL_TERRITORIES
            .into_iter()
            .filter(|t| {
                contested[t.index()] >= 2
                    && entered[t.index()].is_none()
                    && !occupied_after[t.index()]
            })
            .collect();

        let retreats: Vec<Retreat> = dislodged
            .iter()
            .map(|&(origin, unit, attacker_from)| Retreat {
                origin,
                unit,
                attacker_from,
                destinations: retreat_destinations(
                    origin,
                    unit,
                    attacker_from,
                    &occupied_after,
                    &standoffs,
                ),
            })
            .collect();

        let mut judged = Vec::with_capacity(orders.len());
        for (nation, order) in orders.entries() {
            let verdict = if let Some((_, _, reason)) = voided
                .iter()
                .find(|(n, t, _)| *n == nation && *t == order.origin)
            {
                Verdict::Void(*reason)
            } else {
                self.verdict_for(order.origin, &dislodged, &entered, &occupied_after)
            };
            judged.push(JudgedOrder { nation, order, verdict });
        }

        debug!(
            dislodged = retreats.len(),
            standoffs = standoffs.len(),
            "movement resolved"
        );
        Judgement { orders: judged, retreats, standoffs }
    }

    fn verdict_for(
        &mut self,
        origin: Territory,
        dislodged: &[(Territory, Unit, Territory)],
        entered: &[Option<Territory>; TERRITORY_COUNT],
        occupied_after: &[bool; TERRITORY_COUNT],
    ) -> Verdict {
        let Some(i) = self.index_of(origin) else {
            // validated entries cover every non-void order
            return Verdict::Fails;
        };
        let was_dislodged = dislodged.iter().any(|(t, _, _)| *t == origin);

        match self.entries[i].action {
            Action::Move { dest, convoyed, .. } => {
                if self.entries[i].outcome {
                    return Verdict::Succeeds;
                }
                if convoyed && !self.convoy_path_open(i) {
                    return Verdict::Fails;
                }
                self.bounced_by(i, dest, entered, occupied_after)
            }
            Action::Hold => {
                if was_dislodged {
                    Verdict::Fails
                } else {
                    Verdict::Succeeds
                }
            }
            Action::SupportHold { .. } | Action::SupportMove { .. } | Action::Convoy { .. } => {
                if was_dislodged || !self.entries[i].outcome {
                    Verdict::Fails
                } else {
                    Verdict::Succeeds
                }
            }
        }
    }

    /// Name the strongest contender that stopped a failed move: the held
    /// destination itself, or the strongest rival mover (lowest territory
    /// index on ties).
    fn bounced_by(
        &mut self,
        i: usize,
        dest: Territory,
        entered: &[Option<Territory>; TERRITORY_COUNT],
        occupied_after: &[bool; TERRITORY_COUNT],
    ) -> Verdict {
        let kept_by_occupant = self.board.occupier(dest).is_some()
            && occupied_after[dest.index()]
            && entered[dest.index()].is_none();
        if kept_by_occupant {
            return Verdict::Bounced { by: dest };
        }
        if let Some(winner) = entered[dest.index()] {
            return Verdict::Bounced { by: winner };
        }

        let mut best: Option<(i32, Territory)> = None;
        for k in 0..self.entries.len() {
            if k == i {
                continue;
            }
            if let Action::Move { dest: rival_dest, .. } = self.entries[k].action {
                if rival_dest != dest {
                    continue;
                }
                let rival = self.entries[k].origin;
                let strength = self.prevent_strength(k);
                let better = match best {
                    None => true,
                    Some((s, t)) => strength > s || (strength == s && rival.index() < t.index()),
                };
                if better {
                    best = Some((strength, rival));
                }
            }
        }
        match best {
            Some((_, rival)) => Verdict::Bounced { by: rival },
            None => Verdict::Fails,
        }
    }
}

/// Legal retreat destinations for a dislodged unit: adjacent for its kind,
/// vacant after resolution, not the dislodger's origin, not a standoff.
fn retreat_destinations(
    origin: Territory,
    unit: Unit,
    attacker_from: Territory,
    occupied_after: &[bool; TERRITORY_COUNT],
    standoffs: &[Territory],
) -> Vec<(Territory, Coast)> {
    let mut out = Vec::new();
    for dest in map::neighbours(origin, unit.coast, unit.is_fleet()) {
        if dest == attacker_from
            || occupied_after[dest.index()]
            || standoffs.contains(&dest)
        {
            continue;
        }
        if unit.is_fleet() && dest.is_bicoastal() {
            for coast in map::coasts_into(origin, unit.coast, dest) {
                out.push((dest, coast));
            }
        } else {
            out.push((dest, Coast::None));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Nation::*;
    use crate::map::Territory::*;

    fn judge(board: &Board, give: &[(Nation, Order)]) -> Judgement {
        let mut orders = OrderSet::new();
        for (nation, order) in give {
            orders.set(*nation, *order);
        }
        adjudicate_movement(board, &orders)
    }

    fn verdict_of(j: &Judgement, origin: Territory) -> Verdict {
        j.orders
            .iter()
            .find(|o| o.order.origin == origin)
            .map(|o| o.verdict)
            .unwrap()
    }

    #[test]
    fn unsupported_attack_on_holder_bounces() {
        let mut board = Board::empty();
        board.put(Par, Unit::army(France));
        board.put(Bur, Unit::army(Germany));
        let j = judge(&board, &[
            (France, Order::mv(Par, Bur)),
            (Germany, Order::hold(Bur)),
        ]);
        assert_eq!(verdict_of(&j, Par), Verdict::Bounced { by: Bur });
        assert_eq!(verdict_of(&j, Bur), Verdict::Succeeds);
        assert!(j.retreats.is_empty());
    }

    #[test]
    fn supported_attack_dislodges() {
        let mut board = Board::empty();
        board.put(Par, Unit::army(France));
        board.put(Mar, Unit::army(France));
        board.put(Bur, Unit::army(Germany));
        let j = judge(&board, &[
            (France, Order::mv(Par, Bur)),
            (France, Order::support_move(Mar, Par, Bur)),
            (Germany, Order::hold(Bur)),
        ]);
        assert_eq!(verdict_of(&j, Par), Verdict::Succeeds);
        assert_eq!(verdict_of(&j, Bur), Verdict::Fails);
        assert_eq!(j.retreats.len(), 1);
        assert_eq!(j.retreats[0].origin, Bur);
        assert_eq!(j.retreats[0].attacker_from, Par);
    }

    #[test]
    fn orderless_unit_defends_at_strength_one() {
        let mut board = Board::empty();
        board.put(Par, Unit::army(France));
        board.put(Bur, Unit::army(Germany));
        let j = judge(&board, &[(France, Order::mv(Par, Bur))]);
        assert_eq!(verdict_of(&j, Par), Verdict::Bounced { by: Bur });
        assert!(j.retreats.is_empty());
    }

    #[test]
    fn equal_strength_standoff_leaves_territory_empty() {
        let mut board = Board::empty();
        board.put(Mun, Unit::army(Germany));
        board.put(Boh, Unit::army(Austria));
        let j = judge(&board, &[
            (Austria, Order::mv(Boh, Tyr)),
            (Germany, Order::mv(Mun, Tyr)),
        ]);
        assert_eq!(verdict_of(&j, Mun), Verdict::Bounced { by: Boh });
        assert_eq!(verdict_of(&j, Boh), Verdict::Bounced { by: Mun });
        assert_eq!(j.standoffs, vec![Tyr]);
    }

    #[test]
    fn support_cut_drops_attack_below_threshold() {
        let mut board = Board::empty();
        board.put(Par, Unit::army(France));
        board.put(Mar, Unit::army(France));
        board.put(Bur, Unit::army(Germany));
        board.put(Gas, Unit::army(Germany));
        let j = judge(&board, &[
            (France, Order::mv(Par, Bur)),
            (France, Order::support_move(Mar, Par, Bur)),
            (Germany, Order::hold(Bur)),
            (Germany, Order::mv(Gas, Mar)),
        ]);
        assert_eq!(verdict_of(&j, Mar), Verdict::Fails);
        assert_eq!(verdict_of(&j, Par), Verdict::Bounced { by: Bur });
        assert_eq!(verdict_of(&j, Gas), Verdict::Bounced { by: Mar });
    }

    #[test]
    fn support_not_cut_by_supported_against_territory() {
        // the unit being attacked with support cannot cut that support
        let mut board = Board::empty();
        board.put(Par, Unit::army(France));
        board.put(Pic, Unit::army(France));
        board.put(Bur, Unit::army(Germany));
        let j = judge(&board, &[
            (France, Order::mv(Par, Bur)),
            (France, Order::support_move(Pic, Par, Bur)),
            (Germany, Order::mv(Bur, Pic)),
        ]);
        assert_eq!(verdict_of(&j, Pic), Verdict::Succeeds);
        assert_eq!(verdict_of(&j, Par), Verdict::Succeeds);
        assert_eq!(j.retreats.len(), 1);
        assert_eq!(j.retreats[0].origin, Bur);
    }

    #[test]
    fn attack_on_own_supporter_is_void_and_does_not_cut() {
        let mut board = Board::empty();
        board.put(Par, Unit::army(France));
        board.put(Mar, Unit::army(France));
        board.put(Bur, Unit::army(Germany));
        board.put(Gas, Unit::army(France));
        let j = judge(&board, &[
            (France, Order::mv(Par, Bur)),
            (France, Order::support_move(Mar, Par, Bur)),
            (France, Order::mv(Gas, Mar)),
            (Germany, Order::hold(Bur)),
        ]);
        assert_eq!(verdict_of(&j, Gas), Verdict::Void(VoidReason::SelfDislodgement));
        assert_eq!(verdict_of(&j, Mar), Verdict::Succeeds);
        assert_eq!(verdict_of(&j, Par), Verdict::Succeeds);
    }

    #[test]
    fn own_support_cannot_dislodge_own_stuck_unit() {
        let mut board = Board::empty();
        board.put(Ber, Unit::army(Germany));
        board.put(Mun, Unit::army(Germany));
        board.put(Kie, Unit::army(France));
        board.put(Pru, Unit::army(Russia));
        let j = judge(&board, &[
            // Berlin tries to leave but bounces off Prussia
            (Germany, Order::mv(Ber, Pru)),
            (Germany, Order::support_move(Mun, Kie, Ber)),
            (France, Order::mv(Kie, Ber)),
            (Russia, Order::hold(Pru)),
        ]);
        // Munich's support must not help France throw Berlin out
        assert_eq!(verdict_of(&j, Ber), Verdict::Bounced { by: Pru });
        assert_eq!(verdict_of(&j, Kie), Verdict::Bounced { by: Ber });
        assert!(j.retreats.is_empty());
    }

    #[test]
    fn head_to_head_stronger_side_wins() {
        let mut board = Board::empty();
        board.put(Ber, Unit::army(Germany));
        board.put(Pru, Unit::army(Russia));
        board.put(Sil, Unit::army(Germany));
        let j = judge(&board, &[
            (Germany, Order::mv(Ber, Pru)),
            (Germany, Order::support_move(Sil, Ber, Pru)),
            (Russia, Order::mv(Pru, Ber)),
        ]);
        assert_eq!(verdict_of(&j, Ber), Verdict::Succeeds);
        assert_eq!(verdict_of(&j, Pru), Verdict::Fails);
        assert_eq!(j.retreats.len(), 1);
        assert_eq!(j.retreats[0].origin, Pru);
        assert_eq!(j.retreats[0].attacker_from, Ber);
    }

    #[test]
    fn three_unit_rotation_succeeds() {
        let mut board = Board::empty();
        board.put(Hol, Unit::army(England));
        board.put(Bel, Unit::army(England));
        board.put(Ruh, Unit::army(England));
        let j = judge(&board, &[
            (England, Order::mv(Hol, Bel)),
            (England, Order::mv(Bel, Ruh)),
            (England, Order::mv(Ruh, Hol)),
        ]);
        assert_eq!(verdict_of(&j, Hol), Verdict::Succeeds);
        assert_eq!(verdict_of(&j, Bel), Verdict::Succeeds);
        assert_eq!(verdict_of(&j, Ruh), Verdict::Succeeds);
        assert!(j.retreats.is_empty());
    }

    #[test]
    fn rotation_jams_when_one_station_is_taken() {
        let mut board = Board::empty();
        board.put(Hol, Unit::army(England));
        board.put(Bel, Unit::army(England));
        board.put(Ruh, Unit::army(England));
        board.put(Pic, Unit::army(France));
        board.put(Bur, Unit::army(France));
        let j = judge(&board, &[
            (England, Order::mv(Hol, Bel)),
            (England, Order::mv(Bel, Ruh)),
            (England, Order::mv(Ruh, Hol)),
            (France, Order::mv(Pic, Bel)),
            (France, Order::support_move(Bur, Pic, Bel)),
        ]);
        // Picardy takes Belgium and no station in the ring can turn
        assert_eq!(verdict_of(&j, Pic), Verdict::Succeeds);
        assert_ne!(verdict_of(&j, Hol), Verdict::Succeeds);
        assert_ne!(verdict_of(&j, Bel), Verdict::Succeeds);
        assert_ne!(verdict_of(&j, Ruh), Verdict::Succeeds);
        assert_eq!(j.retreats.len(), 1);
        assert_eq!(j.retreats[0].origin, Bel);
    }

    #[test]
    fn convoyed_army_lands() {
        let mut board = Board::empty();
        board.put(Lon, Unit::army(England));
        board.put(Nth, Unit::fleet(England));
        let j = judge(&board, &[
            (England, Order::mv(Lon, Nwy)),
            (England, Order::convoy(Nth, Lon, Nwy)),
        ]);
        assert_eq!(verdict_of(&j, Lon), Verdict::Succeeds);
        assert_eq!(verdict_of(&j, Nth), Verdict::Succeeds);
    }

    #[test]
    fn convoy_chain_across_two_seas() {
        let mut board = Board::empty();
        board.put(Lon, Unit::army(England));
        board.put(Eng, Unit::fleet(England));
        board.put(Mao, Unit::fleet(England));
        let j = judge(&board, &[
            (England, Order::mv(Lon, Bre)),
            (England, Order::convoy(Eng, Lon, Bre)),
            (England, Order::convoy(Mao, Lon, Bre)),
        ]);
        assert_eq!(verdict_of(&j, Lon), Verdict::Succeeds);
    }

    #[test]
    fn dislodged_convoy_breaks_the_chain() {
        let mut board = Board::empty();
        board.put(Lon, Unit::army(England));
        board.put(Nth, Unit::fleet(England));
        board.put(Ska, Unit::fleet(Germany));
        board.put(Hel, Unit::fleet(Germany));
        let j = judge(&board, &[
            (England, Order::mv(Lon, Nwy)),
            (England, Order::convoy(Nth, Lon, Nwy)),
            (Germany, Order::mv(Ska, Nth)),
            (Germany, Order::support_move(Hel, Ska, Nth)),
        ]);
        assert_eq!(verdict_of(&j, Lon), Verdict::Fails);
        assert_eq!(verdict_of(&j, Nth), Verdict::Fails);
        assert_eq!(j.retreats.len(), 1);
        assert_eq!(j.retreats[0].origin, Nth);
    }

    #[test]
    fn move_against_own_stationary_unit_is_void() {
        let mut board = Board::empty();
        board.put(Par, Unit::army(France));
        board.put(Bur, Unit::army(France));
        let j = judge(&board, &[
            (France, Order::mv(Par, Bur)),
            (France, Order::hold(Bur)),
        ]);
        assert_eq!(verdict_of(&j, Par), Verdict::Void(VoidReason::SelfDislodgement));
    }

    #[test]
    fn follow_own_unit_only_if_it_leaves() {
        let mut board = Board::empty();
        board.put(Par, Unit::army(France));
        board.put(Bur, Unit::army(France));
        board.put(Mun, Unit::army(Germany));
        let j = judge(&board, &[
            (France, Order::mv(Par, Bur)),
            (France, Order::mv(Bur, Mun)),
            (Germany, Order::hold(Mun)),
        ]);
        // Burgundy bounces off Munich, so Paris cannot follow
        assert_eq!(verdict_of(&j, Bur), Verdict::Bounced { by: Mun });
        assert_eq!(verdict_of(&j, Par), Verdict::Bounced { by: Bur });
        assert!(j.retreats.is_empty());
    }

    #[test]
    fn stale_orders_are_void() {
        let mut board = Board::empty();
        board.put(Par, Unit::army(France));
        let j = judge(&board, &[
            (France, Order::hold(Bre)),
            (Germany, Order::hold(Par)),
        ]);
        assert_eq!(verdict_of(&j, Bre), Verdict::Void(VoidReason::VacantOrigin));
        assert_eq!(verdict_of(&j, Par), Verdict::Void(VoidReason::ForeignUnit));
    }

    #[test]
    fn unreachable_moves_are_void() {
        let mut board = Board::empty();
        board.put(Par, Unit::army(France));
        board.put(Bre, Unit::fleet(France));
        let j = judge(&board, &[
            (France, Order::mv(Par, Mun)),
            (France, Order::mv(Bre, Mar)),
        ]);
        assert_eq!(verdict_of(&j, Par), Verdict::Void(VoidReason::Unreachable));
        assert_eq!(verdict_of(&j, Bre), Verdict::Void(VoidReason::Unreachable));
    }

    #[test]
    fn retreat_destinations_exclude_attacker_and_standoffs() {
        let mut board = Board::empty();
        board.put(Boh, Unit::army(Austria));
        board.put(Mun, Unit::army(Germany));
        board.put(Sil, Unit::army(Germany));
        board.put(Vie, Unit::army(Italy));
        board.put(Tri, Unit::army(Italy));
        let j = judge(&board, &[
            // dislodge Bohemia from Munich
            (Germany, Order::mv(Mun, Boh)),
            (Germany, Order::support_move(Sil, Mun, Boh)),
            // standoff in Tyrolia
            (Italy, Order::mv(Vie, Tyr)),
            (Italy, Order::mv(Tri, Tyr)),
        ]);
        assert_eq!(j.retreats.len(), 1);
        let retreat = &j.retreats[0];
        assert_eq!(retreat.origin, Boh);
        let dests: Vec<Territory> = retreat.destinations.iter().map(|d| d.0).collect();
        assert!(!dests.contains(&Mun), "dislodger's origin is illegal");
        assert!(!dests.contains(&Tyr), "standoff territory is illegal");
        assert!(!dests.contains(&Vie), "occupied territory is illegal");
        assert_eq!(dests, vec![Gal]);
    }

    #[test]
    fn fleet_retreat_carries_landing_coast() {
        let mut board = Board::empty();
        board.put(Mar, Unit::fleet(France));
        board.put(Pie, Unit::army(Italy));
        board.put(Gas, Unit::army(Italy));
        board.put(Lyo, Unit::fleet(Italy));
        let j = judge(&board, &[
            (Italy, Order::mv(Pie, Mar)),
            (Italy, Order::support_move(Gas, Pie, Mar)),
            (Italy, Order::hold(Lyo)),
        ]);
        assert_eq!(j.retreats.len(), 1);
        let retreat = &j.retreats[0];
        assert_eq!(retreat.origin, Mar);
        assert_eq!(retreat.destinations, vec![(Spa, Coast::South)]);
    }

    #[test]
    fn every_order_gets_exactly_one_verdict() {
        let board = Board::standard_opening();
        let j = judge(&board, &[
            (France, Order::mv(Par, Bur)),
            (France, Order::mv(Mar, Spa)),
            (Germany, Order::mv(Mun, Bur)),
            (England, Order::mv(Lon, Nth)),
            (Russia, Order::hold(War)),
            (Austria, Order::hold(Vie)),
        ]);
        assert_eq!(j.orders.len(), 6);
        // Paris and Munich bounce in Burgundy
        assert_eq!(verdict_of(&j, Par), Verdict::Bounced { by: Mun });
        assert_eq!(verdict_of(&j, Mun), Verdict::Bounced { by: Par });
        assert!(j.standoffs.contains(&Bur));
        assert_eq!(verdict_of(&j, Mar), Verdict::Succeeds);
    }

    #[test]
    fn apply_movement_moves_and_removes() {
        let mut board = Board::empty();
        board.put(Par, Unit::army(France));
        board.put(Mar, Unit::army(France));
        board.put(Bur, Unit::army(Germany));
        let j = judge(&board, &[
            (France, Order::mv(Par, Bur)),
            (France, Order::support_move(Mar, Par, Bur)),
        ]);
        apply_movement(&mut board, &j);
        assert_eq!(board.occupier(Bur), Some(Unit::army(France)));
        assert_eq!(board.occupier(Par), None);
        // the dislodged German army is off the board, pending retreat
        assert_eq!(board.unit_count(Germany), 0);
    }

    #[test]
    fn apply_movement_sets_fleet_coast() {
        let mut board = Board::empty();
        board.put(Mao, Unit::fleet(France));
        let j = judge(&board, &[(France, Order::mv_coast(Mao, Spa, Coast::North))]);
        apply_movement(&mut board, &j);
        assert_eq!(board.occupier(Spa), Some(Unit::fleet_on(France, Coast::North)));
    }
}
