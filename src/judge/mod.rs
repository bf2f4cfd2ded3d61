//! The adjudicator: pure functions from (board, orders) to verdicts.
//!
//! Movement resolution never mutates the board; callers apply results
//! afterwards. Retreat and Build phases have their own, much simpler,
//! adjudicators.

pub mod build;
pub mod movement;
pub mod retreat;

pub use build::{adjudicate_adjustments, apply_adjustments, quotas, AdjustmentError, Quota};
pub use movement::{adjudicate_movement, apply_movement};
pub use retreat::{adjudicate_retreats, apply_retreats};

use std::fmt;

use serde::Serialize;

use crate::board::Unit;
use crate::map::{Coast, Nation, Territory};
use crate::orders::Order;

/// Why an order was excluded from resolution entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VoidReason {
    /// No unit stands at the order's origin.
    VacantOrigin,
    /// The unit at the origin belongs to someone else.
    ForeignUnit,
    /// The geometry is impossible for this unit.
    Unreachable,
    /// The order would dislodge the nation's own stationary unit.
    SelfDislodgement,
    /// The order kind does not belong to the current phase.
    WrongPhase,
    /// Build outside the nation's home centers.
    NotAHomeCenter,
    /// Build on a home center currently owned by another power.
    NotOwned,
    /// Build on an occupied center.
    Occupied,
    /// Fleet build on a bicoastal center without a named coast.
    CoastRequired,
    /// Coast given where none applies, or a coast the territory lacks.
    BadCoast,
    /// Fleet build on an inland center.
    TerrainMismatch,
    /// More builds than the nation is entitled to.
    TooManyBuilds,
}

impl fmt::Display for VoidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VoidReason::VacantOrigin => "no unit at origin",
            VoidReason::ForeignUnit => "unit belongs to another nation",
            VoidReason::Unreachable => "destination unreachable",
            VoidReason::SelfDislodgement => "would dislodge own unit",
            VoidReason::WrongPhase => "order not valid in this phase",
            VoidReason::NotAHomeCenter => "not a home supply center",
            VoidReason::NotOwned => "home center not currently owned",
            VoidReason::Occupied => "territory occupied",
            VoidReason::CoastRequired => "a named coast is required",
            VoidReason::BadCoast => "invalid coast",
            VoidReason::TerrainMismatch => "unit kind cannot exist there",
            VoidReason::TooManyBuilds => "no builds remaining",
        };
        f.write_str(s)
    }
}

/// Outcome of a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Succeeds,
    Fails,
    /// A move that lost a strength contest; `by` names the strongest
    /// contender (the defended territory, or a rival's origin).
    Bounced { by: Territory },
    Void(VoidReason),
}

impl Verdict {
    pub fn succeeded(self) -> bool {
        self == Verdict::Succeeds
    }
}

/// One submitted order together with its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JudgedOrder {
    pub nation: Nation,
    pub order: Order,
    pub verdict: Verdict,
}

/// A dislodged unit awaiting retreat orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Retreat {
    /// Where the unit was dislodged from.
    pub origin: Territory,
    pub unit: Unit,
    /// Origin of the attack that dislodged it; retreating there is illegal.
    pub attacker_from: Territory,
    /// Legal retreat destinations, with landing coast for fleets.
    pub destinations: Vec<(Territory, Coast)>,
}

/// Complete result of movement adjudication.
#[derive(Debug, Clone, Serialize)]
pub struct Judgement {
    /// One verdict per submitted order, in display order.
    pub orders: Vec<JudgedOrder>,
    /// Each dislodged territory appears exactly once.
    pub retreats: Vec<Retreat>,
    /// Territories left vacant by a bounce; retreats may not enter them.
    pub standoffs: Vec<Territory>,
}
