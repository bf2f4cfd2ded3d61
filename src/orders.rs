//! Pending order bookkeeping.
//!
//! Orders are kept per nation in registration order. A nation has at most
//! one live order per origin territory: registering a second order for the
//! same origin overwrites the first in place, keeping its position. Display
//! numbering is global and 1-based, walking nations in canonical enum order;
//! it is recomputed on demand and never stored.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::board::UnitKind;
use crate::map::{Coast, Nation, Territory, ALL_NATIONS};

/// What a unit (or nation, for builds) is told to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderKind {
    Hold,
    Move {
        dest: Territory,
        dest_coast: Coast,
        via_convoy: bool,
    },
    SupportHold {
        target: Territory,
    },
    SupportMove {
        from: Territory,
        to: Territory,
    },
    Convoy {
        from: Territory,
        to: Territory,
    },
    Build {
        kind: UnitKind,
        coast: Coast,
    },
    Disband,
}

/// An order keyed by its origin territory. During the Retreat phase a
/// `Move` names the retreat destination; during Build, `origin` is the
/// territory built in or disbanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Order {
    pub origin: Territory,
    pub kind: OrderKind,
}

impl Order {
    pub fn hold(origin: Territory) -> Order {
        Order { origin, kind: OrderKind::Hold }
    }

    pub fn mv(origin: Territory, dest: Territory) -> Order {
        Order { origin, kind: OrderKind::Move { dest, dest_coast: Coast::None, via_convoy: false } }
    }

    pub fn mv_coast(origin: Territory, dest: Territory, dest_coast: Coast) -> Order {
        Order { origin, kind: OrderKind::Move { dest, dest_coast, via_convoy: false } }
    }

    pub fn mv_via_convoy(origin: Territory, dest: Territory) -> Order {
        Order { origin, kind: OrderKind::Move { dest, dest_coast: Coast::None, via_convoy: true } }
    }

    pub fn support_hold(origin: Territory, target: Territory) -> Order {
        Order { origin, kind: OrderKind::SupportHold { target } }
    }

    pub fn support_move(origin: Territory, from: Territory, to: Territory) -> Order {
        Order { origin, kind: OrderKind::SupportMove { from, to } }
    }

    pub fn convoy(origin: Territory, from: Territory, to: Territory) -> Order {
        Order { origin, kind: OrderKind::Convoy { from, to } }
    }

    pub fn build(origin: Territory, kind: UnitKind) -> Order {
        Order { origin, kind: OrderKind::Build { kind, coast: Coast::None } }
    }

    pub fn build_fleet_on(origin: Territory, coast: Coast) -> Order {
        Order { origin, kind: OrderKind::Build { kind: UnitKind::Fleet, coast } }
    }

    pub fn disband(origin: Territory) -> Order {
        Order { origin, kind: OrderKind::Disband }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.origin.abbr();
        match self.kind {
            OrderKind::Hold => write!(f, "{o} H"),
            OrderKind::Move { dest, dest_coast, via_convoy } => {
                write!(f, "{o}-{}{}", dest.abbr(), dest_coast.abbr())?;
                if via_convoy {
                    write!(f, " VIA C")?;
                }
                Ok(())
            }
            OrderKind::SupportHold { target } => write!(f, "{o} S {}", target.abbr()),
            OrderKind::SupportMove { from, to } => {
                write!(f, "{o} S {}-{}", from.abbr(), to.abbr())
            }
            OrderKind::Convoy { from, to } => write!(f, "{o} C {}-{}", from.abbr(), to.abbr()),
            OrderKind::Build { kind, coast } => {
                write!(f, "{o} B {}{}", kind.letter(), coast.abbr())
            }
            OrderKind::Disband => write!(f, "{o} D"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderSetError {
    #[error("no such order: {0}")]
    NoSuchOrder(usize),
}

/// Per-nation order lists with global 1-based numbering.
#[derive(Debug, Clone, Default)]
pub struct OrderSet {
    by_nation: [Vec<Order>; 7],
}

impl OrderSet {
    pub fn new() -> OrderSet {
        OrderSet::default()
    }

    pub fn len(&self) -> usize {
        self.by_nation.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_nation.iter().all(Vec::is_empty)
    }

    /// Register an order. Overwrites any existing order with the same
    /// origin in place; the slot keeps its registration position.
    pub fn set(&mut self, nation: Nation, order: Order) {
        let list = &mut self.by_nation[nation.index()];
        match list.iter_mut().find(|o| o.origin == order.origin) {
            Some(slot) => *slot = order,
            None => list.push(order),
        }
    }

    pub fn find(&self, nation: Nation, origin: Territory) -> Option<&Order> {
        self.by_nation[nation.index()]
            .iter()
            .find(|o| o.origin == origin)
    }

    pub fn orders_of(&self, nation: Nation) -> &[Order] {
        &self.by_nation[nation.index()]
    }

    /// All orders in display order: nations canonical, registration order
    /// within each nation.
    pub fn entries(&self) -> impl Iterator<Item = (Nation, Order)> + '_ {
        ALL_NATIONS
            .into_iter()
            .flat_map(|n| self.by_nation[n.index()].iter().map(move |o| (n, *o)))
    }

    /// Numbered listing, optionally restricted to one nation. The numbers
    /// are the global ones `delete` accepts, also when filtered.
    pub fn list(&self, nation: Option<Nation>) -> Vec<(usize, Nation, Order)> {
        self.entries()
            .enumerate()
            .filter(|(_, (n, _))| nation.map_or(true, |want| *n == want))
            .map(|(i, (n, o))| (i + 1, n, o))
            .collect()
    }

    /// Delete by inclusive 1-based ranges over the global numbering.
    ///
    /// Range bounds are checked before anything is expanded; if any
    /// requested index is invalid (zero, or past the last order) the
    /// smallest invalid one is reported and nothing is deleted. Returns
    /// how many orders were removed.
    pub fn delete(&mut self, ranges: &[(usize, usize)]) -> Result<usize, OrderSetError> {
        let total = self.len();
        let mut bad: Option<usize> = None;
        for &(a, b) in ranges {
            if a > b {
                continue;
            }
            let invalid = if a == 0 {
                Some(0)
            } else if b > total {
                Some(a.max(total + 1))
            } else {
                None
            };
            if let Some(i) = invalid {
                bad = Some(bad.map_or(i, |seen| seen.min(i)));
            }
        }
        if let Some(i) = bad {
            return Err(OrderSetError::NoSuchOrder(i));
        }

        let mut indices: Vec<usize> = Vec::new();
        for &(a, b) in ranges {
            for i in a..=b {
                indices.push(i);
            }
        }
        indices.sort_unstable();
        indices.dedup();

        let removed = indices.len();
        let mut next = indices.into_iter().peekable();
        let mut global = 0usize;
        for list in &mut self.by_nation {
            list.retain(|_| {
                global += 1;
                if next.peek() == Some(&global) {
                    next.next();
                    false
                } else {
                    true
                }
            });
        }
        Ok(removed)
    }

    pub fn clear(&mut self) {
        for list in &mut self.by_nation {
            list.clear();
        }
    }
}
