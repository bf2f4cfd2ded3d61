//! Diplomacy game tracker with automatic order adjudication.
//!
//! The crate is organised around four layers:
//!
//! - [`map`] — the static standard board: territories, nations, and the
//!   adjacency graph with coast-aware fleet edges.
//! - [`board`] — mutable game position: units, supply-center ownership,
//!   derived counts.
//! - [`orders`] + [`judge`] — pending order bookkeeping and the pure
//!   simultaneous-movement adjudicator (guess-and-check resolution).
//! - [`game`] — the turn state machine tying it all together:
//!   Movement → Retreat → Build phases, date advancement, quotas, victory.
//!
//! Parsing, printing and interactive command handling are deliberately out
//! of scope; an embedding front end drives [`game::Game`] directly.

pub mod board;
pub mod game;
pub mod judge;
pub mod map;
pub mod orders;

pub use board::{Board, Unit, UnitKind};
pub use game::{Date, Game, GameError, Phase, Season, TurnReport};
pub use judge::{Judgement, JudgedOrder, Retreat, Verdict, VoidReason};
pub use map::{Coast, Nation, NationSet, Terrain, Territory};
pub use orders::{Order, OrderKind, OrderSet, OrderSetError};
