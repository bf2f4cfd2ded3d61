//! The standard board: territory registry and adjacency graph.
//!
//! Everything in this module is immutable compile-time data. Mutable game
//! position lives in [`crate::board`].

mod graph;
mod territory;

pub use graph::{coasts_into, links_from, neighbours, reachable, Link};
pub use territory::{
    Coast, Nation, NationSet, Terrain, Territory, ALL_NATIONS, ALL_TERRITORIES, TERRITORY_COUNT,
};
