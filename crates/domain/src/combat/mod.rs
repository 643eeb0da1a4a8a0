//! Combat math: mitigation and chain target selection.
//!
//! Area queries and the per-target damage callbacks live with the world,
//! which owns positions. This module only holds the pure rules.

mod chain;
mod damage;

pub use chain::{select_chain, CHAIN_LENGTH};
pub use damage::{compute_damage, effective_defense, Hit};
