//! Use cases - multi-entity operations run against a single world.
//!
//! Each module orchestrates entity mutations, damage and broadcasts for one
//! gameplay feature. Everything here runs inside the world's own task.

pub mod combat;
pub mod toggle_effect;

pub use combat::{ProcOutcome, ProcRequest};
pub use toggle_effect::{toggle_effect, ToggleOutcome};
