//! Domain Events
//!
//! Return types from entity mutations, communicating what happened when
//! state was modified. The domain does not log or broadcast; the engine maps
//! these outcomes onto messages, counters and hooks.

pub mod entity_events;

pub use entity_events::*;
