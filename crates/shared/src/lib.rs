//! RealmSim Shared - Outbound message types
//!
//! This crate contains the message shapes the simulation hands to the
//! connection layer. Packet encoding is somebody else's job; these types
//! only fix the fields and their serde representation.
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and uuid
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs** - use raw `uuid::Uuid` in messages

pub mod messages;

pub use messages::{Argb, EffectType, ServerMessage, StatUpdate, WirePosition};
