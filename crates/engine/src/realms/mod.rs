//! Realm instances reachable from the hub through portals.

mod names;
mod registry;

pub use names::{NamePool, DEFAULT_REALM_NAMES};
pub use registry::{portal_label, Portal, RealmRegistry, MAX_PER_REALM};
