//! Entity lifecycle state enum

use serde::{Deserialize, Serialize};

/// Entity lifecycle state
///
/// # State Transitions
///
/// ```text
/// Alive -> Dead (death, exactly once)
/// Dead  -> (terminal)
/// ```
///
/// # Examples
///
/// ```
/// use realmsim_domain::value_objects::EntityState;
///
/// let state = EntityState::Alive;
/// assert!(state.is_alive());
/// assert!(EntityState::Dead.is_dead());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityState {
    /// Entity is in the world and ticking
    #[default]
    Alive,
    /// Entity has died; terminal
    Dead,
}

impl EntityState {
    #[inline]
    pub fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }

    #[inline]
    pub fn is_dead(self) -> bool {
        matches!(self, Self::Dead)
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alive => write!(f, "alive"),
            Self::Dead => write!(f, "dead"),
        }
    }
}
