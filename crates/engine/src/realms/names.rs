//! Realm display names.

use realmsim_domain::RandomSource;

/// The names realms are drawn from at startup.
pub const DEFAULT_REALM_NAMES: [&str; 44] = [
    "Lich", "Goblin", "Ghost", "Giant", "Gorgon", "Blob", "Leviathan", "Unicorn", "Minotaur",
    "Cube", "Pirate", "Spider", "Snake", "Deathmage", "Gargoyle", "Scorpion", "Djinn", "Phoenix",
    "Satyr", "Drake", "Orc", "Flayer", "Cyclops", "Sprite", "Chimera", "Kraken", "Hydra", "Slime",
    "Ogre", "Hobbit", "Titan", "Medusa", "Golem", "Demon", "Skeleton", "Mummy", "Imp", "Bat",
    "Wyrm", "Spectre", "Reaper", "Beholder", "Dragon", "Harpy",
];

/// Pool of realm names. A name is either available or active, never both.
#[derive(Debug, Clone, Default)]
pub struct NamePool {
    available: Vec<String>,
    active: Vec<String>,
}

impl NamePool {
    /// Duplicate names are collapsed.
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut available: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !available.contains(&name) {
                available.push(name);
            }
        }
        Self {
            available,
            active: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_REALM_NAMES)
    }

    /// Move a random available name to the active set.
    pub fn take_random(&mut self, rng: &dyn RandomSource) -> Option<String> {
        if self.available.is_empty() {
            return None;
        }
        let upper = i32::try_from(self.available.len()).unwrap_or(i32::MAX);
        let index = usize::try_from(rng.gen_range(0, upper))
            .unwrap_or(0)
            .min(self.available.len() - 1);
        let name = self.available.swap_remove(index);
        self.active.push(name.clone());
        Some(name)
    }

    /// Return an active name to the pool. Unknown names are ignored.
    pub fn release(&mut self, name: &str) -> bool {
        let Some(index) = self.active.iter().position(|n| n == name) else {
            return false;
        };
        let name = self.active.swap_remove(index);
        self.available.push(name);
        true
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.iter().any(|n| n == name)
    }

    pub fn is_available(&self, name: &str) -> bool {
        self.available.iter().any(|n| n == name)
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedRandom;

    #[test]
    fn defaults_are_all_available() {
        let pool = NamePool::with_defaults();
        assert_eq!(pool.available_count(), 44);
        assert_eq!(pool.active_count(), 0);
        assert!(pool.is_available("Harpy"));
    }

    #[test]
    fn taken_names_are_exclusive_until_released() {
        let mut pool = NamePool::new(["Lich", "Goblin"]);
        let rng = FixedRandom { roll: 0.0, pick: 1 };

        let name = pool.take_random(&rng).expect("name");
        assert_eq!(name, "Goblin");
        assert!(pool.is_active("Goblin"));
        assert!(!pool.is_available("Goblin"));

        assert!(pool.release("Goblin"));
        assert!(!pool.release("Goblin"));
        assert!(pool.is_available("Goblin"));
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn exhausted_pool_yields_nothing() {
        let mut pool = NamePool::new(["Lich", "Lich"]);
        let rng = FixedRandom::never();
        assert_eq!(pool.available_count(), 1);
        assert!(pool.take_random(&rng).is_some());
        assert!(pool.take_random(&rng).is_none());
    }
}
