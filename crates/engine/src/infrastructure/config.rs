//! Application configuration

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use realmsim_domain::value_objects::Position;

/// Application configuration loaded from environment
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Fixed period between world ticks
    pub tick_interval_ms: u64,
    /// Upper bound on the delta fed to a single tick
    pub max_tick_delta_ms: u32,
    /// Period of the realm registry update (scaling + portal names)
    pub registry_update_ms: u64,
    /// Hard cap on concurrently active realms
    pub max_realms: usize,
    /// Player capacity shown on each realm portal
    pub realm_max_players: usize,
    /// Radius within which players receive broadcasts
    pub sight_radius: f32,
    /// Seconds before a realm closes its portal (0 = never)
    pub realm_lifetime_secs: u64,
    /// Hub positions portals are placed on
    pub portal_spots: Vec<Position>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            max_tick_delta_ms: 1000,
            registry_update_ms: 1000,
            max_realms: 4,
            realm_max_players: 85,
            sight_radius: 15.0,
            realm_lifetime_secs: 0,
            portal_spots: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            tick_interval_ms: parse_or(&lookup, "TICK_INTERVAL_MS", defaults.tick_interval_ms)?,
            max_tick_delta_ms: parse_or(&lookup, "MAX_TICK_DELTA_MS", defaults.max_tick_delta_ms)?,
            registry_update_ms: parse_or(
                &lookup,
                "REGISTRY_UPDATE_MS",
                defaults.registry_update_ms,
            )?,
            max_realms: parse_or(&lookup, "MAX_REALMS", defaults.max_realms)?,
            realm_max_players: parse_or(&lookup, "REALM_MAX_PLAYERS", defaults.realm_max_players)?,
            sight_radius: parse_or(&lookup, "SIGHT_RADIUS", defaults.sight_radius)?,
            realm_lifetime_secs: parse_or(
                &lookup,
                "REALM_LIFETIME_SECS",
                defaults.realm_lifetime_secs,
            )?,
            portal_spots: match lookup("PORTAL_SPOTS") {
                Some(raw) => parse_portal_spots(&raw)?,
                None => defaults.portal_spots,
            },
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got {raw:?}")),
        None => Ok(default),
    }
}

/// Parse `x:y;x:y` into positions. Empty segments are skipped.
fn parse_portal_spots(raw: &str) -> Result<Vec<Position>> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|spot| {
            let (x, y) = spot
                .split_once(':')
                .with_context(|| format!("PORTAL_SPOTS entry {spot:?} must be x:y"))?;
            let x: f32 = x
                .trim()
                .parse()
                .with_context(|| format!("PORTAL_SPOTS entry {spot:?} has an invalid x"))?;
            let y: f32 = y
                .trim()
                .parse()
                .with_context(|| format!("PORTAL_SPOTS entry {spot:?} has an invalid y"))?;
            Ok(Position::new(x, y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.tick_interval_ms, 200);
        assert_eq!(config.realm_max_players, 85);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("TICK_INTERVAL_MS", "50"),
            ("MAX_REALMS", " 2 "),
            ("SIGHT_RADIUS", "20.5"),
            ("PORTAL_SPOTS", "10:12; 14.5:12;"),
        ]))
        .expect("config");

        assert_eq!(config.tick_interval_ms, 50);
        assert_eq!(config.max_realms, 2);
        assert!((config.sight_radius - 20.5).abs() < f32::EPSILON);
        assert_eq!(
            config.portal_spots,
            vec![Position::new(10.0, 12.0), Position::new(14.5, 12.0)]
        );
    }

    #[test]
    fn invalid_numbers_are_reported() {
        let err = AppConfig::from_lookup(lookup(&[("MAX_REALMS", "lots")]))
            .expect_err("should fail");
        assert!(err.to_string().contains("MAX_REALMS"));
    }

    #[test]
    fn malformed_portal_spot_is_reported() {
        assert!(AppConfig::from_lookup(lookup(&[("PORTAL_SPOTS", "10-12")])).is_err());
    }
}
