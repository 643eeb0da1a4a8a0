//! Server-to-client message types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Primitive Wire Types
// =============================================================================

/// Packed `0xAARRGGBB` colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Argb(pub u32);

impl Argb {
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);
    pub const RED: Argb = Argb(0xFFFF_0000);
    pub const YELLOW: Argb = Argb(0xFFFF_FF00);
    pub const GREEN: Argb = Argb(0xFF00_FF00);
    pub const BLUE: Argb = Argb(0xFF00_00FF);
    pub const MAGENTA: Argb = Argb(0xFFD3_36B3);

    pub fn from_rgb(rgb: u32) -> Self {
        Argb(0xFF00_0000 | (rgb & 0x00FF_FFFF))
    }
}

/// World coordinates as they appear on the wire. Effects also use the
/// fields as free parameters (radius, duration).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WirePosition {
    pub x: f32,
    pub y: f32,
}

impl WirePosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Visual effect kinds understood by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectType {
    Potion,
    Trail,
    Diffuse,
    Flow,
    Lightning,
    AreaBlast,
    /// Unknown effect for forward compatibility
    #[serde(other)]
    Unknown,
}

/// One changed stat inside a stats update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatUpdate {
    /// Stat wire code
    pub code: u8,
    pub value: i32,
}

// =============================================================================
// Server Messages (Simulation → Client)
// =============================================================================

/// Messages from the simulation to a player's connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// A hit landed on `target_id`
    Damage {
        target_id: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_id: Option<Uuid>,
        amount: i32,
        kill: bool,
    },
    /// Visual effect anchored on `target_id`
    ShowEffect {
        effect_type: EffectType,
        target_id: Uuid,
        color: Argb,
        #[serde(default)]
        pos1: WirePosition,
        #[serde(default)]
        pos2: WirePosition,
    },
    /// Floating text above `object_id`
    Notification {
        object_id: Uuid,
        /// Player that caused it, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player_id: Option<Uuid>,
        message: String,
        color: Argb,
    },
    /// Coalesced stat changes for one entity
    StatsUpdate {
        object_id: Uuid,
        stats: Vec<StatUpdate>,
    },
    /// Chat-box info line
    Info { message: String },
    /// Chat-box error line
    Error { message: String },
    /// Unknown message type for forward compatibility
    ///
    /// When deserializing an unknown variant, this variant is used instead of
    /// failing. Allows older clients to gracefully handle new message types.
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn messages_are_tagged_by_type() {
        let msg = ServerMessage::info("You have been given 'Invincible'!");
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["type"], "Info");
        assert_eq!(json["message"], "You have been given 'Invincible'!");
    }

    #[test]
    fn show_effect_uses_camel_case_effect_names() {
        let msg = ServerMessage::ShowEffect {
            effect_type: EffectType::AreaBlast,
            target_id: Uuid::nil(),
            color: Argb::YELLOW,
            pos1: WirePosition::new(1.5, 0.0),
            pos2: WirePosition::default(),
        };
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["effect_type"], "areaBlast");
        assert_eq!(json["color"], 0xFFFF_FF00u32);
    }

    #[test]
    fn damage_omits_missing_source() {
        let msg = ServerMessage::Damage {
            target_id: Uuid::nil(),
            source_id: None,
            amount: 40,
            kill: false,
        };
        let json = serde_json::to_string(&msg).expect("serialize");
        assert!(!json.contains("source_id"));
    }

    #[test]
    fn unknown_message_type_deserializes_to_unknown() {
        let decoded: ServerMessage =
            serde_json::from_str(r#"{"type":"Teleport"}"#).expect("deserialize");
        assert_eq!(decoded, ServerMessage::Unknown);
    }

    #[test]
    fn rgb_gets_opaque_alpha() {
        assert_eq!(Argb::from_rgb(0x82D9BC), Argb(0xFF82_D9BC));
    }
}
