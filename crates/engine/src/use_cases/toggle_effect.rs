//! Admin-style condition toggle on a player.
//!
//! Permission checks happen in the command layer before this is reached.

use realmsim_domain::value_objects::ConditionKind;
use realmsim_domain::EntityId;
use realmsim_shared::ServerMessage;

use crate::world::{World, WorldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied(ConditionKind),
    Removed(ConditionKind),
}

/// Remove the named effect if the player has it, otherwise apply it
/// permanently. The player is told either way.
pub fn toggle_effect(
    world: &mut World,
    player: EntityId,
    effect: &str,
) -> Result<ToggleOutcome, WorldError> {
    world.require_player(player)?;

    let kind: ConditionKind = match effect.parse() {
        Ok(kind) => kind,
        Err(e) => {
            world.send_to_player(player, ServerMessage::error("Invalid effect!"));
            return Err(WorldError::Domain(e));
        }
    };

    let outcome = if world.remove_condition(player, kind)? {
        world.send_to_player(
            player,
            ServerMessage::info(format!("Your '{}' has been removed!", kind)),
        );
        ToggleOutcome::Removed(kind)
    } else {
        world.apply_condition(player, kind, 0)?;
        world.send_to_player(
            player,
            ServerMessage::info(format!("You have been given '{}'!", kind)),
        );
        ToggleOutcome::Applied(kind)
    };

    tracing::info!(
        world_id = %world.id(),
        player_id = %player,
        effect = %kind,
        outcome = ?outcome,
        "Effect toggled"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{enemy_at, player_at, test_world};
    use realmsim_domain::TickTime;

    #[test]
    fn toggling_twice_applies_then_removes() {
        let (mut world, recorder) = test_world();
        let player = world.add_entity(player_at(0.0, 0.0));

        assert_eq!(
            toggle_effect(&mut world, player, "invincible"),
            Ok(ToggleOutcome::Applied(ConditionKind::Invincible))
        );
        assert!(world
            .entity(player)
            .is_some_and(|p| p.has_condition(ConditionKind::Invincible)));

        assert_eq!(
            toggle_effect(&mut world, player, "Invincible"),
            Ok(ToggleOutcome::Removed(ConditionKind::Invincible))
        );
        assert_eq!(
            recorder.messages_for(player),
            vec![
                ServerMessage::info("You have been given 'Invincible'!"),
                ServerMessage::info("Your 'Invincible' has been removed!"),
            ]
        );
    }

    #[test]
    fn applied_effect_is_permanent() {
        let (mut world, _) = test_world();
        let player = world.add_entity(player_at(0.0, 0.0));
        toggle_effect(&mut world, player, "Slowed").expect("valid");

        world.tick(TickTime::new(1, 1000, 600_000));
        assert!(world
            .entity(player)
            .is_some_and(|p| p.has_condition(ConditionKind::Slowed)));
    }

    #[test]
    fn unknown_effect_is_rejected() {
        let (mut world, recorder) = test_world();
        let player = world.add_entity(player_at(0.0, 0.0));

        assert!(matches!(
            toggle_effect(&mut world, player, "Flying"),
            Err(WorldError::Domain(_))
        ));
        assert_eq!(
            recorder.messages_for(player),
            vec![ServerMessage::error("Invalid effect!")]
        );
    }

    #[test]
    fn only_players_can_be_toggled() {
        let (mut world, _) = test_world();
        let enemy = world.add_entity(enemy_at(1.0, 0.0, 100));
        assert_eq!(
            toggle_effect(&mut world, enemy, "Curse"),
            Err(WorldError::NotAPlayer { entity_id: enemy })
        );
    }
}
