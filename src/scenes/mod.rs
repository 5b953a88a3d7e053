//=========================================================================
// Demo Scenes
//=========================================================================
//
// The lobby plus the three demos it links to. `registry_builder` wires
// all of them into a scene registry.
//
//   lobby ──┬─ aceofshadows   card stacks (transfer queues)
//           ├─ magicwords     scripted dialogue (async payload)
//           └─ phoenixflame   particle fire
//
//=========================================================================

mod ace_of_shadows;
mod lobby;
mod magic_words;
mod phoenix_flame;

pub use ace_of_shadows::{stack_origin, AceOfShadows, Card, DECK_SIZE};
pub use lobby::{scene_id_for, Lobby, MenuEntry, MENU_ENTRIES};
pub use magic_words::{
    avatar_anchor, parse_segments, render_segments, Avatar, Character, DialogueError,
    DialogueLine, DialoguePayload, DialogueSource, Emoji, MagicWords, Segment,
    DIALOGUE_DELAY_MS, NARRATOR, RESTART_DELAY_MS,
};
pub use phoenix_flame::{Flame, PhoenixFlame, MAX_FLAMES, SEQUENCE_FRAMES, SPREAD};

use crate::core::scene::{SceneRegistryBuilder, UnknownScenePolicy};

pub const ACE_OF_SHADOWS: &str = "aceofshadows";
pub const MAGIC_WORDS: &str = "magicwords";
pub const PHOENIX_FLAME: &str = "phoenixflame";

//=== SceneOptions ========================================================

/// Settings handed to the demo scene factories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneOptions {
    pub dialogue_source: DialogueSource,
    /// Seed for every scene's randomness; entropy when `None`.
    pub seed: Option<u64>,
    pub unknown_scene_policy: UnknownScenePolicy,
}

/// Registry builder with the lobby and every demo registered.
pub fn registry_builder(options: &SceneOptions) -> SceneRegistryBuilder {
    SceneRegistryBuilder::new(Lobby::factory())
        .register(ACE_OF_SHADOWS, AceOfShadows::factory(options.seed))
        .register(MAGIC_WORDS, MagicWords::factory(options.dialogue_source.clone()))
        .register(PHOENIX_FLAME, PhoenixFlame::factory(options.seed))
        .with_unknown_scene_policy(options.unknown_scene_policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, ShellInput};
    use crate::core::scene::MENU_SCENE;
    use crate::core::surface::HeadlessSurface;

    #[test]
    fn menu_entries_match_registered_ids() {
        let ids: Vec<String> = MENU_ENTRIES.iter().map(|n| scene_id_for(n)).collect();
        assert_eq!(ids, vec![ACE_OF_SHADOWS, MAGIC_WORDS, PHOENIX_FLAME]);

        let registry = registry_builder(&SceneOptions::default())
            .build(HeadlessSurface::new(800.0, 600.0));
        assert!(ids.iter().all(|id| registry.is_registered(id)));
    }

    #[test]
    fn lobby_selection_round_trip() {
        let options = SceneOptions {
            seed: Some(1),
            ..SceneOptions::default()
        };
        let mut registry = registry_builder(&options).build(HeadlessSurface::new(800.0, 600.0));
        registry.exit_to_menu().expect("menu");

        registry.handle_input(&ShellInput::KeyDown(KeyCode::Digit1));
        assert!(registry.tick(1.0).is_empty());
        assert_eq!(registry.active_scene_id(), Some(ACE_OF_SHADOWS));

        registry.handle_input(&ShellInput::KeyDown(KeyCode::Escape));
        registry.tick(1.0);
        assert_eq!(registry.active_scene_id(), Some(MENU_SCENE));

        registry.handle_input(&ShellInput::KeyDown(KeyCode::Digit3));
        registry.tick(1.0);
        assert_eq!(registry.active_scene_id(), Some(PHOENIX_FLAME));
    }
}
