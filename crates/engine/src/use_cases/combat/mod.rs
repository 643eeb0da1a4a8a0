//! Combat use cases that span several entities in a world.

mod procs;

pub use procs::{
    demonized, electrify, heal_player, vampire_blast, vampiric_chance, ProcOutcome, ProcRequest,
    DEMONIZED_CHANCE, ELECTRIFY_CHANCE, VAMPIRIC_BASE_CHANCE,
};
