//! Domain layer: pure game logic types and helpers.

pub mod cards_logic;
pub mod cards_types;
pub mod cycler;
pub mod dealing;
pub mod machine;
pub mod rules;
pub mod scoring;
pub mod state;
pub mod tricks;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_props_legality;

// Re-exports for ergonomics
pub use cards_logic::{card_beats, hand_has_suit};
pub use cards_types::{Card, Rank, Suit};
pub use cycler::{CyclerError, PlayerCycler};
pub use dealing::{deal_hands, Hand};
pub use machine::{game_machine, GameMachine, PhaseEvent, StateMachine, TransitionError};
pub use scoring::Scoreboard;
pub use state::{GamePlayer, GameState, Phase, PlayerId};
