use tokio_util::sync::CancellationToken;

use crate::domain::PlayerId;
use crate::protocol::GameEvent;

/// A connected session player as seen by the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentPlayer {
    pub id: PlayerId,
    pub name: String,
}

impl PresentPlayer {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// What a running game needs from the session that hosts it.
pub trait GameHost {
    /// Players connected right now, in join order.
    fn current_players(&self) -> Vec<PresentPlayer>;

    /// Hand an outbound event to the session for fan-out.
    fn emit(&mut self, event: GameEvent);

    /// The session's cancellation scope. Games derive a child from it.
    fn cancellation_signal(&self) -> CancellationToken;
}
