//! Sessions: a player registry, bounded queues and one actor task that owns
//! the game.

pub mod actor;
pub mod handle;
pub mod player;
pub mod store;

pub use actor::SessionActor;
pub use handle::{PlayerConnection, SessionError, SessionHandle};
pub use player::PlayerRegistry;
pub use store::SessionStore;
