#![allow(dead_code)]

pub mod logging;
pub mod outbox;
pub mod server;
pub mod websocket_client;

pub use outbox::{action, recv, recv_kind, spawn_session, RECV_TIMEOUT};
pub use server::start_test_server;
