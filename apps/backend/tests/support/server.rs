// Real HTTP server on a random port, for websocket clients.

use std::net::{SocketAddr, TcpListener};

use actix_web::{web, App, HttpServer};
use judgement::middleware::structured_logger::StructuredLogger;
use judgement::routes;
use judgement::state::app_state::AppState;

/// Returns the server handle (for a graceful stop), its address, and the
/// join handle of the background task running it.
pub async fn start_test_server(
    state: AppState,
) -> Result<
    (
        actix_web::dev::ServerHandle,
        SocketAddr,
        tokio::task::JoinHandle<Result<(), std::io::Error>>,
    ),
    Box<dyn std::error::Error>,
> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let state_data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state_data.clone())
            .wrap(StructuredLogger)
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)?
    .run();

    let server_handle = server.handle();
    let join = tokio::spawn(server);

    Ok((server_handle, addr, join))
}
