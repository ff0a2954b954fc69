use actix_web::web;

pub mod health;
pub mod realtime;
pub mod sessions;

/// Register every HTTP and websocket route. Shared by `main` and tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /api/health
    cfg.service(web::scope("/api/health").configure(health::configure_routes));

    // Sessions: /api/session/**
    cfg.service(web::scope("/api/session").configure(sessions::configure_routes));

    // Websocket upgrade: /ws
    cfg.configure(realtime::configure_routes);
}
