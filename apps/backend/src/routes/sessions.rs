use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    session_id: String,
    players: Vec<String>,
}

async fn create_session(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let handle = app_state.sessions.create();
    Ok(HttpResponse::Ok().json(SessionResponse {
        session_id: handle.id().to_string(),
        players: Vec::new(),
    }))
}

async fn get_session(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let handle = app_state
        .sessions
        .get(&id)
        .filter(|handle| !handle.is_cancelled())
        .ok_or_else(|| {
            AppError::not_found(ErrorCode::SessionNotFound, format!("Session {id} not found"))
        })?;

    Ok(HttpResponse::Ok().json(SessionResponse {
        session_id: id,
        players: handle.player_names(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_session));
    cfg.route("/{id}", web::get().to(get_session));
}
