//! Read-only catalog views for lobby pages.

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::domain::FighterCatalogEntry;
use crate::error::AppError;
use crate::errors::DomainError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct AvailabilityResponse {
    available: Vec<FighterCatalogEntry>,
    reserved: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FighterResponse {
    fighter: FighterCatalogEntry,
    available: bool,
}

async fn list(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let (available, reserved) = app_state.arena.fighter_availability();
    Ok(HttpResponse::Ok().json(AvailabilityResponse {
        available,
        reserved,
    }))
}

async fn show(
    app_state: web::Data<AppState>,
    name: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let name = name.into_inner();
    let fighter = app_state
        .arena
        .catalog()
        .find(&name)
        .cloned()
        .ok_or(DomainError::UnknownFighter(name))?;
    let (available, _) = app_state.arena.fighter_availability();
    let available = available.iter().any(|f| f.name == fighter.name);
    Ok(HttpResponse::Ok().json(FighterResponse { fighter, available }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list))
        .route("/{name}", web::get().to(show));
}
