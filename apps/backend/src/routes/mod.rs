use actix_web::web;

pub mod fighters;
pub mod health;
pub mod realtime;

/// Register every route. `main.rs` and the integration tests share this.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes);
    cfg.service(web::scope("/api/fighters").configure(fighters::configure_routes));
    cfg.configure(realtime::configure_routes);
}
