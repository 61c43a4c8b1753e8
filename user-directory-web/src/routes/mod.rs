//! HTTP routes

mod health;
mod users;

use actix_web::{web, HttpRequest};

use crate::error::ApiError;

/// Register every route plus the JSON body error handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
            ApiError::InvalidBody(err.to_string()).into()
        }),
    )
    .service(
        web::scope("/api/users")
            .route("", web::get().to(users::list_users))
            .route("", web::post().to(users::create_user))
            .route("/fields", web::get().to(users::list_fields))
            .route("/{id}", web::get().to(users::get_user))
            .route("/{id}", web::put().to(users::update_user))
            .route("/{id}", web::delete().to(users::delete_user)),
    )
    .route("/health", web::get().to(health::health));
}
