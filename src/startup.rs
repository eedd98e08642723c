use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::configuration::{JwtSettings, PasswordSettings};
use crate::error::AppError;
use crate::logger::RequestLogger;
use crate::routes::{health_check, refresh, sign_in, sign_up};
use crate::store::UserStore;

/// Body parse failures answer in the same `errorMessage` shape as the
/// handlers.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

pub fn run(
    listener: TcpListener,
    store: Arc<dyn UserStore>,
    jwt_config: JwtSettings,
    password_config: PasswordSettings,
) -> Result<Server, std::io::Error> {
    let store: web::Data<dyn UserStore> = web::Data::from(store);
    let jwt_config = web::Data::new(jwt_config);
    let password_config = web::Data::new(password_config);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            .app_data(json_config())
            .app_data(store.clone())
            .app_data(jwt_config.clone())
            .app_data(password_config.clone())
            .route("/health_check", web::get().to(health_check))
            .route("/sign-up", web::post().to(sign_up))
            .route("/sign-in", web::post().to(sign_in))
            .route("/refresh", web::post().to(refresh))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
