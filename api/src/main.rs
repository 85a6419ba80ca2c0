use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenvy::dotenv;
use log::info;
use std::env;
use std::sync::Arc;

use cs_api::middleware::auth::AuthenticateRequest;
use cs_api::{app, middleware, routes};
use cs_core::domain::entities::user::{User, UserRole};
use cs_core::repositories::{InMemoryTokenRepository, InMemoryUserRepository};
use cs_core::services::password::hash_password;
use cs_core::services::{AuthService, InMemoryTokenBlacklist, TokenService, TokenServiceConfig};
use cs_shared::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting CraftSite API Server");

    // Load configuration
    let config = AppConfig::from_env();
    if config.auth.jwt.is_using_default_secret() {
        log::warn!(
            "JWT secrets are using built-in defaults; set JWT_ACCESS_SECRET and JWT_REFRESH_SECRET"
        );
    }

    // Wire up the in-memory stores and services
    let user_repository = Arc::new(InMemoryUserRepository::new());
    seed_users(&user_repository).await;

    let token_repository = Arc::new(InMemoryTokenRepository::new());
    let blacklist = Arc::new(InMemoryTokenBlacklist::new());
    let token_service = Arc::new(TokenService::new(TokenServiceConfig::from(&config.auth.jwt)));

    let auth_service = Arc::new(AuthService::new(
        user_repository,
        token_repository,
        blacklist,
        token_service,
    ));
    let auth_gate: Arc<dyn AuthenticateRequest> = auth_service.clone();

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(middleware::cors::create_cors())
            .app_data(web::Data::new(routes::AppState {
                auth_service: auth_service.clone(),
            }))
            .app_data(web::Data::new(auth_gate.clone()))
            .route("/health", web::get().to(app::health_check))
            .configure(
                routes::configure::<
                    InMemoryUserRepository,
                    InMemoryTokenRepository,
                    InMemoryTokenBlacklist,
                >,
            )
            .default_service(web::route().to(app::not_found))
    })
    .bind(&bind_address)?
    .run()
    .await
}

/// Seeds the in-memory user store.
///
/// Credentials come from the environment so the defaults never reach a
/// deployment unnoticed.
async fn seed_users(repository: &InMemoryUserRepository) {
    let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    let hash = hash_password(&admin_password).expect("failed to hash seed password");
    let admin = User::new(&admin_username, hash, UserRole::Admin);

    info!("Seeded admin user: {}", admin.username);
    repository.insert(admin).await;
}
