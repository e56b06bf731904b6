mod config;
mod db;
mod dtos;
mod error;
mod filter;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::{sync::Arc, time::Duration};

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::{
    db::{admindb::AdminExt, db::DBClient},
    service::{
        analytics::AnalyticsClient,
        directory_service::DirectoryService,
        engagement_service::EngagementService,
        listing_service::ListingService,
        property_service::PropertyService,
        storage::{ImageStore, StorageClient},
    },
    utils::password,
};

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    // Services
    pub listing_service: Arc<ListingService>,
    pub property_service: Arc<PropertyService>,
    pub directory_service: Arc<DirectoryService>,
    pub engagement_service: Arc<EngagementService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        let storage: Arc<dyn ImageStore> = Arc::new(StorageClient::new(
            config.storage_url.clone(),
            config.storage_service_key.clone(),
        ));
        let analytics = Arc::new(AnalyticsClient::new(config.analytics_url.clone()));

        let listing_service = Arc::new(ListingService::new(
            db_client_arc.clone(),
            config.default_agent.clone(),
        ));
        let property_service = Arc::new(PropertyService::new(
            db_client_arc.clone(),
            storage.clone(),
            config.property_image_bucket.clone(),
        ));
        let directory_service = Arc::new(DirectoryService::new(
            db_client_arc.clone(),
            storage,
            config.agent_image_bucket.clone(),
        ));
        let engagement_service = Arc::new(EngagementService::new(db_client_arc.clone(), analytics));

        Self {
            env: config,
            db_client: db_client_arc,
            listing_service,
            property_service,
            directory_service,
            engagement_service,
        }
    }
}

/// Creates or refreshes the admin account named in the environment.
async fn bootstrap_admin(db_client: &DBClient, config: &Config) {
    let (Some(email), Some(admin_password)) = (&config.admin_email, &config.admin_password) else {
        return;
    };

    let hashed = match password::hash(admin_password.as_str()) {
        Ok(hashed) => hashed,
        Err(e) => {
            tracing::error!("Cannot hash ADMIN_PASSWORD: {}", e);
            return;
        }
    };

    match db_client.upsert_admin(email, "Administrator", &hashed).await {
        Ok(admin) => tracing::info!("Admin account {} is ready", admin.email),
        Err(e) => tracing::error!("Failed to bootstrap admin {}: {}", email, e),
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = Config::init();
    let log_level = config
        .as_ref()
        .map(|c| c.log_level)
        .unwrap_or(LevelFilter::DEBUG);

    tracing_subscriber::fmt().with_max_level(log_level).init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connection to the database is successful");
            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);
    bootstrap_admin(&db_client, &config).await;

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    let app = create_router(app_state).layer(cors);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind port {}: {}", config.port, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server is running on http://localhost:{}", config.port);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
