use actix_web::{web, App, HttpServer};
use backend::cache::RedisFetchCache;
use backend::dashboard::DashboardUseCaseImpl;
use backend::leaderboard::LeaderboardUseCaseImpl;
use backend::platforms::{HttpPlatformSource, PlatformSource};
use backend::user::{UserRepositoryImpl, UserUseCaseImpl};
use log::error;
use shared::FetchCache;
use std::sync::Arc;
use std::time::Duration;

const CACHE_KEY_PREFIX: &str = "cp_tracker";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().filter_or("LOG_LEVEL", "info"));

    let config = match backend::config::Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    let redis_client = match redis::Client::open(config.redis.url.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create Redis client: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string()));
        }
    };
    let redis_data = web::Data::new(redis_client.clone());

    let conn = match arangors::Connection::establish_basic_auth(
        &config.database.url,
        &config.database.username,
        &config.database.password,
    )
    .await
    {
        Ok(conn) => conn,
        Err(e) => {
            error!("Failed to connect to ArangoDB: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string()));
        }
    };

    let db = match conn.db(&config.database.name).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to get ArangoDB database: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()));
        }
    };
    let db_data = web::Data::new(db.clone());

    let platforms: Arc<dyn PlatformSource> = match HttpPlatformSource::new(&config.platforms) {
        Ok(source) => Arc::new(source),
        Err(e) => {
            error!("Failed to set up platform clients: {:#}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    let cache: Arc<dyn FetchCache> = Arc::new(RedisFetchCache::new(
        redis_client,
        CACHE_KEY_PREFIX,
        Duration::from_secs(config.redis.cache_ttl_seconds),
    ));

    let repo = UserRepositoryImpl::new(db);
    let users = web::Data::new(UserUseCaseImpl::new(repo.clone(), platforms.clone(), cache.clone()));
    let dashboard = web::Data::new(DashboardUseCaseImpl::new(repo.clone(), platforms.clone(), cache));
    let leaderboard = web::Data::new(LeaderboardUseCaseImpl::new(repo, platforms));

    let bind_addr = (config.server.host.clone(), config.server.port);
    let workers = config.server.workers;
    let cors_config = config.cors.clone();
    log::info!("Starting server on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .wrap(backend::middleware::Logger)
            .wrap(backend::middleware::cors_middleware(&cors_config))
            .app_data(web::JsonConfig::default().limit(64 * 1024))
            .app_data(redis_data.clone())
            .app_data(db_data.clone())
            .app_data(users.clone())
            .app_data(dashboard.clone())
            .app_data(leaderboard.clone())
            .service(backend::health::health_check)
            .service(backend::health::detailed_health_check)
            .configure(backend::user::controller::configure_routes::<UserRepositoryImpl>)
            .configure(backend::dashboard::controller::configure_routes::<UserRepositoryImpl>)
            .configure(backend::leaderboard::controller::configure_routes::<UserRepositoryImpl>)
    })
    .workers(workers)
    .bind(bind_addr)?
    .run()
    .await
}
