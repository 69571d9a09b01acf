use actix_web::{get, web, HttpResponse, Responder};
use arangors::client::reqwest::ReqwestClient;
use arangors::Database;
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::time::timeout;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
    pub version: &'static str,
}

#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
struct DependencyStatus {
    healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_time_ms: Option<u128>,
}

impl DependencyStatus {
    fn from_probe<E: std::fmt::Display>(
        outcome: Result<Result<(), E>, tokio::time::error::Elapsed>,
        started: Instant,
        what: &str,
    ) -> Self {
        match outcome {
            Ok(Ok(())) => Self {
                healthy: true,
                message: None,
                response_time_ms: Some(started.elapsed().as_millis()),
            },
            Ok(Err(e)) => Self {
                healthy: false,
                message: Some(format!("{} check failed: {}", what, e)),
                response_time_ms: None,
            },
            Err(_) => Self {
                healthy: false,
                message: Some(format!("{} check timed out", what)),
                response_time_ms: None,
            },
        }
    }
}

async fn probe_database(db: &Database<ReqwestClient>) -> DependencyStatus {
    let started = Instant::now();
    let outcome = timeout(CHECK_TIMEOUT, async { db.info().await.map(|_| ()) }).await;
    DependencyStatus::from_probe(outcome, started, "Database")
}

async fn probe_redis(client: &redis::Client) -> DependencyStatus {
    let started = Instant::now();
    let outcome = timeout(CHECK_TIMEOUT, async {
        let mut conn = client.get_async_connection().await?;
        redis::cmd("PING").query_async::<_, String>(&mut conn).await.map(|_| ())
    })
    .await;
    DependencyStatus::from_probe(outcome, started, "Redis")
}

#[derive(Debug, Serialize)]
struct DetailedHealthResponse {
    status: &'static str,
    timestamp: i64,
    version: &'static str,
    database: DependencyStatus,
    redis: DependencyStatus,
}

/// Checks the document store and the fetch cache concurrently. 503 when either is down.
#[get("/health/detailed")]
pub async fn detailed_health_check(
    db: web::Data<Database<ReqwestClient>>,
    redis_client: web::Data<redis::Client>,
) -> impl Responder {
    let (database, redis) = tokio::join!(probe_database(db.get_ref()), probe_redis(redis_client.get_ref()));
    let healthy = database.healthy && redis.healthy;

    let response = DetailedHealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        timestamp: chrono::Utc::now().timestamp(),
        version: env!("CARGO_PKG_VERSION"),
        database,
        redis,
    };

    if healthy {
        HttpResponse::Ok().json(response)
    } else {
        log::warn!("Health check degraded: db={} redis={}", response.database.healthy, response.redis.healthy);
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test as actix_test, App};
    use pretty_assertions::assert_eq;

    #[actix_web::test]
    async fn test_health_check() {
        let app = actix_test::init_service(App::new().service(health_check)).await;

        let req = actix_test::TestRequest::get().uri("/health").to_request();
        let res: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(res["status"], "ok");
        assert_eq!(res["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_probe_outcomes() {
        let ok = DependencyStatus::from_probe::<String>(Ok(Ok(())), Instant::now(), "Redis");
        assert!(ok.healthy);
        assert!(ok.response_time_ms.is_some());

        let failed = DependencyStatus::from_probe(Ok(Err("refused")), Instant::now(), "Redis");
        assert!(!failed.healthy);
        assert_eq!(failed.message.as_deref(), Some("Redis check failed: refused"));
    }
}
