use actix_web::{web, HttpResponse};
use chrono::Utc;
use shared::DashboardQuery;

use crate::dashboard::usecase::DashboardUseCaseImpl;
use crate::error::ApiError;
use crate::user::repository::UserRepository;

/// `GET /api/dashboard/{id}?refresh=codeforces,leetcode|all`
pub async fn dashboard_handler<R: UserRepository + 'static>(
    path: web::Path<String>,
    query: web::Query<DashboardQuery>,
    usecase: web::Data<DashboardUseCaseImpl<R>>,
) -> Result<HttpResponse, ApiError> {
    let response = usecase
        .dashboard(&path.into_inner(), &query.into_inner(), Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes<R: UserRepository + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/dashboard").route("/{id}", web::get().to(dashboard_handler::<R>)));
}
