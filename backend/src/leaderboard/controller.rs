use actix_web::{web, HttpResponse};
use shared::DailyLeaderboardQuery;

use crate::error::ApiError;
use crate::leaderboard::usecase::LeaderboardUseCaseImpl;
use crate::user::repository::UserRepository;

pub async fn ratings_leaderboard_handler<R: UserRepository + 'static>(
    usecase: web::Data<LeaderboardUseCaseImpl<R>>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(usecase.ratings().await?))
}

pub async fn daily_leaderboard_handler<R: UserRepository + 'static>(
    query: web::Query<DailyLeaderboardQuery>,
    usecase: web::Data<LeaderboardUseCaseImpl<R>>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(usecase.daily(&query).await?))
}

pub fn configure_routes<R: UserRepository + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/leaderboard")
            .route("/ratings", web::get().to(ratings_leaderboard_handler::<R>))
            .route("/daily", web::get().to(daily_leaderboard_handler::<R>)),
    );
}
