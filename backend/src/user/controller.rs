use actix_web::{web, HttpResponse};
use chrono::Utc;
use shared::{
    PlatformsRequest, PreferencesRequest, ProfileRequest, SaveDailyProblemRequest, UpdateProblemStatusRequest,
};

use crate::error::ApiError;
use crate::user::repository::UserRepository;
use crate::user::usecase::{Assignment, UserUseCaseImpl};

type UseCase<R> = web::Data<UserUseCaseImpl<R>>;

pub async fn list_users_handler<R: UserRepository + 'static>(
    usecase: UseCase<R>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(usecase.list_users().await?))
}

pub async fn get_user_handler<R: UserRepository + 'static>(
    path: web::Path<String>,
    usecase: UseCase<R>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(usecase.get_user(&path.into_inner()).await?))
}

pub async fn update_platforms_handler<R: UserRepository + 'static>(
    path: web::Path<String>,
    body: web::Json<PlatformsRequest>,
    usecase: UseCase<R>,
) -> Result<HttpResponse, ApiError> {
    let user = usecase
        .update_platforms(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn update_profile_handler<R: UserRepository + 'static>(
    path: web::Path<String>,
    body: web::Json<ProfileRequest>,
    usecase: UseCase<R>,
) -> Result<HttpResponse, ApiError> {
    let user = usecase
        .update_profile(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn update_preferences_handler<R: UserRepository + 'static>(
    path: web::Path<String>,
    body: web::Json<PreferencesRequest>,
    usecase: UseCase<R>,
) -> Result<HttpResponse, ApiError> {
    let user = usecase
        .update_preferences(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn list_daily_problems_handler<R: UserRepository + 'static>(
    path: web::Path<String>,
    usecase: UseCase<R>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(usecase.daily_problems(&path.into_inner()).await?))
}

pub async fn save_daily_problem_handler<R: UserRepository + 'static>(
    path: web::Path<String>,
    body: web::Json<SaveDailyProblemRequest>,
    usecase: UseCase<R>,
) -> Result<HttpResponse, ApiError> {
    let record = usecase
        .save_daily_problem(&path.into_inner(), body.into_inner(), Utc::now())
        .await?;
    Ok(HttpResponse::Created().json(record))
}

pub async fn assign_daily_problem_handler<R: UserRepository + 'static>(
    path: web::Path<String>,
    usecase: UseCase<R>,
) -> Result<HttpResponse, ApiError> {
    match usecase
        .assign_daily_problem(&path.into_inner(), Utc::now())
        .await?
    {
        Assignment::Created(record) => Ok(HttpResponse::Created().json(record)),
        Assignment::Existing(record) => Ok(HttpResponse::Ok().json(record)),
    }
}

pub async fn update_problem_status_handler<R: UserRepository + 'static>(
    path: web::Path<String>,
    body: web::Json<UpdateProblemStatusRequest>,
    usecase: UseCase<R>,
) -> Result<HttpResponse, ApiError> {
    let record = usecase
        .update_problem_status(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

pub async fn streaks_handler<R: UserRepository + 'static>(
    path: web::Path<String>,
    usecase: UseCase<R>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(usecase.streaks(&path.into_inner(), Utc::now()).await?))
}

/// Mounts the user routes. The caller registers `web::Data<UserUseCaseImpl<R>>`.
pub fn configure_routes<R: UserRepository + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .route("", web::get().to(list_users_handler::<R>))
            .route("/{id}", web::get().to(get_user_handler::<R>))
            .route("/{id}/platforms", web::put().to(update_platforms_handler::<R>))
            .route("/{id}/profile", web::put().to(update_profile_handler::<R>))
            .route("/{id}/preferences", web::put().to(update_preferences_handler::<R>))
            .route("/{id}/daily-problems", web::get().to(list_daily_problems_handler::<R>))
            .route("/{id}/daily-problems", web::post().to(save_daily_problem_handler::<R>))
            .route(
                "/{id}/daily-problems/assign",
                web::post().to(assign_daily_problem_handler::<R>),
            )
            .route(
                "/{id}/daily-problems/status",
                web::post().to(update_problem_status_handler::<R>),
            )
            .route("/{id}/streaks", web::get().to(streaks_handler::<R>)),
    );
}
