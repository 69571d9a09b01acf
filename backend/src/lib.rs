pub mod cache;
pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod platforms;

pub mod user {
    pub mod controller;
    pub mod repository;
    pub mod usecase;

    pub use repository::{UserRepository, UserRepositoryImpl};
    pub use usecase::UserUseCaseImpl;
}

pub mod dashboard {
    pub mod controller;
    pub mod usecase;

    pub use usecase::DashboardUseCaseImpl;
}

pub mod leaderboard {
    pub mod controller;
    pub mod usecase;

    pub use usecase::LeaderboardUseCaseImpl;
}

#[cfg(test)]
mod test_support;
