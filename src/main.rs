use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};

use task_manager::{
    auth::{BcryptPasswordService, JwtTokenService},
    config::Config,
    domain::{TaskRepository, UserRepository},
    repositories::{postgres, InMemoryTaskRepository, InMemoryUserRepository},
    repositories::{PgTaskRepository, PgUserRepository},
    routes::{self, AppState},
    usecases::{TaskUseCase, UserUseCase},
};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    log::error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

async fn build_repositories(
    config: &Config,
) -> io::Result<(Arc<dyn TaskRepository>, Arc<dyn UserRepository>)> {
    match &config.database_url {
        Some(url) => {
            let pool = postgres::connect(url, config.database_acquire_timeout)
                .await
                .map_err(|e| startup_error("Failed to connect to database", e))?;
            postgres::migrate(&pool)
                .await
                .map_err(|e| startup_error("Failed to run database migrations", e))?;
            log::info!("Connected to PostgreSQL");

            Ok((
                Arc::new(PgTaskRepository::new(pool.clone())),
                Arc::new(PgUserRepository::new(pool)),
            ))
        }
        None => {
            log::warn!("DATABASE_URL not set. Using in-memory storage; data is lost on exit.");
            Ok((
                Arc::new(InMemoryTaskRepository::new()),
                Arc::new(InMemoryUserRepository::new()),
            ))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;
    let (task_repo, user_repo) = build_repositories(&config).await?;

    let tokens = Arc::new(JwtTokenService::new(
        &config.jwt_secret,
        chrono::Duration::hours(config.token_ttl_hours),
    ));
    let passwords = Arc::new(BcryptPasswordService::new(config.bcrypt_cost));

    let users = Arc::new(UserUseCase::new(user_repo, tokens.clone(), passwords));
    users
        .ensure_admin(&config.admin_username, &config.admin_password)
        .await
        .map_err(|e| startup_error("Failed to ensure default admin user", e))?;

    let state = AppState {
        tasks: Arc::new(TaskUseCase::new(task_repo)),
        users,
        tokens,
    };

    log::info!("Starting task manager at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .configure(routes::config(state.clone()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
