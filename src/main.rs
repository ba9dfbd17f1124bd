use std::net::SocketAddr;

use taskboard::application::category_service::CategoryServiceImpl;
use taskboard::application::task_service::TaskServiceImpl;
use taskboard::domain::repository::{CategoryRepository, TaskRepository};
use taskboard::domain::task::{Category, CategoryId};
use taskboard::http::routing::{self, tasks, web};
use taskboard::infrastructure::sqlite_repo::{self, SqliteCategoryRepository, SqliteTaskRepository};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://tasks.db".to_string());
    // Ensure SQLite file can be created/opened when using a file-backed URL
    prepare_sqlite_file(&database_url)?;
    let pool = sqlite_repo::connect(&database_url).await?;
    let task_repo = SqliteTaskRepository::new(pool.clone());
    let category_repo = SqliteCategoryRepository::new(pool);
    task_repo.init().await?;
    category_repo.init().await?;
    seed_categories(&category_repo).await?;

    let task_service = TaskServiceImpl::new(task_repo, category_repo.clone());
    let category_service = CategoryServiceImpl::new(category_repo);

    let api = tasks::router(tasks::ApiState { service: task_service.clone() });
    let web = web::router(web::WebState { tasks: task_service, categories: category_service });
    let router = routing::app(api, web);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    tracing::info!(%addr, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}

/// First-run convenience: the form UI needs at least a few categories to
/// pick from, and there is no category management surface.
async fn seed_categories(repo: &SqliteCategoryRepository) -> anyhow::Result<()> {
    if !repo.list().await?.is_empty() {
        return Ok(());
    }
    for name in ["Home", "Work"] {
        repo.insert(&Category { id: CategoryId::default(), name: name.to_string() }).await?;
    }
    tracing::info!("seeded default categories");
    Ok(())
}

fn prepare_sqlite_file(database_url: &str) -> anyhow::Result<()> {
    // Skip in-memory
    if database_url.starts_with("sqlite::memory:") { return Ok(()); }
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        // On Windows, absolute paths may look like /C:/path; strip the leading slash
        let path = if cfg!(windows) && path.len() >= 3 && path.as_bytes()[0] == b'/' && path.as_bytes()[2] == b':' {
            &path[1..]
        } else {
            path
        };
        use std::{fs, fs::OpenOptions, path::Path};
        let p = Path::new(path);
        if let Some(parent) = p.parent() { if !parent.as_os_str().is_empty() { fs::create_dir_all(parent)?; } }
        if !p.exists() {
            let _ = OpenOptions::new().create(true).append(true).open(p)?;
        }
    }
    Ok(())
}
