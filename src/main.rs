use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tpprofit::orchestration::{HttpSnapshotFeed, Poller, RetentionSweeper};
use tpprofit::{
    api, init_db, Catalog, Config, Evaluator, Gw2PriceSource, PriceSource, Repository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("Configuration error")?;
    let catalog = Arc::new(Catalog::builtin());

    let pool = init_db(&config.database_path, &catalog)
        .await
        .context("Failed to initialize database")?;
    let repo = Arc::new(Repository::new(pool, &catalog));

    let source: Arc<dyn PriceSource> = Arc::new(
        Gw2PriceSource::new(config.price_api_url.clone(), config.upstream_timeout)
            .context("Failed to build price client")?,
    );
    let evaluator = Evaluator::new(source, catalog.clone());

    let app = api::create_router(api::AppState::new(repo.clone(), evaluator));

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    if config.poller_enabled {
        let feed = HttpSnapshotFeed::new(config.self_base_url.clone(), config.upstream_timeout)
            .context("Failed to build poller client")?;
        let poller = Arc::new(Poller::new(
            Arc::new(feed),
            repo.clone(),
            config.poll_recipes.clone(),
        ));
        poller.spawn(config.poll_interval);

        let sweeper = Arc::new(RetentionSweeper::new(repo, config.retention_days));
        sweeper.spawn(config.cleanup_interval);
    } else {
        tracing::info!("Poller disabled");
    }

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
