use kantin_foodcourt::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    seed::seed_demo_data,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    run_migrations(&pool).await?;

    let summary = seed_demo_data(&pool).await?;
    tracing::info!(
        users = summary.users,
        kantins = summary.kantins,
        menus_inserted = summary.menus_inserted,
        "seed completed"
    );
    Ok(())
}
