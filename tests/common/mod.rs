#![allow(dead_code)]

use kantin_foodcourt::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    entity::menus::{self, Column as MenuCol, Entity as Menus},
    middleware::auth::AuthUser,
    models::Role,
    seed::seed_demo_data,
    state::AppState,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

/// Database URL for integration flows, or `None` when the flow should be skipped.
pub fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            None
        }
    }
}

/// Migrated, emptied and seeded database behind a fresh state.
pub async fn seeded_state(database_url: &str) -> anyhow::Result<AppState> {
    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "integration-secret".into(),
        session_ttl_minutes: 60,
        db_max_connections: 5,
    };
    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    run_migrations(&pool).await?;

    sqlx::query(
        "TRUNCATE TABLE audit_logs, ratings, order_items, orders, menus, kantins, users CASCADE",
    )
    .execute(&pool)
    .await?;
    seed_demo_data(&pool).await?;

    Ok(AppState::new(pool, config))
}

/// Open a session for an existing user, as a successful login would.
pub async fn session_for(state: &AppState, username: &str) -> anyhow::Result<AuthUser> {
    let (user_id, role): (Uuid, String) =
        sqlx::query_as("SELECT id, role FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(&state.pool)
            .await?;
    let role: Role = role.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let session = state.sessions.create(user_id, username, role).await;
    Ok(AuthUser {
        user_id,
        session_id: session.id,
        username: username.to_string(),
        role,
    })
}

pub async fn menu_named(state: &AppState, name: &str) -> anyhow::Result<menus::Model> {
    Menus::find()
        .filter(MenuCol::Name.eq(name))
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("menu {name} not seeded"))
}
