//! Idempotent demo data for a fresh database.
//!
//! Safe to run repeatedly: existing users keep their password, existing stalls
//! are left alone and menus are only inserted when the stall does not already
//! have one with the same name, so stock is never reset.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{models::Role, services::auth_service::hash_password};

struct DemoUser {
    username: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
}

struct DemoKantin {
    name: &'static str,
    location: &'static str,
    owner: &'static str,
    days_since_last_order: i64,
}

struct DemoMenu {
    kantin: &'static str,
    name: &'static str,
    description: &'static str,
    price: i64,
    stock: i32,
    image_url: &'static str,
}

const USERS: &[DemoUser] = &[
    DemoUser {
        username: "admin",
        email: "admin@foodcourt.com",
        password: "admin123",
        role: Role::Admin,
    },
    DemoUser {
        username: "kantin1",
        email: "kantin1@foodcourt.com",
        password: "kantin123",
        role: Role::Kantin,
    },
    DemoUser {
        username: "kantin2",
        email: "kantin2@foodcourt.com",
        password: "kantin234",
        role: Role::Kantin,
    },
];

const KANTINS: &[DemoKantin] = &[
    DemoKantin {
        name: "Kantin Enak",
        location: "Blok A",
        owner: "kantin1",
        days_since_last_order: 7,
    },
    DemoKantin {
        name: "Warung Gaul",
        location: "Blok B",
        owner: "kantin2",
        days_since_last_order: 0,
    },
];

const MENUS: &[DemoMenu] = &[
    DemoMenu {
        kantin: "Kantin Enak",
        name: "Nasi Goreng Spesial",
        description: "Nasi goreng dengan telur dan ayam.",
        price: 20_000,
        stock: 15,
        image_url: "images/nasi_goreng.jpg",
    },
    DemoMenu {
        kantin: "Kantin Enak",
        name: "Mie Ayam Bakso",
        description: "Mie ayam dengan bakso dan pangsit.",
        price: 18_000,
        stock: 10,
        image_url: "images/mie_ayam.jpg",
    },
    DemoMenu {
        kantin: "Warung Gaul",
        name: "Ayam Geprek",
        description: "Ayam goreng krispi dengan sambal pedas.",
        price: 25_000,
        stock: 20,
        image_url: "images/ayam_geprek.jpg",
    },
    DemoMenu {
        kantin: "Warung Gaul",
        name: "Es Jeruk",
        description: "Minuman jeruk segar.",
        price: 8_000,
        stock: 30,
        image_url: "images/es_jeruk.jpg",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub kantins: usize,
    pub menus_inserted: u64,
}

pub async fn seed_demo_data(pool: &PgPool) -> anyhow::Result<SeedSummary> {
    let mut user_ids = Vec::with_capacity(USERS.len());
    for user in USERS {
        let id = ensure_user(pool, user).await?;
        user_ids.push((user.username, id));
    }

    let mut kantin_ids = Vec::with_capacity(KANTINS.len());
    for kantin in KANTINS {
        let owner = user_ids
            .iter()
            .find(|(username, _)| *username == kantin.owner)
            .map(|(_, id)| *id)
            .ok_or_else(|| anyhow::anyhow!("unknown stall owner {}", kantin.owner))?;
        let id = ensure_kantin(pool, kantin, owner).await?;
        kantin_ids.push((kantin.name, id));
    }

    let mut menus_inserted = 0;
    for menu in MENUS {
        let kantin_id = kantin_ids
            .iter()
            .find(|(name, _)| *name == menu.kantin)
            .map(|(_, id)| *id)
            .ok_or_else(|| anyhow::anyhow!("unknown stall {}", menu.kantin))?;
        menus_inserted += ensure_menu(pool, menu, kantin_id).await?;
    }

    tracing::info!(
        users = user_ids.len(),
        kantins = kantin_ids.len(),
        menus_inserted,
        "demo data ensured"
    );
    Ok(SeedSummary {
        users: user_ids.len(),
        kantins: kantin_ids.len(),
        menus_inserted,
    })
}

async fn ensure_user(pool: &PgPool, user: &DemoUser) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(user.password)?;

    // The no-op update makes RETURNING yield the existing row on conflict.
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (username) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.username)
    .bind(user.email)
    .bind(password_hash)
    .bind(user.role.as_str())
    .fetch_one(pool)
    .await?;

    tracing::debug!(username = user.username, role = %user.role, "ensured user");
    Ok(id)
}

async fn ensure_kantin(pool: &PgPool, kantin: &DemoKantin, owner: Uuid) -> anyhow::Result<Uuid> {
    let last_order_at = Utc::now() - Duration::days(kantin.days_since_last_order);
    sqlx::query(
        r#"
        INSERT INTO kantins (id, name, location, last_order_at, user_id)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(kantin.name)
    .bind(kantin.location)
    .bind(last_order_at)
    .bind(owner)
    .execute(pool)
    .await?;

    let (id,): (Uuid,) = sqlx::query_as("SELECT id FROM kantins WHERE user_id = $1")
        .bind(owner)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn ensure_menu(pool: &PgPool, menu: &DemoMenu, kantin_id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO menus (id, kantin_id, name, description, price, stock, image_url)
        SELECT $1, $2, $3, $4, $5, $6, $7
        WHERE NOT EXISTS (
            SELECT 1 FROM menus WHERE kantin_id = $2 AND name = $3
        )
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(kantin_id)
    .bind(menu.name)
    .bind(menu.description)
    .bind(menu.price)
    .bind(menu.stock)
    .bind(menu.image_url)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_stall_is_owned_by_a_kantin_account() {
        for kantin in KANTINS {
            let owner = USERS.iter().find(|u| u.username == kantin.owner).unwrap();
            assert_eq!(owner.role, Role::Kantin, "{} owner", kantin.name);
        }
    }

    #[test]
    fn every_menu_belongs_to_a_seeded_stall() {
        for menu in MENUS {
            assert!(KANTINS.iter().any(|k| k.name == menu.kantin), "{}", menu.name);
            assert!(menu.price > 0 && menu.stock >= 0);
            assert!(!menu.description.is_empty(), "{} description", menu.name);
        }
    }
}
