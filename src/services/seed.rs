use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::auth;
use crate::config;
use crate::database::Database;
use crate::models::ArtType;

/// Startup seeding: admin account first, then optional demo catalog.
/// Failures are logged and the process continues; seeding is never fatal.
pub async fn run() {
    if let Err(e) = seed_admin().await {
        warn!("admin seeding failed: {:#}", e);
    }
    if config::config().seed.demo_data {
        if let Err(e) = seed_demo_catalog().await {
            warn!("demo catalog seeding failed: {:#}", e);
        }
    }
}

/// Ensure the configured admin account exists. Password comes from config
/// (ADMIN_PASSWORD) and is argon2-hashed before insert; an existing account
/// is left untouched.
pub async fn seed_admin() -> Result<()> {
    let seed = &config::config().seed;
    let pool = Database::pool().await?;

    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 AND role = 'admin')")
            .bind(&seed.admin_username)
            .fetch_one(&pool)
            .await?;
    if exists {
        return Ok(());
    }

    let password = seed
        .admin_password
        .as_deref()
        .context("Set ADMIN_PASSWORD for first run")?;
    let hash = auth::hash_password(password)?;

    sqlx::query(
        "INSERT INTO users (email, username, role, password_hash)
         VALUES ($1, $2, 'admin', $3)",
    )
    .bind(format!("{}@artgallery.local", seed.admin_username))
    .bind(&seed.admin_username)
    .bind(&hash)
    .execute(&pool)
    .await?;

    info!(username = %seed.admin_username, "seeded admin account");
    Ok(())
}

/// Populate an empty database with a small demo catalog: categories,
/// exhibitions, artists, and artworks. No-op when any artist already exists.
pub async fn seed_demo_catalog() -> Result<()> {
    let pool = Database::pool().await?;

    let (has_artists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM artists)")
        .fetch_one(&pool)
        .await?;
    if has_artists {
        return Ok(());
    }

    let (category_id,): (uuid::Uuid,) =
        sqlx::query_as("INSERT INTO categories (name) VALUES ('General') RETURNING id")
            .fetch_one(&pool)
            .await?;

    let now = Utc::now();
    let exhibitions = [
        ("Light and Shadow", -10, 20),
        ("Modernity Revisited", -30, -5),
        ("Abstraction 2026", 5, 40),
        ("Portraits of the Soul", -60, 10),
        ("Baltic Landscapes", 1, 15),
    ];
    for (i, (name, start_offset, end_offset)) in exhibitions.iter().enumerate() {
        // Alternate small and large rooms so some exhibitions can sell out
        let capacity: i32 = if i % 2 == 0 { 1000 } else { 500 };
        sqlx::query(
            "INSERT INTO exhibitions (name, description, image_url, start_date, end_date, capacity)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(name)
        .bind(format!("{} - a curated exhibition.", name))
        .bind(format!("https://picsum.photos/seed/exhib{}/1200/600", i))
        .bind(now + Duration::days(*start_offset))
        .bind(now + Duration::days(*end_offset))
        .bind(capacity)
        .execute(&pool)
        .await?;
    }

    let mut artist_ids = Vec::new();
    for i in 1..=5 {
        let (id,): (uuid::Uuid,) = sqlx::query_as(
            "INSERT INTO artists (name, surname, biography) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(format!("Artist {}", i))
        .bind(format!("Surname {}", i))
        .bind(format!("Biography for artist {}.", i))
        .fetch_one(&pool)
        .await?;
        artist_ids.push(id);
    }

    for i in 0..10 {
        let artist_id = artist_ids[i % artist_ids.len()];
        let art_type = ArtType::ALL[i % ArtType::ALL.len()];
        let price = Decimal::new(50000 + 13700 * i as i64, 2);
        sqlx::query(
            "INSERT INTO arts (title, description, price, art_type, image_url, artist_id, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(format!("Artwork {}", i + 1))
        .bind(format!("Description for artwork {}.", i + 1))
        .bind(price)
        .bind(art_type)
        .bind(format!("https://picsum.photos/seed/art{}/800/600", i))
        .bind(artist_id)
        .bind(category_id)
        .execute(&pool)
        .await?;
    }

    info!("seeded demo catalog");
    Ok(())
}
