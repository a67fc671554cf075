use std::time::Duration;

use async_trait::async_trait;
use sqlx::{
    Executor, PgPool,
    postgres::PgPoolOptions,
};

use super::{Store, verify_and_upgrade};
use crate::{
    error::StoreError,
    models::{Banner, Link, Profile},
    utils::hash_password,
};

const ADMIN_PASSWORD_KEY: &str = "admin_password";

/// Postgres-backed store.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(2)
            .max_lifetime(Duration::from_secs(30 * 60))
            .idle_timeout(Duration::from_secs(5 * 60))
            .acquire_timeout(Duration::from_secs(10))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("SET application_name = 'linkpage';").await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Stores `secret` as the admin credential unless one already exists.
    /// Returns whether a credential was written.
    pub async fn seed_credential(&self, secret: &str) -> Result<bool, StoreError> {
        let hashed = hash_password(secret)?;
        let result = sqlx::query(
            "INSERT INTO settings (key, value) VALUES ($1, $2) ON CONFLICT (key) DO NOTHING",
        )
        .bind(ADMIN_PASSWORD_KEY)
        .bind(hashed)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Store for PgStore {
    async fn read_profile(&self) -> Result<Profile, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT name, title, subtitle, description, avatar FROM profile WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn write_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE profile
            SET name = $1, title = $2, subtitle = $3, description = $4, avatar = $5
            WHERE id = 1
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.title)
        .bind(&profile.subtitle)
        .bind(&profile.description)
        .bind(&profile.avatar)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn read_links(&self) -> Result<Vec<Link>, StoreError> {
        let links = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, title, url, category, icon, featured
            FROM links
            ORDER BY featured DESC, sort_order, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }

    async fn write_link(&self, link: &Link) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO links (id, title, url, category, icon, featured)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&link.id)
        .bind(&link.title)
        .bind(&link.url)
        .bind(&link.category)
        .bind(&link.icon)
        .bind(link.featured)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_link(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_link_featured(&self, id: &str, featured: bool) -> Result<(), StoreError> {
        sqlx::query("UPDATE links SET featured = $1 WHERE id = $2")
            .bind(featured)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn read_banner(&self) -> Result<Banner, StoreError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT key, value FROM settings WHERE key LIKE 'banner_%'",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut banner = Banner::default();
        for (key, value) in rows {
            banner.apply_setting(&key, value);
        }
        Ok(banner)
    }

    async fn write_banner(&self, banner: &Banner) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for (key, value) in banner.settings() {
            sqlx::query(
                r#"
                INSERT INTO settings (key, value) VALUES ($1, $2)
                ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
                "#,
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn verify_credential(&self, secret: &str) -> Result<bool, StoreError> {
        let stored: String = sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
            .bind(ADMIN_PASSWORD_KEY)
            .fetch_one(&self.pool)
            .await?;

        verify_and_upgrade(&stored, secret, || self.set_credential(secret)).await
    }

    async fn set_credential(&self, secret: &str) -> Result<(), StoreError> {
        let hashed = hash_password(secret)?;
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(ADMIN_PASSWORD_KEY)
        .bind(hashed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
