use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use std::path::{Path, PathBuf};

use crate::auth::{PasswordHasher, UserRole};
use crate::models::{Product, User};
use crate::repositories::{PgProductRepository, PgUserRepository, ProductRepository, UserRepository};

#[derive(Debug, Deserialize)]
struct SeedUser {
    name: String,
    email: String,
    password: String,
    #[serde(default)]
    phone_number: String,
    #[serde(default)]
    address: String,
    role: UserRole,
}

#[derive(Debug, Deserialize)]
struct SeedProduct {
    name: String,
    description: String,
    merk: String,
    #[serde(default)]
    material: String,
    price: f64,
}

/// Loads `users.json` and `products.json` from a seed directory. Rows whose
/// email or merk is already taken by an active record are skipped.
pub struct DatabaseSeeder<'a> {
    pool: PgPool,
    hasher: &'a dyn PasswordHasher,
    dir: PathBuf,
}

impl<'a> DatabaseSeeder<'a> {
    pub fn new(pool: PgPool, hasher: &'a dyn PasswordHasher, dir: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            hasher,
            dir: dir.into(),
        }
    }

    /// Everything is written in one transaction; a failure leaves the store untouched.
    pub async fn seed_all(&self) -> Result<()> {
        tracing::info!(dir = %self.dir.display(), "starting database seeding");

        let users: Vec<SeedUser> = read_seed(&self.dir.join("users.json"))?;
        let products: Vec<SeedProduct> = read_seed(&self.dir.join("products.json"))?;

        let mut tx = self.pool.begin().await?;
        let users_added = self.seed_users(&mut tx, users).await?;
        let products_added = self.seed_products(&mut tx, products).await?;
        tx.commit().await?;

        tracing::info!(users = users_added, products = products_added, "database seeding completed");
        Ok(())
    }

    async fn seed_users(&self, conn: &mut PgConnection, users: Vec<SeedUser>) -> Result<usize> {
        let repo = PgUserRepository::new(self.pool.clone());
        let mut added = 0;

        for seed in users {
            if repo.get_by_email(Some(&mut *conn), &seed.email).await?.is_some() {
                tracing::debug!(email = %seed.email, "user already present, skipping");
                continue;
            }

            let digest = self.hasher.hash(&seed.password)?;
            let mut user = User::new(seed.name, seed.email, digest, seed.role);
            user.phone_number = seed.phone_number;
            user.address = seed.address;

            repo.create(Some(&mut *conn), &user).await?;
            added += 1;
        }

        Ok(added)
    }

    async fn seed_products(&self, conn: &mut PgConnection, products: Vec<SeedProduct>) -> Result<usize> {
        let repo = PgProductRepository::new(self.pool.clone());
        let mut added = 0;

        for seed in products {
            if repo.get_by_merk(Some(&mut *conn), &seed.merk).await?.is_some() {
                tracing::debug!(merk = %seed.merk, "product already present, skipping");
                continue;
            }

            let product = Product::new(seed.name, seed.description, seed.merk, seed.material, seed.price);
            repo.create(Some(&mut *conn), &product).await?;
            added += 1;
        }

        Ok(added)
    }
}

fn read_seed<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse seed file {}", path.display()))
}
