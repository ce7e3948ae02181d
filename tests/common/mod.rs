#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use fake::{faker::name::en::Name, Fake};
use serde_json::Value;
use sqlx::PgConnection;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

use storefront::api::{create_routes, AppState};
use storefront::auth::{BcryptHasher, JwtService, PasswordHasher, TokenIssuer, UserRole};
use storefront::errors::RepositoryError;
use storefront::models::{
    Page, PaginationRequest, PaginationResponse, Product, ProductPaginationRequest, User,
    UserPaginationRequest,
};
use storefront::repositories::{ProductRepository, UserRepository};
use storefront::services::{ProductService, UserService};

pub const TEST_SECRET: &str = "test_secret";
pub const TEST_BCRYPT_COST: u32 = 4;

fn matches_search(fields: &[&str], search: &str) -> bool {
    let needle = search.to_lowercase();
    needle.is_empty() || fields.iter().any(|field| field.to_lowercase().contains(&needle))
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, Uuid)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn paginate<T>(rows: Vec<T>, request: &PaginationRequest) -> Page<T> {
    let paging = request.normalized();
    let count = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(paging.offset() as usize)
        .take(paging.limit() as usize)
        .collect();

    Page {
        items,
        pagination: PaginationResponse::new(&paging, count),
    }
}

/// In-memory `UserRepository` honoring soft delete and the active-email uniqueness rule.
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    fn active(&self, search: &str, id: Option<Uuid>) -> Vec<User> {
        let mut rows: Vec<User> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| !u.is_deleted())
            .filter(|u| id.map_or(true, |id| u.id == id))
            .filter(|u| matches_search(&[u.name.as_str(), u.email.as_str()], search))
            .cloned()
            .collect();
        newest_first(&mut rows, |u| (u.created_at, u.id));
        rows
    }

    pub fn raw(&self, id: Uuid) -> Option<User> {
        self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, _tx: Option<&mut PgConnection>, user: &User) -> Result<User, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| !u.is_deleted() && u.email == user.email) {
            return Err(RepositoryError::UniqueViolation("users_email_active_key".to_string()));
        }
        rows.push(user.clone());
        Ok(user.clone())
    }

    async fn get_by_id(&self, _tx: Option<&mut PgConnection>, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.active("", Some(id)).into_iter().next())
    }

    async fn get_by_email(&self, _tx: Option<&mut PgConnection>, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.active("", None).into_iter().find(|u| u.email == email))
    }

    async fn list_all(&self, _tx: Option<&mut PgConnection>, search: &str) -> Result<Vec<User>, RepositoryError> {
        Ok(self.active(search, None))
    }

    async fn list_paginated(
        &self,
        _tx: Option<&mut PgConnection>,
        request: &UserPaginationRequest,
    ) -> Result<Page<User>, RepositoryError> {
        let rows = self.active(&request.pagination.search, request.id);
        Ok(paginate(rows, &request.pagination))
    }

    async fn update(&self, _tx: Option<&mut PgConnection>, user: &User) -> Result<User, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| !u.is_deleted() && u.id != user.id && u.email == user.email) {
            return Err(RepositoryError::UniqueViolation("users_email_active_key".to_string()));
        }

        let row = rows
            .iter_mut()
            .find(|u| u.id == user.id && !u.is_deleted())
            .ok_or(RepositoryError::NotFound)?;
        *row = User {
            updated_at: chrono::Utc::now(),
            ..user.clone()
        };
        Ok(row.clone())
    }

    async fn soft_delete(&self, _tx: Option<&mut PgConnection>, id: Uuid) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|u| u.id == id && !u.is_deleted())
            .ok_or(RepositoryError::NotFound)?;
        row.deleted_at = Some(chrono::Utc::now());
        Ok(())
    }
}

/// In-memory `ProductRepository` honoring soft delete and the active-merk uniqueness rule.
#[derive(Default)]
pub struct InMemoryProductRepository {
    rows: Mutex<Vec<Product>>,
}

impl InMemoryProductRepository {
    fn active(&self, search: &str, id: Option<Uuid>) -> Vec<Product> {
        let mut rows: Vec<Product> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| !p.is_deleted())
            .filter(|p| id.map_or(true, |id| p.id == id))
            .filter(|p| matches_search(&[p.name.as_str(), p.merk.as_str(), p.material.as_str()], search))
            .cloned()
            .collect();
        newest_first(&mut rows, |p| (p.created_at, p.id));
        rows
    }

    pub fn raw(&self, id: Uuid) -> Option<Product> {
        self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, _tx: Option<&mut PgConnection>, product: &Product) -> Result<Product, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| !p.is_deleted() && p.merk == product.merk) {
            return Err(RepositoryError::UniqueViolation("products_merk_active_key".to_string()));
        }
        rows.push(product.clone());
        Ok(product.clone())
    }

    async fn get_by_id(&self, _tx: Option<&mut PgConnection>, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        Ok(self.active("", Some(id)).into_iter().next())
    }

    async fn get_by_merk(&self, _tx: Option<&mut PgConnection>, merk: &str) -> Result<Option<Product>, RepositoryError> {
        Ok(self.active("", None).into_iter().find(|p| p.merk == merk))
    }

    async fn list_all(&self, _tx: Option<&mut PgConnection>, search: &str) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.active(search, None))
    }

    async fn list_paginated(
        &self,
        _tx: Option<&mut PgConnection>,
        request: &ProductPaginationRequest,
    ) -> Result<Page<Product>, RepositoryError> {
        let rows = self.active(&request.pagination.search, request.id);
        Ok(paginate(rows, &request.pagination))
    }

    async fn update(&self, _tx: Option<&mut PgConnection>, product: &Product) -> Result<Product, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| !p.is_deleted() && p.id != product.id && p.merk == product.merk) {
            return Err(RepositoryError::UniqueViolation("products_merk_active_key".to_string()));
        }

        let row = rows
            .iter_mut()
            .find(|p| p.id == product.id && !p.is_deleted())
            .ok_or(RepositoryError::NotFound)?;
        *row = Product {
            updated_at: chrono::Utc::now(),
            ..product.clone()
        };
        Ok(row.clone())
    }

    async fn soft_delete(&self, _tx: Option<&mut PgConnection>, id: Uuid) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id && !p.is_deleted())
            .ok_or(RepositoryError::NotFound)?;
        row.deleted_at = Some(chrono::Utc::now());
        Ok(())
    }
}

/// Store whose email lookup misses rows a concurrent writer just inserted,
/// so only the unique index catches the duplicate.
#[derive(Default)]
pub struct RacyUserRepository {
    pub inner: InMemoryUserRepository,
}

#[async_trait]
impl UserRepository for RacyUserRepository {
    async fn create(&self, tx: Option<&mut PgConnection>, user: &User) -> Result<User, RepositoryError> {
        self.inner.create(tx, user).await
    }

    async fn get_by_id(&self, tx: Option<&mut PgConnection>, id: Uuid) -> Result<Option<User>, RepositoryError> {
        self.inner.get_by_id(tx, id).await
    }

    async fn get_by_email(&self, _tx: Option<&mut PgConnection>, _email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(None)
    }

    async fn list_all(&self, tx: Option<&mut PgConnection>, search: &str) -> Result<Vec<User>, RepositoryError> {
        self.inner.list_all(tx, search).await
    }

    async fn list_paginated(
        &self,
        tx: Option<&mut PgConnection>,
        request: &UserPaginationRequest,
    ) -> Result<Page<User>, RepositoryError> {
        self.inner.list_paginated(tx, request).await
    }

    async fn update(&self, tx: Option<&mut PgConnection>, user: &User) -> Result<User, RepositoryError> {
        self.inner.update(tx, user).await
    }

    async fn soft_delete(&self, tx: Option<&mut PgConnection>, id: Uuid) -> Result<(), RepositoryError> {
        self.inner.soft_delete(tx, id).await
    }
}

/// Product counterpart of `RacyUserRepository`: merk lookups always miss.
#[derive(Default)]
pub struct RacyProductRepository {
    pub inner: InMemoryProductRepository,
}

#[async_trait]
impl ProductRepository for RacyProductRepository {
    async fn create(&self, tx: Option<&mut PgConnection>, product: &Product) -> Result<Product, RepositoryError> {
        self.inner.create(tx, product).await
    }

    async fn get_by_id(&self, tx: Option<&mut PgConnection>, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        self.inner.get_by_id(tx, id).await
    }

    async fn get_by_merk(&self, _tx: Option<&mut PgConnection>, _merk: &str) -> Result<Option<Product>, RepositoryError> {
        Ok(None)
    }

    async fn list_all(&self, tx: Option<&mut PgConnection>, search: &str) -> Result<Vec<Product>, RepositoryError> {
        self.inner.list_all(tx, search).await
    }

    async fn list_paginated(
        &self,
        tx: Option<&mut PgConnection>,
        request: &ProductPaginationRequest,
    ) -> Result<Page<Product>, RepositoryError> {
        self.inner.list_paginated(tx, request).await
    }

    async fn update(&self, tx: Option<&mut PgConnection>, product: &Product) -> Result<Product, RepositoryError> {
        self.inner.update(tx, product).await
    }

    async fn soft_delete(&self, tx: Option<&mut PgConnection>, id: Uuid) -> Result<(), RepositoryError> {
        self.inner.soft_delete(tx, id).await
    }
}

pub fn hasher() -> Arc<BcryptHasher> {
    Arc::new(BcryptHasher::new(TEST_BCRYPT_COST))
}

pub fn jwt() -> Arc<JwtService> {
    Arc::new(JwtService::new(TEST_SECRET))
}

/// Services wired over fresh in-memory stores, with handles on the stores for assertions.
pub struct TestContext {
    pub user_repo: Arc<InMemoryUserRepository>,
    pub product_repo: Arc<InMemoryProductRepository>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub users: UserService,
    pub products: ProductService,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_tokens(jwt())
    }

    pub fn with_tokens(tokens: Arc<dyn TokenIssuer>) -> Self {
        let user_repo = Arc::new(InMemoryUserRepository::default());
        let product_repo = Arc::new(InMemoryProductRepository::default());

        let users = UserService::new(user_repo.clone(), hasher(), tokens.clone());
        let products = ProductService::new(product_repo.clone());

        Self {
            user_repo,
            product_repo,
            tokens,
            users,
            products,
        }
    }

    pub fn app(&self) -> Router {
        create_routes(AppState::new(
            self.users.clone(),
            self.products.clone(),
            self.tokens.clone(),
        ))
    }

    /// Insert an active account directly and return a bearer token for it.
    pub async fn account(&self, role: UserRole) -> (User, String) {
        let name: String = Name().fake();
        let email = format!("{}@example.com", Uuid::new_v4().simple());
        let digest = hasher().hash("password123").unwrap();
        let user = User::new(format!("{name} Tester"), email, digest, role);

        self.user_repo.create(None, &user).await.unwrap();
        let pair = self.tokens.generate(user.id, role).unwrap();
        (user, pair.access_token)
    }
}

pub async fn send(app: Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (u16, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
