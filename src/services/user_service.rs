use std::sync::Arc;
use uuid::Uuid;

use super::logged;
use super::validation::{has_min_len, is_valid_email, MIN_NAME_LEN, MIN_PASSWORD_LEN};
use crate::auth::{PasswordHasher, TokenIssuer, UserRole};
use crate::errors::{RepositoryError, ServiceError};
use crate::models::{
    CreateUserRequest, LoginResponse, LoginUserRequest, RegisterUserRequest,
    RegisterUserResponse, UpdateUserRequest, User, UserPaginationRequest,
    UserPaginationResponse, UserResponse,
};
use crate::repositories::UserRepository;

const OP_REGISTER: &str = "register user";
const OP_LOGIN: &str = "login user";
const OP_CREATE: &str = "create user";
const OP_GET: &str = "get user";
const OP_LIST: &str = "get list user";
const OP_UPDATE: &str = "update user";
const OP_DELETE: &str = "delete user";

fn classify(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::UserNotFound,
        RepositoryError::UniqueViolation(_) => ServiceError::EmailAlreadyExists,
        RepositoryError::Store(err) => ServiceError::Store(err),
    }
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self { repo, hasher, tokens }
    }

    /// Self-registration. The account always gets the `user` role.
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterUserRequest) -> Result<RegisterUserResponse, ServiceError> {
        let user = self
            .new_account(OP_REGISTER, request.name, request.email, request.password, UserRole::User)
            .await?;

        let user = self
            .repo
            .create(None, &user)
            .await
            .map_err(|e| logged(OP_REGISTER, classify(e)))?;

        tracing::info!(user_id = %user.id, "success {}", OP_REGISTER);

        Ok(RegisterUserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        })
    }

    /// Credential check followed by token issuance. Unknown email and wrong
    /// password produce the same error.
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginUserRequest) -> Result<LoginResponse, ServiceError> {
        let user = self
            .repo
            .get_by_email(None, &request.email)
            .await
            .map_err(|e| logged(OP_LOGIN, classify(e)))?
            .ok_or_else(|| logged(OP_LOGIN, ServiceError::InvalidLoginCredential))?;

        let matches = self
            .hasher
            .verify(&user.password, &request.password)
            .unwrap_or(false);
        if !matches {
            return Err(logged(OP_LOGIN, ServiceError::InvalidLoginCredential));
        }

        let pair = self
            .tokens
            .generate(user.id, user.role)
            .map_err(|e| logged(OP_LOGIN, ServiceError::TokenGenerationFailed(e)))?;

        tracing::info!(user_id = %user.id, "success {}", OP_LOGIN);

        Ok(LoginResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Admin-initiated account creation. The account always gets the `admin` role.
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserResponse, ServiceError> {
        let mut user = self
            .new_account(OP_CREATE, request.name, request.email, request.password, UserRole::Admin)
            .await?;
        user.phone_number = request.phone_number;
        user.address = request.address;

        let user = self
            .repo
            .create(None, &user)
            .await
            .map_err(|e| logged(OP_CREATE, classify(e)))?;

        tracing::info!(user_id = %user.id, "success {}", OP_CREATE);
        Ok(user.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_user_by_id(&self, id: Uuid) -> Result<UserResponse, ServiceError> {
        let user = self.fetch(OP_GET, id).await?;
        tracing::info!(user_id = %id, "success {}", OP_GET);
        Ok(user.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_all_users(&self, search: &str) -> Result<Vec<UserResponse>, ServiceError> {
        let users = self
            .repo
            .list_all(None, search)
            .await
            .map_err(|e| logged(OP_LIST, classify(e)))?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    #[tracing::instrument(skip(self, request), fields(page = request.pagination.page))]
    pub async fn get_all_users_with_pagination(
        &self,
        request: UserPaginationRequest,
    ) -> Result<UserPaginationResponse, ServiceError> {
        let page = self
            .repo
            .list_paginated(None, &request)
            .await
            .map_err(|e| logged(OP_LIST, classify(e)))?;

        tracing::info!(page = page.pagination.page, count = page.pagination.count, "success {}", OP_LIST);

        let page = page.map(UserResponse::from);
        Ok(UserPaginationResponse {
            data: page.items,
            pagination: page.pagination,
        })
    }

    /// Merge the present fields onto the stored user and persist the result.
    #[tracing::instrument(skip(self, request))]
    pub async fn update_user(&self, id: Uuid, request: UpdateUserRequest) -> Result<UserResponse, ServiceError> {
        let mut user = self.fetch(OP_UPDATE, id).await?;

        if let Some(name) = request.name {
            if !has_min_len(&name, MIN_NAME_LEN) {
                return Err(logged(OP_UPDATE, ServiceError::InvalidName));
            }
            user.name = name;
        }

        if let Some(email) = request.email {
            if !is_valid_email(&email) {
                return Err(logged(OP_UPDATE, ServiceError::InvalidEmail));
            }

            let existing = self
                .repo
                .get_by_email(None, &email)
                .await
                .map_err(|e| logged(OP_UPDATE, classify(e)))?;
            if existing.is_some_and(|other| other.id != user.id) {
                return Err(logged(OP_UPDATE, ServiceError::EmailAlreadyExists));
            }

            user.email = email;
        }

        if let Some(password) = request.password {
            if !has_min_len(&password, MIN_PASSWORD_LEN) {
                return Err(logged(OP_UPDATE, ServiceError::InvalidPassword));
            }
            if self.hasher.verify(&user.password, &password).unwrap_or(false) {
                return Err(logged(OP_UPDATE, ServiceError::PasswordSame));
            }

            user.password = self
                .hasher
                .hash(&password)
                .map_err(|e| logged(OP_UPDATE, ServiceError::PasswordHashing(e)))?;
        }

        if let Some(phone_number) = request.phone_number {
            user.phone_number = phone_number;
        }

        if let Some(address) = request.address {
            user.address = address;
        }

        let user = self
            .repo
            .update(None, &user)
            .await
            .map_err(|e| logged(OP_UPDATE, classify(e)))?;

        tracing::info!(user_id = %user.id, "success {}", OP_UPDATE);
        Ok(user.into())
    }

    /// Soft-delete; the response carries the user as it was before deletion.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> Result<UserResponse, ServiceError> {
        let user = self.fetch(OP_DELETE, id).await?;

        self.repo
            .soft_delete(None, id)
            .await
            .map_err(|e| logged(OP_DELETE, classify(e)))?;

        tracing::info!(user_id = %id, "success {}", OP_DELETE);
        Ok(user.into())
    }

    async fn fetch(&self, operation: &'static str, id: Uuid) -> Result<User, ServiceError> {
        self.repo
            .get_by_id(None, id)
            .await
            .map_err(|e| logged(operation, classify(e)))?
            .ok_or_else(|| logged(operation, ServiceError::UserNotFound))
    }

    /// Shared registration/admin-create checks. The email lookup is advisory;
    /// the unique index decides races and surfaces as the same error.
    async fn new_account(
        &self,
        operation: &'static str,
        name: String,
        email: String,
        password: String,
        role: UserRole,
    ) -> Result<User, ServiceError> {
        if !has_min_len(&name, MIN_NAME_LEN) {
            return Err(logged(operation, ServiceError::InvalidName));
        }

        if !is_valid_email(&email) {
            return Err(logged(operation, ServiceError::InvalidEmail));
        }

        let existing = self
            .repo
            .get_by_email(None, &email)
            .await
            .map_err(|e| logged(operation, classify(e)))?;
        if existing.is_some() {
            return Err(logged(operation, ServiceError::EmailAlreadyExists));
        }

        if !has_min_len(&password, MIN_PASSWORD_LEN) {
            return Err(logged(operation, ServiceError::InvalidPassword));
        }

        let digest = self
            .hasher
            .hash(&password)
            .map_err(|e| logged(operation, ServiceError::PasswordHashing(e)))?;

        Ok(User::new(name, email, digest, role))
    }
}
