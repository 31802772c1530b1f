//! User business logic service.
//!
//! Handles registration, credential checks and user lookups.

use crate::auth::models::{RegisterUserRequest, UserDetails};
use crate::database::models::{NewUser, PublicUser, User, UserRole};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::{UserRepository, is_unique_violation};
use bcrypt::{hash, verify};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

/// Hashes checked against when the username is unknown, one per bcrypt cost.
static DUMMY_HASHES: LazyLock<Mutex<HashMap<u32, String>>> = 
    LazyLock::new(|| Mutex::new(HashMap::new()));

const DUMMY_PASSWORD: &str = "tripflow-dummy-password";

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
    /// bcrypt work factor for new hashes
    bcrypt_cost: u32,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    /// * `bcrypt_cost` - Work factor used when hashing new passwords
    pub fn new(pool: &'a SqlitePool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    /// Registers a new user with the `USER` role.
    ///
    /// The request is expected to be validated already.
    ///
    /// # Errors
    /// Returns `ServiceError::AlreadyExists` if the username is taken.
    pub async fn register_user(&self, request: &RegisterUserRequest) -> ServiceResult<PublicUser> {
        let repo = UserRepository::new(self.pool);

        if repo.username_exists(&request.username).await? {
            return Err(ServiceError::already_exists("User", &request.username));
        }

        let hashed_password = self.hash_password(&request.password)?;

        let data = NewUser {
            username: request.username.clone(),
            hashed_password,
            role: UserRole::User,
        };

        repo.create_user(data)
            .await
            .map(PublicUser::from)
            .map_err(|error| create_user_error(error, &request.username))
    }

    /// Verifies a username/password pair.
    ///
    /// # Errors
    /// Returns `ServiceError::InvalidCredentials` for an unknown user or a
    /// wrong password alike.
    pub async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let Some(user) = repo.get_user_by_username(username).await? else {
            // Same bcrypt work as a wrong password, so timing doesn't reveal unknown names.
            Self::verify_password(password, &self.dummy_hash()?)?;
            return Err(ServiceError::InvalidCredentials);
        };

        if !Self::verify_password(password, &user.hashed_password)? {
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Retrieves a user's public profile by username.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if the user doesn't exist
    pub async fn get_public_user_by_username(&self, username: &str) -> ServiceResult<PublicUser> {
        self.get_user_required(username).await.map(PublicUser::from)
    }

    /// Loads the principal used for token issuance.
    pub async fn load_user_details(&self, username: &str) -> ServiceResult<UserDetails> {
        self.get_user_required(username)
            .await
            .map(|user| UserDetails::from(&user))
    }

    async fn get_user_required(&self, username: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        repo.get_user_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", username))
    }

    /// Function to hash a password before storing in database
    fn hash_password(&self, password: &str) -> ServiceResult<String> {
        hash(password, self.bcrypt_cost)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    fn dummy_hash(&self) -> ServiceResult<String> {
        let mut hashes = DUMMY_HASHES
            .lock()
            .map_err(|_| ServiceError::internal_error("Dummy hash cache poisoned"))?;

        if let Some(existing) = hashes.get(&self.bcrypt_cost) {
            return Ok(existing.clone());
        }

        let dummy = self.hash_password(DUMMY_PASSWORD)?;
        hashes.insert(self.bcrypt_cost, dummy.clone());
        Ok(dummy)
    }

    /// Function to verify a password against the stored hash
    ///
    /// # Errors
    /// Returns `ServiceError` if the stored hash cannot be parsed
    fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
        verify(password, hash).map_err(|e| {
            ServiceError::internal_error(format!("Password verification failed: {}", e))
        })
    }
}

/// Maps an insert failure, treating a duplicate key as a lost race with a
/// concurrent registration of the same name.
fn create_user_error(error: anyhow::Error, username: &str) -> ServiceError {
    if is_unique_violation(&error) {
        ServiceError::already_exists("User", username)
    } else {
        error.into()
    }
}
