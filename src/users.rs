//! User directory.
//!
//! The store is injected through [`UserStore`] so shared state never
//! depends on the concrete backing. The shipped [`InMemoryUsers`] keeps
//! records behind an `RwLock`; the uniqueness check and insert happen
//! under one write guard, so concurrent registrations of the same name
//! cannot both win. Passwords are argon2 hashes, never stored raw.

use std::{collections::HashMap, sync::RwLock};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone)]
struct UserRecord {
    password_hash: String,
    role: Role,
}

#[derive(Error, Debug, PartialEq)]
pub enum UserStoreError {
    #[error("Username already exists.")]
    UsernameTaken,

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

pub trait UserStore: Send + Sync {
    /// Inserts a new user, rejecting an exact username collision without
    /// touching the existing record.
    fn register(&self, username: &str, password: &str, role: Role) -> Result<(), UserStoreError>;

    fn verify(&self, username: &str, password: &str) -> bool;

    fn role(&self, username: &str) -> Option<Role>;
}

pub struct InMemoryUsers {
    records: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// A directory seeded with the single built-in admin account.
    pub fn with_admin(admin_password: &str) -> Result<Self, UserStoreError> {
        let users = Self::new();
        users.register("admin", admin_password, Role::Admin)?;
        Ok(users)
    }
}

impl Default for InMemoryUsers {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_password(password: &str) -> Result<String, UserStoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserStoreError::Hash(e.to_string()))
}

impl UserStore for InMemoryUsers {
    fn register(&self, username: &str, password: &str, role: Role) -> Result<(), UserStoreError> {
        // Only the check and insert are guarded; hashing stays outside the lock.
        let password_hash = hash_password(password)?;

        let mut records = self.records.write().expect("user directory lock poisoned");
        if records.contains_key(username) {
            return Err(UserStoreError::UsernameTaken);
        }
        records.insert(username.to_string(), UserRecord { password_hash, role });

        Ok(())
    }

    fn verify(&self, username: &str, password: &str) -> bool {
        let records = self.records.read().expect("user directory lock poisoned");
        let Some(record) = records.get(username) else {
            return false;
        };
        let Ok(parsed) = PasswordHash::new(&record.password_hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    fn role(&self, username: &str) -> Option<Role> {
        let records = self.records.read().expect("user directory lock poisoned");
        records.get(username).map(|record| record.role)
    }
}
