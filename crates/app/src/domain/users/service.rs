//! Users service.
//!
//! The storage surface of the auth collaborator: accounts live in the
//! `users` store with a unique `email` index. Session issuance and
//! credential handling are outside this crate.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use satchel::Db;

use crate::{
    domain::users::{
        errors::UsersServiceError,
        models::{NewUser, User, UserRole},
    },
    schema::{indexes, stores},
    uuids::UserUuid,
};

#[derive(Debug, Clone)]
pub struct LocalUsersService {
    db: Arc<Db>,
}

impl LocalUsersService {
    #[must_use]
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UsersService for LocalUsersService {
    async fn create_user(&self, user: NewUser) -> Result<User, UsersServiceError> {
        let created = User {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: Timestamp::now(),
        };

        self.db.add(stores::USERS, &created).await?;

        Ok(created)
    }

    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError> {
        self.db
            .get(stores::USERS, &user.key())
            .await?
            .ok_or(UsersServiceError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User, UsersServiceError> {
        let mut matches: Vec<User> = self
            .db
            .get_by_index(stores::USERS, indexes::EMAIL, email)
            .await?;

        matches.pop().ok_or(UsersServiceError::NotFound)
    }

    async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, UsersServiceError> {
        Ok(self
            .db
            .get_by_index(stores::USERS, indexes::ROLE, role)
            .await?)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Create an account. Emails are unique across accounts.
    async fn create_user(&self, user: NewUser) -> Result<User, UsersServiceError>;

    /// Retrieve an account by id.
    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError>;

    /// Retrieve an account by its unique email.
    async fn get_by_email(&self, email: &str) -> Result<User, UsersServiceError>;

    /// All accounts with the given role.
    async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, UsersServiceError>;
}
