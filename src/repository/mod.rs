//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod memory;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Author, Book, Entity, NewUser, User},
};

/// Store access for one CRUD entity.
///
/// `update` and `delete` report whether a row was actually written; store
/// failures travel as errors so the caller can log them before collapsing
/// them into a response.
#[async_trait]
pub trait EntityRepository<E: Entity>: Send + Sync {
    /// All records, ordered by id
    async fn find_all(&self) -> AppResult<Vec<E>>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<E>>;
    async fn exists(&self, id: i32) -> AppResult<bool>;
    /// Insert and return the record with its assigned id
    async fn create(&self, draft: E::Draft) -> AppResult<E>;
    async fn update(&self, entity: &E) -> AppResult<bool>;
    async fn delete(&self, entity: &E) -> AppResult<bool>;
}

#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;
    /// Case-insensitive lookup
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn create(&self, user: NewUser) -> AppResult<User>;
}

/// Main repository struct holding one repository per entity
#[derive(Clone)]
pub struct Repository {
    pool: Option<Pool<Postgres>>,
    pub authors: Arc<dyn EntityRepository<Author>>,
    pub books: Arc<dyn EntityRepository<Book>>,
    pub users: Arc<dyn UsersRepository>,
}

impl Repository {
    /// Create a repository backed by the given database pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            users: Arc::new(users::PgUsersRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Create a repository that keeps everything in process memory
    pub fn in_memory() -> Self {
        Self {
            pool: None,
            authors: Arc::new(memory::MemoryRepository::<Author>::new()),
            books: Arc::new(memory::MemoryRepository::<Book>::new()),
            users: Arc::new(memory::MemoryUsersRepository::new()),
        }
    }

    /// Assemble a repository from arbitrary implementations
    pub fn from_parts(
        authors: Arc<dyn EntityRepository<Author>>,
        books: Arc<dyn EntityRepository<Book>>,
        users: Arc<dyn UsersRepository>,
    ) -> Self {
        Self {
            pool: None,
            authors,
            books,
            users,
        }
    }

    /// Check that the data store answers
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}
