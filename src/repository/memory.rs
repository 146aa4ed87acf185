//! In-memory repositories, used for tests and for running without a database

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{EntityRepository, UsersRepository};
use crate::{
    error::AppResult,
    models::{Author, Book, Entity, NewUser, User},
};

/// Entities that can be materialized from a draft once an id is known
pub trait MemoryRecord: Entity {
    fn from_draft(id: i32, draft: Self::Draft) -> Self;
}

impl MemoryRecord for Author {
    fn from_draft(id: i32, draft: Self::Draft) -> Self {
        Author {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            bio: draft.bio,
        }
    }
}

impl MemoryRecord for Book {
    fn from_draft(id: i32, draft: Self::Draft) -> Self {
        Book {
            id,
            title: draft.title,
            year: draft.year,
            isbn: draft.isbn,
            summary: draft.summary,
            image: draft.image,
            author_id: draft.author_id,
        }
    }
}

struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }

    /// Ids are never handed out twice, even after deletes
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

/// In-memory implementation of [`EntityRepository`].
pub struct MemoryRepository<E> {
    table: RwLock<Table<E>>,
}

impl<E: MemoryRecord> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: MemoryRecord> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::new()),
        }
    }
}

#[async_trait]
impl<E: MemoryRecord> EntityRepository<E> for MemoryRepository<E> {
    async fn find_all(&self) -> AppResult<Vec<E>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<E>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.table.read().await.rows.contains_key(&id))
    }

    async fn create(&self, draft: E::Draft) -> AppResult<E> {
        let mut table = self.table.write().await;
        let id = table.next_id();
        let entity = E::from_draft(id, draft);
        table.rows.insert(id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: &E) -> AppResult<bool> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, entity: &E) -> AppResult<bool> {
        Ok(self.table.write().await.rows.remove(&entity.id()).is_some())
    }
}

/// In-memory implementation of [`UsersRepository`].
pub struct MemoryUsersRepository {
    table: RwLock<Table<User>>,
}

impl Default for MemoryUsersRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUsersRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::new()),
        }
    }
}

#[async_trait]
impl UsersRepository for MemoryUsersRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .find(|user| user.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut table = self.table.write().await;
        let id = table.next_id();
        let user = User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        table.rows.insert(id, user.clone());
        Ok(user)
    }
}
