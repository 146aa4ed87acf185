//! Business logic services

pub mod auth;
pub mod crud;

use crate::{
    config::AuthConfig,
    models::{Author, Book},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: crud::CrudService<Author>,
    pub books: crud::CrudService<Book>,
    pub auth: auth::AuthService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            authors: crud::CrudService::new(repository.authors.clone()),
            books: crud::CrudService::new(repository.books.clone()),
            auth: auth::AuthService::new(repository.users.clone(), auth_config),
            repository,
        }
    }
}
