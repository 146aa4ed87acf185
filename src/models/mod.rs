//! Data models for the bookstore

pub mod author;
pub mod book;
pub mod user;

use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

// Re-export commonly used types
pub use author::{Author, AuthorDto, CreateAuthorDto, NewAuthor, UpdateAuthorDto};
pub use book::{Book, BookDto, CreateBookDto, NewBook, UpdateBookDto};
pub use user::{NewUser, User};

/// A persisted record exposed through the generic CRUD endpoints.
///
/// Ties an entity to its transfer shapes. Conversions between them are plain
/// `From` implementations, so mapping stays field-for-field.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Singular, human-readable name used in log lines ("author", "book")
    const NAME: &'static str;

    /// The entity before the store has assigned it an id
    type Draft: Send + Sync + 'static;
    /// Response shape
    type ReadDto: Serialize + From<Self> + Send;
    /// Request shape for creation
    type CreateDto: DeserializeOwned + Validate + Into<Self::Draft> + Send;
    /// Request shape for full-record replacement
    type UpdateDto: DeserializeOwned + Validate + Into<Self> + Identified + Send;

    fn id(&self) -> i32;
}

/// Request payloads that carry the id of the record they target
pub trait Identified {
    fn id(&self) -> i32;
}
