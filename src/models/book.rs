//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{Entity, Identified};

/// Full book model from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub isbn: String,
    pub summary: Option<String>,
    /// Cover image location (URL or file name)
    pub image: Option<String>,
    pub author_id: Option<i32>,
}

/// Book fields before insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub year: i32,
    pub isbn: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub author_id: Option<i32>,
}

/// Book as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub isbn: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub author_id: Option<i32>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookDto {
    #[validate(length(min = 1, max = 50, message = "Title must be 1-50 characters"))]
    pub title: String,
    #[validate(range(min = 1000, max = 9999, message = "Year must be a four-digit year"))]
    pub year: i32,
    #[validate(length(min = 1, max = 50, message = "ISBN must be 1-50 characters"))]
    pub isbn: String,
    #[validate(length(max = 250, message = "Summary must be at most 250 characters"))]
    pub summary: Option<String>,
    pub image: Option<String>,
    #[validate(range(min = 1, message = "Author id must be positive"))]
    pub author_id: i32,
}

/// Update book request (full record)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookDto {
    pub id: i32,
    #[validate(length(min = 1, max = 50, message = "Title must be 1-50 characters"))]
    pub title: String,
    #[validate(range(min = 1000, max = 9999, message = "Year must be a four-digit year"))]
    pub year: i32,
    #[validate(length(min = 1, max = 50, message = "ISBN must be 1-50 characters"))]
    pub isbn: String,
    #[validate(length(max = 250, message = "Summary must be at most 250 characters"))]
    pub summary: Option<String>,
    pub image: Option<String>,
    #[validate(range(min = 1, message = "Author id must be positive"))]
    pub author_id: i32,
}

impl Entity for Book {
    const NAME: &'static str = "book";

    type Draft = NewBook;
    type ReadDto = BookDto;
    type CreateDto = CreateBookDto;
    type UpdateDto = UpdateBookDto;

    fn id(&self) -> i32 {
        self.id
    }
}

impl Identified for UpdateBookDto {
    fn id(&self) -> i32 {
        self.id
    }
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        BookDto {
            id: book.id,
            title: book.title,
            year: book.year,
            isbn: book.isbn,
            summary: book.summary,
            image: book.image,
            author_id: book.author_id,
        }
    }
}

impl From<CreateBookDto> for NewBook {
    fn from(dto: CreateBookDto) -> Self {
        NewBook {
            title: dto.title,
            year: dto.year,
            isbn: dto.isbn,
            summary: dto.summary,
            image: dto.image,
            author_id: Some(dto.author_id),
        }
    }
}

impl From<UpdateBookDto> for Book {
    fn from(dto: UpdateBookDto) -> Self {
        Book {
            id: dto.id,
            title: dto.title,
            year: dto.year,
            isbn: dto.isbn,
            summary: dto.summary,
            image: dto.image,
            author_id: Some(dto.author_id),
        }
    }
}
