//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{Entity, Identified};

/// Full author model from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

/// Author fields before insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

/// Author as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthorDto {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,
    #[validate(length(max = 250, message = "Bio must be at most 250 characters"))]
    pub bio: Option<String>,
}

/// Update author request (full record)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthorDto {
    pub id: i32,
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,
    #[validate(length(max = 250, message = "Bio must be at most 250 characters"))]
    pub bio: Option<String>,
}

impl Entity for Author {
    const NAME: &'static str = "author";

    type Draft = NewAuthor;
    type ReadDto = AuthorDto;
    type CreateDto = CreateAuthorDto;
    type UpdateDto = UpdateAuthorDto;

    fn id(&self) -> i32 {
        self.id
    }
}

impl Identified for UpdateAuthorDto {
    fn id(&self) -> i32 {
        self.id
    }
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        AuthorDto {
            id: author.id,
            first_name: author.first_name,
            last_name: author.last_name,
            bio: author.bio,
        }
    }
}

impl From<CreateAuthorDto> for NewAuthor {
    fn from(dto: CreateAuthorDto) -> Self {
        NewAuthor {
            first_name: dto.first_name,
            last_name: dto.last_name,
            bio: dto.bio,
        }
    }
}

impl From<UpdateAuthorDto> for Author {
    fn from(dto: UpdateAuthorDto) -> Self {
        Author {
            id: dto.id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            bio: dto.bio,
        }
    }
}
