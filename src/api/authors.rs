//! Author endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::author::{AuthorDto, CreateAuthorDto, UpdateAuthorDto},
    services::crud::{PathId, Payload},
    AppState,
};

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Author list", body = Vec<AuthorDto>),
        (status = 500, description = "Store failure", body = String)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<AuthorDto>>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDto),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Author not found"),
        (status = 500, description = "Store failure", body = String)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    id: PathId,
) -> AppResult<Json<AuthorDto>> {
    let author = state.services.authors.get(id).await?;
    Ok(Json(author))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = CreateAuthorDto,
    responses(
        (status = 201, description = "Author created", body = AuthorDto),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Store failure", body = String)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    payload: Payload<CreateAuthorDto>,
) -> AppResult<(StatusCode, Json<AuthorDto>)> {
    let author = state.services.authors.create(payload).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Replace an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = UpdateAuthorDto,
    responses(
        (status = 204, description = "Author updated"),
        (status = 400, description = "Invalid input or id mismatch", body = ErrorResponse),
        (status = 404, description = "Author not found"),
        (status = 500, description = "Store failure", body = String)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    id: PathId,
    payload: Payload<UpdateAuthorDto>,
) -> AppResult<StatusCode> {
    state.services.authors.update(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Author not found"),
        (status = 500, description = "Store failure", body = String)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    id: PathId,
) -> AppResult<StatusCode> {
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
