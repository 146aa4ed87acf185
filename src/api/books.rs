//! Book endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{BookDto, CreateBookDto, UpdateBookDto},
    services::crud::{PathId, Payload},
    AppState,
};

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Book list", body = Vec<BookDto>),
        (status = 500, description = "Store failure", body = String)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookDto>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDto),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Store failure", body = String)
    )
)]
pub async fn get_book(State(state): State<AppState>, id: PathId) -> AppResult<Json<BookDto>> {
    let book = state.services.books.get(id).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBookDto,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Store failure (including an unknown author)", body = String)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    payload: Payload<CreateBookDto>,
) -> AppResult<(StatusCode, Json<BookDto>)> {
    let book = state.services.books.create(payload).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Replace a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBookDto,
    responses(
        (status = 204, description = "Book updated"),
        (status = 400, description = "Invalid input or id mismatch", body = ErrorResponse),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Store failure", body = String)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    id: PathId,
    payload: Payload<UpdateBookDto>,
) -> AppResult<StatusCode> {
    state.services.books.update(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Store failure", body = String)
    )
)]
pub async fn delete_book(State(state): State<AppState>, id: PathId) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
