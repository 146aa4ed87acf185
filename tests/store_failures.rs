//! Store failures must surface as the generic 500 response

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookstore_server::{
    api::create_router,
    error::{AppError, AppResult, GENERIC_ERROR_MESSAGE},
    models::{Author, Book, NewAuthor},
    repository::{
        memory::{MemoryRepository, MemoryUsersRepository},
        EntityRepository, Repository,
    },
    AppConfig, AppState,
};
use mockall::mock;
use serde_json::json;
use tower::ServiceExt;

mock! {
    pub AuthorStore {}

    #[async_trait]
    impl EntityRepository<Author> for AuthorStore {
        async fn find_all(&self) -> AppResult<Vec<Author>>;
        async fn find_by_id(&self, id: i32) -> AppResult<Option<Author>>;
        async fn exists(&self, id: i32) -> AppResult<bool>;
        async fn create(&self, draft: NewAuthor) -> AppResult<Author>;
        async fn update(&self, entity: &Author) -> AppResult<bool>;
        async fn delete(&self, entity: &Author) -> AppResult<bool>;
    }
}

fn db_error() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

fn author(id: i32) -> Author {
    Author {
        id,
        first_name: "A".to_string(),
        last_name: "B".to_string(),
        bio: None,
    }
}

fn app(store: MockAuthorStore) -> Router {
    let repository = Repository::from_parts(
        Arc::new(store),
        Arc::new(MemoryRepository::<Book>::new()),
        Arc::new(MemoryUsersRepository::new()),
    );
    create_router(AppState::new(AppConfig::default(), repository))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn assert_generic_failure((status, body): (StatusCode, String)) {
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, GENERIC_ERROR_MESSAGE);
}

#[tokio::test]
async fn list_failure_is_generic() {
    let mut store = MockAuthorStore::new();
    store.expect_find_all().returning(|| Err(db_error()));

    assert_generic_failure(send(app(store), Method::GET, "/api/authors", None).await);
}

#[tokio::test]
async fn get_failure_is_generic() {
    let mut store = MockAuthorStore::new();
    store
        .expect_find_by_id()
        .returning(|_| Err(AppError::Internal("disk on fire".to_string())));

    assert_generic_failure(send(app(store), Method::GET, "/api/authors/1", None).await);
}

#[tokio::test]
async fn create_failure_is_generic() {
    let mut store = MockAuthorStore::new();
    store.expect_create().times(1).returning(|_| Err(db_error()));

    let body = json!({ "firstName": "A", "lastName": "B" });
    assert_generic_failure(send(app(store), Method::POST, "/api/authors", Some(body)).await);
}

#[tokio::test]
async fn invalid_create_never_reaches_the_store() {
    let mut store = MockAuthorStore::new();
    store.expect_create().never();

    let body = json!({ "firstName": "", "lastName": "B" });
    let (status, _) = send(app(store), Method::POST, "/api/authors", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_not_applied_is_generic() {
    let mut store = MockAuthorStore::new();
    store.expect_exists().returning(|_| Ok(true));
    store.expect_update().times(1).returning(|_| Ok(false));

    let body = json!({ "id": 3, "firstName": "A", "lastName": "B" });
    assert_generic_failure(send(app(store), Method::PUT, "/api/authors/3", Some(body)).await);
}

#[tokio::test]
async fn update_existence_failure_is_generic() {
    let mut store = MockAuthorStore::new();
    store.expect_exists().returning(|_| Err(db_error()));
    store.expect_update().never();

    let body = json!({ "id": 3, "firstName": "A", "lastName": "B" });
    assert_generic_failure(send(app(store), Method::PUT, "/api/authors/3", Some(body)).await);
}

#[tokio::test]
async fn delete_fetches_the_record_before_removing_it() {
    let mut store = MockAuthorStore::new();
    store
        .expect_find_by_id()
        .withf(|id| *id == 8)
        .times(1)
        .returning(|id| Ok(Some(author(id))));
    store
        .expect_delete()
        .withf(|entity| entity.id == 8 && entity.last_name == "B")
        .times(1)
        .returning(|_| Ok(true));

    let (status, body) = send(app(store), Method::DELETE, "/api/authors/8", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn delete_failures_are_generic() {
    let mut store = MockAuthorStore::new();
    store.expect_find_by_id().returning(|id| Ok(Some(author(id))));
    store.expect_delete().returning(|_| Ok(false));
    assert_generic_failure(send(app(store), Method::DELETE, "/api/authors/8", None).await);

    let mut store = MockAuthorStore::new();
    store.expect_find_by_id().returning(|id| Ok(Some(author(id))));
    store.expect_delete().returning(|_| Err(db_error()));
    assert_generic_failure(send(app(store), Method::DELETE, "/api/authors/8", None).await);
}

#[tokio::test]
async fn mismatched_update_never_reaches_the_store() {
    let mut store = MockAuthorStore::new();
    store.expect_exists().never();
    store.expect_update().never();

    let body = json!({ "id": 6, "firstName": "A", "lastName": "B" });
    let (status, _) = send(app(store), Method::PUT, "/api/authors/5", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
