//! Generic CRUD service shared by every catalog entity
//!
//! Each operation validates its input, makes the store calls, maps the result
//! and writes exactly one log line for the branch it ends on. Store failures
//! are logged here with their detail and leave as [`AppError::Internal`],
//! which renders as the generic 500 message.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Entity, Identified},
    repository::EntityRepository,
};

/// A JSON body as handed over by the extractor, rejection included
pub type Payload<T> = Result<Json<T>, JsonRejection>;

/// A record id taken from the URL path, rejection included
pub type PathId = Result<Path<i32>, PathRejection>;

pub struct CrudService<E: Entity> {
    repository: Arc<dyn EntityRepository<E>>,
}

impl<E: Entity> Clone for CrudService<E> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<E: Entity> CrudService<E> {
    pub fn new(repository: Arc<dyn EntityRepository<E>>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<E::ReadDto>> {
        match self.repository.find_all().await {
            Ok(entities) => {
                tracing::info!("Listed {} {} record(s)", entities.len(), E::NAME);
                Ok(entities.into_iter().map(Into::into).collect())
            }
            Err(e) => Err(store_failure::<E>("list", e)),
        }
    }

    pub async fn get(&self, id: PathId) -> AppResult<E::ReadDto> {
        let Path(id) = id.map_err(|rejection| rejected_id::<E>("get", rejection))?;
        match self.repository.find_by_id(id).await {
            Ok(Some(entity)) => {
                tracing::info!("Fetched {} id={}", E::NAME, id);
                Ok(entity.into())
            }
            Ok(None) => {
                tracing::warn!("Get: {} id={} not found", E::NAME, id);
                Err(AppError::NotFound)
            }
            Err(e) => Err(store_failure::<E>("get", e)),
        }
    }

    pub async fn create(&self, payload: Payload<E::CreateDto>) -> AppResult<E::ReadDto> {
        let dto = match payload {
            Ok(Json(dto)) => dto,
            Err(rejection) => return Err(rejected_payload::<E>("create", rejection)),
        };
        if let Err(errors) = dto.validate() {
            tracing::warn!("Create: invalid {} payload: {}", E::NAME, errors);
            return Err(errors.into());
        }

        match self.repository.create(dto.into()).await {
            Ok(entity) => {
                tracing::info!("Created {} id={}", E::NAME, entity.id());
                Ok(entity.into())
            }
            Err(e) => Err(store_failure::<E>("create", e)),
        }
    }

    pub async fn update(&self, id: PathId, payload: Payload<E::UpdateDto>) -> AppResult<()> {
        let Path(id) = id.map_err(|rejection| rejected_id::<E>("update", rejection))?;
        if id < 1 {
            tracing::warn!("Update: invalid {} id={}", E::NAME, id);
            return Err(AppError::BadRequest(format!("Invalid id {}", id)));
        }
        let dto = match payload {
            Ok(Json(dto)) => dto,
            Err(rejection) => return Err(rejected_payload::<E>("update", rejection)),
        };
        if dto.id() != id {
            tracing::warn!(
                "Update: {} id mismatch (path id={}, body id={})",
                E::NAME,
                id,
                dto.id()
            );
            return Err(AppError::BadRequest(
                "Body id does not match the path id".to_string(),
            ));
        }
        if let Err(errors) = dto.validate() {
            tracing::warn!("Update: invalid {} payload for id={}: {}", E::NAME, id, errors);
            return Err(errors.into());
        }

        match self.repository.exists(id).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("Update: {} id={} not found", E::NAME, id);
                return Err(AppError::NotFound);
            }
            Err(e) => return Err(store_failure::<E>("update", e)),
        }

        let entity: E = dto.into();
        match self.repository.update(&entity).await {
            Ok(true) => {
                tracing::info!("Updated {} id={}", E::NAME, id);
                Ok(())
            }
            Ok(false) => Err(store_refused::<E>("update", id)),
            Err(e) => Err(store_failure::<E>("update", e)),
        }
    }

    pub async fn delete(&self, id: PathId) -> AppResult<()> {
        let Path(id) = id.map_err(|rejection| rejected_id::<E>("delete", rejection))?;
        if id < 1 {
            tracing::warn!("Delete: invalid {} id={}", E::NAME, id);
            return Err(AppError::BadRequest(format!("Invalid id {}", id)));
        }

        // The full record is loaded first and handed to the store for removal
        let entity = match self.repository.find_by_id(id).await {
            Ok(Some(entity)) => entity,
            Ok(None) => {
                tracing::warn!("Delete: {} id={} not found", E::NAME, id);
                return Err(AppError::NotFound);
            }
            Err(e) => return Err(store_failure::<E>("delete", e)),
        };

        match self.repository.delete(&entity).await {
            Ok(true) => {
                tracing::info!("Deleted {} id={}", E::NAME, id);
                Ok(())
            }
            Ok(false) => Err(store_refused::<E>("delete", id)),
            Err(e) => Err(store_failure::<E>("delete", e)),
        }
    }
}

fn rejected_payload<E: Entity>(operation: &str, rejection: JsonRejection) -> AppError {
    let message = rejection.body_text();
    tracing::warn!("{}: rejected {} payload: {}", operation, E::NAME, message);
    AppError::BadRequest(message)
}

fn rejected_id<E: Entity>(operation: &str, rejection: PathRejection) -> AppError {
    let message = rejection.body_text();
    tracing::warn!("{}: rejected {} id: {}", operation, E::NAME, message);
    AppError::BadRequest(message)
}

fn store_failure<E: Entity>(operation: &str, error: AppError) -> AppError {
    tracing::error!("{}: {} store operation failed: {}", operation, E::NAME, error);
    AppError::Internal(error.to_string())
}

fn store_refused<E: Entity>(operation: &str, id: i32) -> AppError {
    tracing::error!("{}: store reported no change for {} id={}", operation, E::NAME, id);
    AppError::Internal(format!("{} of {} {} was not applied", operation, E::NAME, id))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        extract::{FromRequest, FromRequestParts},
        http::Request,
    };
    use mockall::mock;
    use tracing::{subscriber::DefaultGuard, Event, Level, Subscriber};
    use tracing_subscriber::{
        layer::{Context, SubscriberExt},
        Layer,
    };

    use super::*;
    use crate::{
        models::{Author, AuthorDto, CreateAuthorDto, NewAuthor, UpdateAuthorDto},
        repository::memory::MemoryRepository,
    };

    mock! {
        AuthorStore {}

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

    /// Records the level of every event this crate emits while installed
    #[derive(Clone, Default)]
    struct LogLevels(Arc<Mutex<Vec<Level>>>);

    impl LogLevels {
        fn install(&self) -> DefaultGuard {
            tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
        }

        fn take(&self) -> Vec<Level> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    impl<S: Subscriber> Layer<S> for LogLevels {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if event.metadata().target().starts_with(env!("CARGO_CRATE_NAME")) {
                self.0.lock().unwrap().push(*event.metadata().level());
            }
        }
    }

    fn service() -> CrudService<Author> {
        CrudService::new(Arc::new(MemoryRepository::<Author>::new()))
    }

    fn mocked(store: MockAuthorStore) -> CrudService<Author> {
        CrudService::new(Arc::new(store))
    }

    fn author(id: i32) -> Author {
        Author {
            id,
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            bio: None,
        }
    }

    fn id(value: i32) -> PathId {
        Ok(Path(value))
    }

    /// A request without a matched route carries no path parameters
    async fn missing_id() -> PathId {
        let (mut parts, _) = Request::new(()).into_parts();
        Path::<i32>::from_request_parts(&mut parts, &()).await
    }

    /// A request without a JSON content type is rejected by the extractor
    async fn missing_payload<T: serde::de::DeserializeOwned>() -> Payload<T> {
        Json::<T>::from_request(Request::new(Body::empty()), &()).await
    }

    fn create_dto(first: &str, last: &str) -> Payload<CreateAuthorDto> {
        Ok(Json(CreateAuthorDto {
            first_name: first.to_string(),
            last_name: last.to_string(),
            bio: None,
        }))
    }

    fn update_dto(id: i32, first: &str) -> Payload<UpdateAuthorDto> {
        Ok(Json(UpdateAuthorDto {
            id,
            first_name: first.to_string(),
            last_name: "Last".to_string(),
            bio: None,
        }))
    }

    #[tokio::test]
    async fn created_records_are_listed_and_fetchable() {
        let service = service();
        let created: AuthorDto = service.create(create_dto("A", "B")).await.unwrap();
        assert_eq!(created.id, 1);

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(service.get(id(created.id)).await.unwrap().last_name, "B");
    }

    #[tokio::test]
    async fn invalid_create_payload_is_a_validation_error() {
        let err = service().create(create_dto("", "B")).await.unwrap_err();
        match err {
            AppError::Validation(fields) => assert_eq!(fields[0].field, "firstName"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreadable_ids_are_bad_requests() {
        let service = service();
        assert!(matches!(
            service.get(missing_id().await).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            service.update(missing_id().await, update_dto(1, "A")).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            service.delete(missing_id().await).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn update_checks_ids_before_the_store() {
        let service = service();
        assert!(matches!(
            service.update(id(0), update_dto(0, "A")).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            service.update(id(5), update_dto(6, "A")).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            service.update(id(5), update_dto(5, "A")).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_replaces_the_record() {
        let service = service();
        let created = service.create(create_dto("A", "B")).await.unwrap();
        service
            .update(id(created.id), update_dto(created.id, "Changed"))
            .await
            .unwrap();
        assert_eq!(service.get(id(created.id)).await.unwrap().first_name, "Changed");
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let service = service();
        let created = service.create(create_dto("A", "B")).await.unwrap();
        assert!(service.delete(id(created.id)).await.is_ok());
        assert!(matches!(
            service.delete(id(created.id)).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(service.delete(id(-1)).await, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn successful_operations_log_once_at_info() {
        let levels = LogLevels::default();
        let _guard = levels.install();
        let service = service();

        let created = service.create(create_dto("A", "B")).await.unwrap();
        assert_eq!(levels.take(), vec![Level::INFO]);

        service.list().await.unwrap();
        assert_eq!(levels.take(), vec![Level::INFO]);

        service.get(id(created.id)).await.unwrap();
        assert_eq!(levels.take(), vec![Level::INFO]);

        service
            .update(id(created.id), update_dto(created.id, "C"))
            .await
            .unwrap();
        assert_eq!(levels.take(), vec![Level::INFO]);

        service.delete(id(created.id)).await.unwrap();
        assert_eq!(levels.take(), vec![Level::INFO]);
    }

    #[tokio::test]
    async fn rejected_requests_log_once_at_warn() {
        let levels = LogLevels::default();
        let _guard = levels.install();
        let service = service();

        let _ = service.create(missing_payload().await).await.unwrap_err();
        assert_eq!(levels.take(), vec![Level::WARN]);

        let _ = service.create(create_dto("", "B")).await.unwrap_err();
        assert_eq!(levels.take(), vec![Level::WARN]);

        let _ = service.get(missing_id().await).await.unwrap_err();
        assert_eq!(levels.take(), vec![Level::WARN]);

        let _ = service.update(id(0), update_dto(0, "A")).await.unwrap_err();
        assert_eq!(levels.take(), vec![Level::WARN]);

        let _ = service.update(id(3), missing_payload().await).await.unwrap_err();
        assert_eq!(levels.take(), vec![Level::WARN]);

        let _ = service.update(id(3), update_dto(4, "A")).await.unwrap_err();
        assert_eq!(levels.take(), vec![Level::WARN]);

        let _ = service.delete(id(-2)).await.unwrap_err();
        assert_eq!(levels.take(), vec![Level::WARN]);
    }

    #[tokio::test]
    async fn missing_records_log_once_at_warn() {
        let levels = LogLevels::default();
        let _guard = levels.install();
        let service = service();

        let _ = service.get(id(9)).await.unwrap_err();
        assert_eq!(levels.take(), vec![Level::WARN]);

        let _ = service.update(id(9), update_dto(9, "A")).await.unwrap_err();
        assert_eq!(levels.take(), vec![Level::WARN]);

        let _ = service.delete(id(9)).await.unwrap_err();
        assert_eq!(levels.take(), vec![Level::WARN]);
    }

    #[tokio::test]
    async fn store_failures_log_once_at_error() {
        let levels = LogLevels::default();
        let _guard = levels.install();

        let mut store = MockAuthorStore::new();
        store
            .expect_find_all()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        store
            .expect_create()
            .returning(|_| Err(AppError::Internal("insert failed".to_string())));
        store.expect_find_by_id().returning(|id| Ok(Some(author(id))));
        store.expect_exists().returning(|_| Ok(true));
        store.expect_update().returning(|_| Ok(false));
        store.expect_delete().returning(|_| Ok(false));
        let service = mocked(store);

        assert!(matches!(service.list().await, Err(AppError::Internal(_))));
        assert_eq!(levels.take(), vec![Level::ERROR]);

        assert!(matches!(
            service.create(create_dto("A", "B")).await,
            Err(AppError::Internal(_))
        ));
        assert_eq!(levels.take(), vec![Level::ERROR]);

        assert!(matches!(
            service.update(id(4), update_dto(4, "A")).await,
            Err(AppError::Internal(_))
        ));
        assert_eq!(levels.take(), vec![Level::ERROR]);

        assert!(matches!(service.delete(id(4)).await, Err(AppError::Internal(_))));
        assert_eq!(levels.take(), vec![Level::ERROR]);
    }
}
