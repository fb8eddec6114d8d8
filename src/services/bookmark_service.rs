//! src/services/bookmark_service.rs
//!
//! BookmarkService — CRUD over the `bookmarks` table. Inputs arrive already
//! validated; outputs are raw rows, sanitized later at the HTTP boundary.

use crate::models::bookmark::{Bookmark, BookmarkPatch, NewBookmark};
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("bookmark `{0}` not found")]
    NotFound(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// BookmarkService provides the record operations behind the HTTP API:
/// - List every bookmark
/// - Fetch, update or delete one bookmark by id
/// - Create a bookmark with a freshly generated id
///
/// Every operation is a single round-trip (plus the shared id lookup for
/// update and delete), so no transactions are needed.
#[derive(Clone)]
pub struct BookmarkService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl BookmarkService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Parse a path id. Anything that is not a UUID cannot name a row.
    fn parse_id(id: &str) -> ServiceResult<Uuid> {
        Uuid::parse_str(id).map_err(|_| ServiceError::NotFound(id.to_string()))
    }

    /// Look a bookmark up by id.
    ///
    /// Shared by get, update and delete. Returns NotFound if missing.
    async fn fetch_bookmark(&self, id: Uuid) -> ServiceResult<Bookmark> {
        sqlx::query_as::<_, Bookmark>(
            "SELECT id, title, url, description, rating FROM bookmarks WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => ServiceError::NotFound(id.to_string()),
            other => ServiceError::Sqlx(other),
        })
    }

    /// All bookmarks in insertion order. Empty when the table is empty.
    pub async fn list(&self) -> ServiceResult<Vec<Bookmark>> {
        let rows = sqlx::query_as::<_, Bookmark>(
            "SELECT id, title, url, description, rating FROM bookmarks ORDER BY rowid ASC",
        )
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: &str) -> ServiceResult<Bookmark> {
        let id = Self::parse_id(id)?;
        self.fetch_bookmark(id).await
    }

    /// Insert a validated bookmark and return the stored row, including its
    /// generated id.
    pub async fn create(&self, new: NewBookmark) -> ServiceResult<Bookmark> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (id, title, url, description, rating)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, url, description, rating
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.url)
        .bind(new.description.as_deref())
        .bind(new.rating)
        .fetch_one(&*self.db)
        .await?;

        debug!("created bookmark {}", bookmark.id);
        Ok(bookmark)
    }

    /// Merge the supplied fields into an existing bookmark.
    ///
    /// Only columns present in `patch` appear in the UPDATE statement.
    pub async fn update(&self, id: &str, patch: BookmarkPatch) -> ServiceResult<()> {
        let id = Self::parse_id(id)?;
        self.fetch_bookmark(id).await?;

        if patch.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE bookmarks SET ");
        {
            let mut columns = builder.separated(", ");
            if let Some(title) = patch.title {
                columns.push("title = ");
                columns.push_bind_unseparated(title);
            }
            if let Some(url) = patch.url {
                columns.push("url = ");
                columns.push_bind_unseparated(url);
            }
            if let Some(description) = patch.description {
                columns.push("description = ");
                columns.push_bind_unseparated(description);
            }
            if let Some(rating) = patch.rating {
                columns.push("rating = ");
                columns.push_bind_unseparated(rating);
            }
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder.build().execute(&*self.db).await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound(id.to_string()));
        }

        debug!("updated bookmark {}", id);
        Ok(())
    }

    /// Delete a bookmark. A second delete of the same id is NotFound.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = Self::parse_id(id)?;
        self.fetch_bookmark(id).await?;

        let result = sqlx::query("DELETE FROM bookmarks WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound(id.to_string()));
        }

        debug!("deleted bookmark {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use std::collections::HashSet;

    async fn service() -> BookmarkService {
        BookmarkService::new(Arc::new(memory_pool().await))
    }

    fn new_bookmark(title: &str, rating: i64) -> NewBookmark {
        NewBookmark {
            title: title.into(),
            url: format!("http://{}.com", title.to_lowercase()),
            description: Some(format!("about {title}")),
            rating,
        }
    }

    #[tokio::test]
    async fn list_is_empty_without_rows() {
        let svc = service().await;
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let svc = service().await;
        let created = svc.create(new_bookmark("Google", 4)).await.unwrap();

        assert_eq!(created.title, "Google");
        assert_eq!(created.url, "http://google.com");
        assert_eq!(created.description.as_deref(), Some("about Google"));
        assert_eq!(created.rating, 4);

        let fetched = svc.get_by_id(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn created_ids_are_unique_and_listed_in_order() {
        let svc = service().await;
        let titles = ["Google", "Facebook", "LinkedIn", "Thinkful"];
        let mut ids = HashSet::new();
        for (i, title) in titles.iter().enumerate() {
            let created = svc.create(new_bookmark(title, i as i64)).await.unwrap();
            assert!(ids.insert(created.id));
        }

        let listed: Vec<String> = svc
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(listed, titles);
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let svc = service().await;
        let missing = Uuid::new_v4().to_string();

        assert!(matches!(
            svc.get_by_id(&missing).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            svc.get_by_id("233").await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            svc.delete(&missing).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            svc.update(
                &missing,
                BookmarkPatch {
                    title: Some("x".into()),
                    ..Default::default()
                }
            )
            .await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let svc = service().await;
        let created = svc.create(new_bookmark("Facebook", 4)).await.unwrap();
        let id = created.id.to_string();

        svc.update(
            &id,
            BookmarkPatch {
                title: Some("just the title".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let fetched = svc.get_by_id(&id).await.unwrap();
        assert_eq!(
            fetched,
            Bookmark {
                title: "just the title".into(),
                ..created.clone()
            }
        );

        svc.update(
            &id,
            BookmarkPatch {
                url: Some("https://updatedurl.com".into()),
                description: Some("updated description".into()),
                rating: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let fetched = svc.get_by_id(&id).await.unwrap();
        assert_eq!(fetched.title, "just the title");
        assert_eq!(fetched.url, "https://updatedurl.com");
        assert_eq!(fetched.description.as_deref(), Some("updated description"));
        assert_eq!(fetched.rating, 5);
    }

    #[tokio::test]
    async fn delete_removes_the_row_once() {
        let svc = service().await;
        let keep = svc.create(new_bookmark("Google", 4)).await.unwrap();
        let gone = svc.create(new_bookmark("Facebook", 4)).await.unwrap();
        let gone_id = gone.id.to_string();

        svc.delete(&gone_id).await.unwrap();
        assert!(matches!(
            svc.delete(&gone_id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(svc.list().await.unwrap(), vec![keep]);
    }
}
