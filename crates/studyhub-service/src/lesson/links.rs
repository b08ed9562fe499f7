//! Links embedded in lesson records.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use studyhub_core::AppError;
use studyhub_core::result::AppResult;
use studyhub_core::types::{LessonId, LinkId};
use studyhub_entity::lesson::LessonLink;

use super::service::LessonService;
use crate::validation::{required_text, validate_request};

/// Request to attach a link to a lesson.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddLinkRequest {
    #[validate(length(min = 1, max = 200, message = "Link title must be 1-200 characters"))]
    pub title: String,
    #[validate(url(message = "Link URL is malformed"))]
    pub url: String,
}

fn checked_url(url: &str) -> AppResult<String> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(AppError::validation(format!(
            "Link URL '{url}' must use http or https"
        )));
    }
    Ok(url.to_string())
}

impl LessonService {
    /// Appends a link to the lesson's embedded list.
    pub async fn add_link(&self, lesson_id: LessonId, req: AddLinkRequest) -> AppResult<LessonLink> {
        let req = AddLinkRequest {
            title: req.title.trim().to_string(),
            url: req.url.trim().to_string(),
        };
        validate_request(&req)?;
        let title = required_text("Link title", &req.title)?;
        let url = checked_url(&req.url)?;

        let mut lesson = self.get_lesson(lesson_id).await?;
        let link = LessonLink::new(title, url);
        lesson.links.push(link.clone());
        self.save(&lesson).await?;

        info!(lesson_id = %lesson_id, link_id = %link.id, "Link added");
        Ok(link)
    }

    /// Removes a link. A missing lesson or link is not an error.
    pub async fn remove_link(&self, lesson_id: LessonId, link_id: LinkId) -> AppResult<bool> {
        let Some(mut lesson) = self.store.live_lesson(lesson_id).await? else {
            debug!(lesson_id = %lesson_id, "Link removal skipped, lesson is gone");
            return Ok(false);
        };
        if !lesson.remove_link(link_id) {
            return Ok(false);
        }
        self.save(&lesson).await?;

        info!(lesson_id = %lesson_id, link_id = %link_id, "Link removed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::CreateLessonRequest;
    use crate::test_support::{store, topic};
    use studyhub_core::error::ErrorKind;

    async fn service_with_lesson() -> (LessonService, LessonId) {
        let store = store().await;
        let topic_id = topic(&store).await;
        let service = LessonService::new(store);
        let lesson = service
            .create_lesson(CreateLessonRequest {
                topic_id,
                title: "Ser vs Estar".to_string(),
                date: None,
                description: None,
            })
            .await
            .unwrap();
        (service, lesson.id)
    }

    fn link(title: &str, url: &str) -> AddLinkRequest {
        AddLinkRequest {
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_and_remove_link() {
        let (service, lesson_id) = service_with_lesson().await;
        let added = service
            .add_link(lesson_id, link(" RAE ", " https://www.rae.es "))
            .await
            .unwrap();
        assert_eq!(added.title, "RAE");
        assert_eq!(added.url, "https://www.rae.es");

        let stored = service.get_lesson(lesson_id).await.unwrap();
        assert_eq!(stored.links, vec![added.clone()]);

        assert!(service.remove_link(lesson_id, added.id).await.unwrap());
        assert!(!service.remove_link(lesson_id, added.id).await.unwrap());
        assert!(!service.remove_link(LessonId(999), added.id).await.unwrap());
        assert!(service.get_lesson(lesson_id).await.unwrap().links.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_non_http_url() {
        let (service, lesson_id) = service_with_lesson().await;
        for url in ["ftp://example.com/a", "not a url", ""] {
            let err = service.add_link(lesson_id, link("A", url)).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation, "{url}");
        }
        assert!(service.get_lesson(lesson_id).await.unwrap().links.is_empty());
    }

    #[tokio::test]
    async fn test_add_to_missing_lesson() {
        let (service, _) = service_with_lesson().await;
        let err = service
            .add_link(LessonId(404), link("A", "https://example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
