//! Lesson CRUD operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use studyhub_core::AppError;
use studyhub_core::result::AppResult;
use studyhub_core::traits::{ChildRepository, Repository};
use studyhub_core::types::{LessonId, TopicId, sort_ordered};
use studyhub_database::{CascadeReport, CascadeTarget, StudyStore};
use studyhub_entity::lesson::{CreateLesson, Lesson};

use crate::ordering::check_permutation;
use crate::validation::{optional_text, required_text, validate_request};

/// Manages lesson records and their embedded links.
#[derive(Debug, Clone)]
pub struct LessonService {
    pub(super) store: StudyStore,
}

/// Request to create a lesson inside a topic.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLessonRequest {
    pub topic_id: TopicId,
    #[validate(length(min = 1, max = 200, message = "Lesson title must be 1-200 characters"))]
    pub title: String,
    pub date: Option<NaiveDate>,
    #[validate(length(max = 10000, message = "Description is too long"))]
    pub description: Option<String>,
}

/// Request to change a lesson.
///
/// `None` leaves a field unchanged; for the optional fields `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateLessonRequest {
    #[validate(length(min = 1, max = 200, message = "Lesson title must be 1-200 characters"))]
    pub title: Option<String>,
    pub date: Option<Option<NaiveDate>>,
    pub description: Option<Option<String>>,
}

impl LessonService {
    /// Creates a new lesson service.
    pub fn new(store: StudyStore) -> Self {
        Self { store }
    }

    /// Gets a lesson by ID. A lesson without a live topic and folder is
    /// not found.
    pub async fn get_lesson(&self, lesson_id: LessonId) -> AppResult<Lesson> {
        self.store
            .live_lesson(lesson_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Lesson {lesson_id} not found")))
    }

    /// Lists a topic's lessons in display order.
    pub async fn list_lessons(&self, topic_id: TopicId) -> AppResult<Vec<Lesson>> {
        let mut lessons = self.store.lessons().list_by_parent(topic_id).await?;
        sort_ordered(&mut lessons);
        Ok(lessons)
    }

    /// Creates a lesson at the end of its topic.
    pub async fn create_lesson(&self, req: CreateLessonRequest) -> AppResult<Lesson> {
        validate_request(&req)?;
        let title = required_text("Lesson title", &req.title)?;
        self.store
            .live_topic(req.topic_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Topic {} not found", req.topic_id)))?;
        let order = self.store.lessons().count_by_parent(req.topic_id).await? as i64;

        let id = self
            .store
            .lessons()
            .add(&CreateLesson {
                topic_id: req.topic_id,
                title,
                date: req.date,
                description: optional_text(req.description.as_deref()),
                order: Some(order),
            })
            .await?;
        let lesson = self.get_lesson(id).await?;

        info!(
            lesson_id = %lesson.id,
            topic_id = %lesson.topic_id,
            order,
            "Lesson created"
        );
        Ok(lesson)
    }

    /// Replaces the lesson's title, date, or description.
    pub async fn update_lesson(
        &self,
        lesson_id: LessonId,
        req: UpdateLessonRequest,
    ) -> AppResult<Lesson> {
        validate_request(&req)?;
        let mut lesson = self.get_lesson(lesson_id).await?;
        if let Some(title) = req.title.as_deref() {
            lesson.title = required_text("Lesson title", title)?;
        }
        if let Some(date) = req.date {
            lesson.date = date;
        }
        if let Some(description) = req.description {
            lesson.description = optional_text(description.as_deref());
        }

        self.save(&lesson).await?;
        info!(lesson_id = %lesson_id, "Lesson updated");
        Ok(lesson)
    }

    /// Deletes a lesson with its files. Links go with the record.
    pub async fn delete_lesson(&self, lesson_id: LessonId) -> AppResult<CascadeReport> {
        let topic_id = self.store.lessons().get(lesson_id).await?.map(|l| l.topic_id);
        let report = self
            .store
            .cascade()
            .run(CascadeTarget::Lesson(lesson_id))
            .await?;
        if let Some(topic_id) = topic_id {
            self.compact_order(topic_id).await?;
        }
        info!(lesson_id = %lesson_id, removed = report.total(), "Lesson deleted");
        Ok(report)
    }

    /// Assigns dense display positions within one topic.
    pub async fn reorder_lessons(
        &self,
        topic_id: TopicId,
        ordered_ids: &[LessonId],
    ) -> AppResult<usize> {
        let lessons = self.store.lessons().list_by_parent(topic_id).await?;
        let current: Vec<LessonId> = lessons.iter().map(|l| l.id).collect();
        check_permutation(&current, ordered_ids)?;

        let changed = self.write_order(&lessons, ordered_ids).await?;
        info!(topic_id = %topic_id, changed, "Lessons reordered");
        Ok(changed)
    }

    /// Renumbers a topic's lessons `0..n` in their current display order.
    async fn compact_order(&self, topic_id: TopicId) -> AppResult<usize> {
        let mut lessons = self.store.lessons().list_by_parent(topic_id).await?;
        sort_ordered(&mut lessons);
        let ids: Vec<LessonId> = lessons.iter().map(|l| l.id).collect();
        let changed = self.write_order(&lessons, &ids).await?;
        debug!(topic_id = %topic_id, changed, "Lesson order compacted");
        Ok(changed)
    }

    async fn write_order(&self, lessons: &[Lesson], ordered_ids: &[LessonId]) -> AppResult<usize> {
        let mut changed = 0;
        for (position, id) in ordered_ids.iter().enumerate() {
            let Some(lesson) = lessons.iter().find(|l| l.id == *id) else {
                continue;
            };
            let order = Some(position as i64);
            if lesson.order != order {
                let mut lesson = lesson.clone();
                lesson.order = order;
                self.save(&lesson).await?;
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Write back a full record that was read earlier.
    pub(super) async fn save(&self, lesson: &Lesson) -> AppResult<()> {
        if !self.store.lessons().update(lesson).await? {
            return Err(AppError::not_found(format!(
                "Lesson {} not found",
                lesson.id
            )));
        }
        Ok(())
    }
}
