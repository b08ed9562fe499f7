//! Topic CRUD operations.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use studyhub_core::AppError;
use studyhub_core::result::AppResult;
use studyhub_core::traits::{ChildRepository, Repository};
use studyhub_core::types::{FolderId, TopicId, sort_ordered};
use studyhub_database::{CascadeReport, CascadeTarget, StudyStore};
use studyhub_entity::topic::{CreateTopic, Topic};

use crate::ordering::check_permutation;
use crate::validation::{required_text, validate_request};

/// Manages topic records.
#[derive(Debug, Clone)]
pub struct TopicService {
    store: StudyStore,
}

/// Request to create a topic inside a folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTopicRequest {
    pub folder_id: FolderId,
    #[validate(length(min = 1, max = 120, message = "Topic name must be 1-120 characters"))]
    pub name: String,
}

/// Request to rename a topic.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTopicRequest {
    #[validate(length(min = 1, max = 120, message = "Topic name must be 1-120 characters"))]
    pub name: String,
}

impl TopicService {
    /// Creates a new topic service.
    pub fn new(store: StudyStore) -> Self {
        Self { store }
    }

    /// Gets a topic by ID. A topic whose folder is gone is not found.
    pub async fn get_topic(&self, topic_id: TopicId) -> AppResult<Topic> {
        self.store
            .live_topic(topic_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Topic {topic_id} not found")))
    }

    /// Lists a folder's topics in display order.
    pub async fn list_topics(&self, folder_id: FolderId) -> AppResult<Vec<Topic>> {
        let mut topics = self.store.topics().list_by_parent(folder_id).await?;
        sort_ordered(&mut topics);
        Ok(topics)
    }

    /// Creates a topic at the end of its folder.
    pub async fn create_topic(&self, req: CreateTopicRequest) -> AppResult<Topic> {
        validate_request(&req)?;
        let name = required_text("Topic name", &req.name)?;
        self.store
            .folders()
            .get(req.folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {} not found", req.folder_id)))?;
        let order = self.store.topics().count_by_parent(req.folder_id).await? as i64;

        let id = self
            .store
            .topics()
            .add(&CreateTopic {
                folder_id: req.folder_id,
                name,
                order: Some(order),
            })
            .await?;
        let topic = self.get_topic(id).await?;

        info!(
            topic_id = %topic.id,
            folder_id = %topic.folder_id,
            order,
            "Topic created"
        );
        Ok(topic)
    }

    /// Renames a topic.
    pub async fn update_topic(
        &self,
        topic_id: TopicId,
        req: UpdateTopicRequest,
    ) -> AppResult<Topic> {
        validate_request(&req)?;
        let mut topic = self.get_topic(topic_id).await?;
        topic.name = required_text("Topic name", &req.name)?;

        if !self.store.topics().update(&topic).await? {
            return Err(AppError::not_found(format!("Topic {topic_id} not found")));
        }

        info!(topic_id = %topic_id, name = %topic.name, "Topic updated");
        Ok(topic)
    }

    /// Deletes a topic with its lessons and files, then closes the gap
    /// it leaves in its folder's order.
    pub async fn delete_topic(&self, topic_id: TopicId) -> AppResult<CascadeReport> {
        let folder_id = self.store.topics().get(topic_id).await?.map(|t| t.folder_id);
        let report = self
            .store
            .cascade()
            .run(CascadeTarget::Topic(topic_id))
            .await?;
        if let Some(folder_id) = folder_id {
            self.compact_order(folder_id).await?;
        }
        info!(topic_id = %topic_id, removed = report.total(), "Topic deleted");
        Ok(report)
    }

    /// Assigns dense display positions within one folder.
    pub async fn reorder_topics(
        &self,
        folder_id: FolderId,
        ordered_ids: &[TopicId],
    ) -> AppResult<usize> {
        let topics = self.store.topics().list_by_parent(folder_id).await?;
        let current: Vec<TopicId> = topics.iter().map(|t| t.id).collect();
        check_permutation(&current, ordered_ids)?;

        let changed = self.write_order(&topics, ordered_ids).await?;
        info!(folder_id = %folder_id, changed, "Topics reordered");
        Ok(changed)
    }

    /// Renumbers a folder's topics `0..n` in their current display order.
    async fn compact_order(&self, folder_id: FolderId) -> AppResult<usize> {
        let mut topics = self.store.topics().list_by_parent(folder_id).await?;
        sort_ordered(&mut topics);
        let ids: Vec<TopicId> = topics.iter().map(|t| t.id).collect();
        let changed = self.write_order(&topics, &ids).await?;
        debug!(folder_id = %folder_id, changed, "Topic order compacted");
        Ok(changed)
    }

    async fn write_order(&self, topics: &[Topic], ordered_ids: &[TopicId]) -> AppResult<usize> {
        let mut changed = 0;
        for (position, id) in ordered_ids.iter().enumerate() {
            let Some(topic) = topics.iter().find(|t| t.id == *id) else {
                continue;
            };
            let order = Some(position as i64);
            if topic.order != order {
                let mut topic = topic.clone();
                topic.order = order;
                self.store.topics().update(&topic).await?;
                changed += 1;
            }
        }
        Ok(changed)
    }
}
