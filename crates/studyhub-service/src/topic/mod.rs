//! Topic management.

pub mod service;

pub use service::{CreateTopicRequest, TopicService, UpdateTopicRequest};
