//! Topic domain entities.

pub mod model;

pub use model::{CreateTopic, Topic};
