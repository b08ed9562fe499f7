//! Core traits defined in `studyhub-core` and implemented by other crates.

pub mod repository;
pub mod storage;

pub use repository::{ChildRepository, Repository};
pub use storage::{PayloadReader, RawUpload};
