//! Lifecycle of in-memory handles over file payloads.
//!
//! A handle stands in for a short-lived object URL: it pins the payload
//! bytes while a preview is shown or a download is written. At most one
//! handle is active at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use studyhub_core::types::{FileId, HandleId};
use studyhub_entity::file::File;

/// What a handle was acquired for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlePurpose {
    Preview,
    Download,
}

/// An addressable view of one file's bytes.
#[derive(Debug, Clone, Serialize)]
pub struct ContentHandle {
    pub id: HandleId,
    pub file_id: FileId,
    pub file_name: String,
    pub mime_type: String,
    pub purpose: HandlePurpose,
    #[serde(skip)]
    pub data: Bytes,
    pub created_at: DateTime<Utc>,
}

impl ContentHandle {
    /// Opaque URI identifying this handle.
    pub fn uri(&self) -> String {
        format!("blob:studyhub/{}", self.id)
    }

    /// The payload inlined as a `data:` URL.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Holds the single active [`ContentHandle`] and counts issue/release.
#[derive(Debug, Default)]
pub struct ContentHandleRegistry {
    active: Mutex<Option<Arc<ContentHandle>>>,
    issued: AtomicU64,
    released: AtomicU64,
}

impl ContentHandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a handle for `file`.
    ///
    /// Returns the active handle when it already covers the same file;
    /// otherwise the active handle is released and a new one issued.
    pub fn acquire(&self, file: &File, data: Bytes, purpose: HandlePurpose) -> Arc<ContentHandle> {
        let mut active = self.active.lock();
        if let Some(current) = active.as_ref() {
            if current.file_id == file.id {
                return Arc::clone(current);
            }
        }
        if let Some(previous) = active.take() {
            self.record_release(&previous);
        }

        let handle = Arc::new(ContentHandle {
            id: HandleId::new(),
            file_id: file.id,
            file_name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            purpose,
            data,
            created_at: Utc::now(),
        });
        self.issued.fetch_add(1, Ordering::Relaxed);
        debug!(
            handle_id = %handle.id,
            file_id = %file.id,
            purpose = ?purpose,
            "Content handle issued"
        );
        *active = Some(Arc::clone(&handle));
        handle
    }

    /// Release the active handle if it belongs to `file_id`.
    pub fn release_for_file(&self, file_id: FileId) -> bool {
        let mut active = self.active.lock();
        match active.as_ref() {
            Some(current) if current.file_id == file_id => {
                if let Some(previous) = active.take() {
                    self.record_release(&previous);
                }
                true
            }
            _ => false,
        }
    }

    /// Release whatever handle is active.
    pub fn release_all(&self) -> bool {
        match self.active.lock().take() {
            Some(previous) => {
                self.record_release(&previous);
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> Option<Arc<ContentHandle>> {
        self.active.lock().clone()
    }

    pub fn active_count(&self) -> usize {
        usize::from(self.active.lock().is_some())
    }

    /// Handles issued since creation.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }

    /// Handles released since creation.
    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    fn record_release(&self, handle: &ContentHandle) {
        self.released.fetch_add(1, Ordering::Relaxed);
        debug!(handle_id = %handle.id, file_id = %handle.file_id, "Content handle released");
    }
}
