//! The StudyHub controller.
//!
//! Every mutation runs the same sequence: store operation, full cache
//! reload, state revalidation, release of stale content handles, one
//! notification, and one subscriber broadcast. A failed step pushes a
//! single error notification and leaves state and cache as they were.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use studyhub_cache::{AggregateCache, CacheSnapshot};
use studyhub_core::config::AppConfig;
use studyhub_core::result::AppResult;
use studyhub_core::traits::PayloadReader;
use studyhub_core::types::{FileId, FolderId, LessonId, LinkId, TopicId};
use studyhub_database::{CascadeReport, StudyStore};
use studyhub_entity::file::File;
use studyhub_entity::folder::Folder;
use studyhub_entity::lesson::{Lesson, LessonLink};
use studyhub_entity::topic::Topic;
use studyhub_view::{
    Navigation, NotificationCenter, Revalidation, StateChange, Subscription, View,
    ViewStateMachine, derive_view,
};

use crate::file::download::export_handle;
use crate::file::{
    BatchUploadReport, ContentHandle, ContentHandleRegistry, FileService, HandlePurpose,
    LocalPayloadReader, RenameFileRequest, UploadFileRequest, UploadService,
};
use crate::folder::{CreateFolderRequest, FolderService, UpdateFolderRequest};
use crate::lesson::{AddLinkRequest, CreateLessonRequest, LessonService, UpdateLessonRequest};
use crate::topic::{CreateTopicRequest, TopicService, UpdateTopicRequest};

/// Application controller tying the store, cache, view state, content
/// handles, and notifications together.
pub struct StudyHub {
    config: AppConfig,
    cache: AggregateCache,
    machine: ViewStateMachine,
    notifications: NotificationCenter,
    handles: ContentHandleRegistry,
    reader: Arc<dyn PayloadReader>,
    folders: FolderService,
    topics: TopicService,
    lessons: LessonService,
    files: FileService,
    uploads: UploadService,
}

impl std::fmt::Debug for StudyHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudyHub")
            .field("state", &self.machine.state())
            .field("generation", &self.cache.snapshot().generation())
            .finish()
    }
}

impl StudyHub {
    /// Open the configured store and load the first snapshot.
    pub async fn open(config: AppConfig) -> AppResult<Self> {
        let store = StudyStore::open(&config.database).await?;
        Self::with_store(config, store).await
    }

    /// Build the controller over an already opened store.
    pub async fn with_store(config: AppConfig, store: StudyStore) -> AppResult<Self> {
        let reader = Arc::new(LocalPayloadReader::new(config.ingest.max_upload_size_bytes));
        let hub = Self {
            cache: AggregateCache::new(store.clone()),
            machine: ViewStateMachine::new(),
            notifications: NotificationCenter::new(&config.notifications),
            handles: ContentHandleRegistry::new(),
            reader,
            folders: FolderService::new(store.clone()),
            topics: TopicService::new(store.clone()),
            lessons: LessonService::new(store.clone()),
            files: FileService::new(store.clone()),
            uploads: UploadService::new(store, config.ingest.clone()),
            config,
        };
        hub.cache.reload().await?;

        let upgrade = hub.store().upgrade_report();
        if !upgrade.is_noop() {
            hub.notifications.info("Stored data was upgraded to the current layout");
        }
        info!(
            generation = hub.cache.snapshot().generation(),
            "StudyHub ready"
        );
        Ok(hub)
    }

    /// Replace the reader used by [`upload_path`](Self::upload_path).
    pub fn with_payload_reader(mut self, reader: Arc<dyn PayloadReader>) -> Self {
        self.reader = reader;
        self
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &StudyStore {
        self.cache.store()
    }

    pub fn state(&self) -> Navigation {
        self.machine.state()
    }

    pub fn snapshot(&self) -> Arc<CacheSnapshot> {
        self.cache.snapshot()
    }

    /// The view model for the current state.
    pub fn current_view(&self) -> View {
        derive_view(&self.machine.state(), &self.cache.snapshot())
    }

    pub fn active_handle(&self) -> Option<Arc<ContentHandle>> {
        self.handles.active()
    }

    pub fn handles(&self) -> &ContentHandleRegistry {
        &self.handles
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Register a listener called with the state after every transition.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Navigation) + Send + Sync + 'static,
    {
        self.machine.subscribe(listener)
    }

    // ── Navigation ─────────────────────────────────────────────────

    pub fn navigate_dashboard(&self) -> Navigation {
        self.go(Navigation::Dashboard);
        Navigation::Dashboard
    }

    pub fn navigate_folder(&self, folder_id: FolderId) -> AppResult<Navigation> {
        let next = self.report(Navigation::folder(&self.cache.snapshot(), folder_id))?;
        self.go(next.clone());
        Ok(next)
    }

    pub fn navigate_topic(&self, topic_id: TopicId) -> AppResult<Navigation> {
        let next = self.report(Navigation::topic(&self.cache.snapshot(), topic_id))?;
        self.go(next.clone());
        Ok(next)
    }

    pub fn navigate_lesson(&self, lesson_id: LessonId) -> AppResult<Navigation> {
        let next = self.report(Navigation::lesson(&self.cache.snapshot(), lesson_id))?;
        self.go(next.clone());
        Ok(next)
    }

    /// Show search results; a blank query returns to the dashboard.
    pub fn search(&self, query: &str) -> Navigation {
        let next = Navigation::search(query);
        self.go(next.clone());
        next
    }

    /// Step one level up the hierarchy.
    pub fn navigate_up(&self) -> Navigation {
        let next = self.machine.state().parent();
        self.go(next.clone());
        next
    }

    /// Apply a single-field change with the usual precedence.
    ///
    /// Opening a preview this way also acquires its content handle.
    pub async fn set(&self, change: StateChange) -> AppResult<Navigation> {
        if let StateChange::Preview(Some(file_id)) = change {
            self.preview_file(file_id).await?;
            return Ok(self.machine.state());
        }
        let next = self.report(self.machine.state().apply(change, &self.cache.snapshot()))?;
        self.go(next.clone());
        Ok(next)
    }

    /// Preview a file of the lesson currently shown.
    pub async fn preview_file(&self, file_id: FileId) -> AppResult<Arc<ContentHandle>> {
        let result = async {
            let next = self
                .machine
                .state()
                .apply(StateChange::Preview(Some(file_id)), &self.cache.snapshot())?;
            let (file, data) = self.files.read_content(file_id).await?;
            AppResult::Ok((next, file, data))
        }
        .await;
        let (next, file, data) = self.report(result)?;

        let handle = self.handles.acquire(&file, data, HandlePurpose::Preview);
        self.machine.replace(next);
        Ok(handle)
    }

    /// Close the preview and release its handle.
    pub fn close_preview(&self) {
        let state = self.machine.state();
        if let Some(file_id) = state.preview_file_id() {
            self.handles.release_for_file(file_id);
        }
        self.machine.replace(state.without_preview());
    }

    // ── Folders ────────────────────────────────────────────────────

    pub async fn create_folder(&self, req: CreateFolderRequest) -> AppResult<Folder> {
        let result = self.folders.create_folder(req).await;
        self.commit(result, |f| format!("Folder '{}' created", f.name))
            .await
    }

    pub async fn update_folder(
        &self,
        folder_id: FolderId,
        req: UpdateFolderRequest,
    ) -> AppResult<Folder> {
        let result = self.folders.update_folder(folder_id, req).await;
        self.commit(result, |f| format!("Folder '{}' saved", f.name))
            .await
    }

    pub async fn delete_folder(&self, folder_id: FolderId) -> AppResult<CascadeReport> {
        let result = self.folders.delete_folder(folder_id).await;
        self.commit(result, |r| deleted_message("Folder", r)).await
    }

    pub async fn reorder_folders(&self, ordered_ids: &[FolderId]) -> AppResult<usize> {
        let result = self.folders.reorder_folders(ordered_ids).await;
        self.commit(result, |_| "Folders reordered".to_string())
            .await
    }

    // ── Topics ─────────────────────────────────────────────────────

    pub async fn create_topic(&self, req: CreateTopicRequest) -> AppResult<Topic> {
        let result = self.topics.create_topic(req).await;
        self.commit(result, |t| format!("Topic '{}' created", t.name))
            .await
    }

    pub async fn update_topic(
        &self,
        topic_id: TopicId,
        req: UpdateTopicRequest,
    ) -> AppResult<Topic> {
        let result = self.topics.update_topic(topic_id, req).await;
        self.commit(result, |t| format!("Topic '{}' saved", t.name))
            .await
    }

    pub async fn delete_topic(&self, topic_id: TopicId) -> AppResult<CascadeReport> {
        let result = self.topics.delete_topic(topic_id).await;
        self.commit(result, |r| deleted_message("Topic", r)).await
    }

    pub async fn reorder_topics(
        &self,
        folder_id: FolderId,
        ordered_ids: &[TopicId],
    ) -> AppResult<usize> {
        let result = self.topics.reorder_topics(folder_id, ordered_ids).await;
        self.commit(result, |_| "Topics reordered".to_string())
            .await
    }

    // ── Lessons ────────────────────────────────────────────────────

    pub async fn create_lesson(&self, req: CreateLessonRequest) -> AppResult<Lesson> {
        let result = self.lessons.create_lesson(req).await;
        self.commit(result, |l| format!("Lesson '{}' created", l.title))
            .await
    }

    pub async fn update_lesson(
        &self,
        lesson_id: LessonId,
        req: UpdateLessonRequest,
    ) -> AppResult<Lesson> {
        let result = self.lessons.update_lesson(lesson_id, req).await;
        self.commit(result, |l| format!("Lesson '{}' saved", l.title))
            .await
    }

    pub async fn delete_lesson(&self, lesson_id: LessonId) -> AppResult<CascadeReport> {
        let result = self.lessons.delete_lesson(lesson_id).await;
        self.commit(result, |r| deleted_message("Lesson", r)).await
    }

    pub async fn reorder_lessons(
        &self,
        topic_id: TopicId,
        ordered_ids: &[LessonId],
    ) -> AppResult<usize> {
        let result = self.lessons.reorder_lessons(topic_id, ordered_ids).await;
        self.commit(result, |_| "Lessons reordered".to_string())
            .await
    }

    pub async fn add_link(&self, lesson_id: LessonId, req: AddLinkRequest) -> AppResult<LessonLink> {
        let result = self.lessons.add_link(lesson_id, req).await;
        self.commit(result, |l| format!("Link '{}' added", l.title))
            .await
    }

    /// Remove a link. `false` when the lesson or link was already gone.
    pub async fn remove_link(&self, lesson_id: LessonId, link_id: LinkId) -> AppResult<bool> {
        let result = self.lessons.remove_link(lesson_id, link_id).await;
        self.commit(result, |removed| {
            if *removed {
                "Link removed".to_string()
            } else {
                "Link was already gone".to_string()
            }
        })
        .await
    }

    // ── Files ──────────────────────────────────────────────────────

    /// Upload one file from memory.
    pub async fn upload_file(
        &self,
        lesson_id: LessonId,
        data: Bytes,
        name: &str,
        mime_type: &str,
    ) -> AppResult<File> {
        let result = self
            .uploads
            .upload(UploadFileRequest {
                lesson_id,
                name: name.to_string(),
                mime_type: mime_type.to_string(),
                data,
            })
            .await;
        self.commit(result, |f| format!("Uploaded '{}'", f.name))
            .await
    }

    /// Upload a local file through the payload reader.
    pub async fn upload_path(&self, lesson_id: LessonId, path: &Path) -> AppResult<File> {
        let result = async {
            let raw = self.reader.read(path).await?;
            self.uploads
                .upload(UploadFileRequest::from_raw(lesson_id, raw))
                .await
        }
        .await;
        self.commit(result, |f| format!("Uploaded '{}'", f.name))
            .await
    }

    /// Upload several files. Each rejected file gets its own error
    /// notification; the others are stored and the cache reloads once.
    pub async fn upload_files(&self, batch: Vec<UploadFileRequest>) -> AppResult<BatchUploadReport> {
        let report = self.report(self.uploads.upload_batch(batch).await)?;
        for rejected in &report.rejected {
            warn!(name = %rejected.name, kind = %rejected.kind, "Batch upload entry rejected");
            self.notifications
                .error(format!("{}: {}", rejected.name, rejected.message));
        }

        self.report(self.refresh().await)?;
        if !report.uploaded.is_empty() {
            self.notifications
                .success(format!("Uploaded {} file(s)", report.uploaded.len()));
        }
        self.machine.notify();
        Ok(report)
    }

    pub async fn rename_file(&self, file_id: FileId, req: RenameFileRequest) -> AppResult<File> {
        let result = self.files.rename_file(file_id, req).await;
        self.commit(result, |f| format!("File renamed to '{}'", f.name))
            .await
    }

    pub async fn delete_file(&self, file_id: FileId) -> AppResult<CascadeReport> {
        let result = self.files.delete_file(file_id).await;
        self.commit(result, |r| deleted_message("File", r)).await
    }

    /// Save a file's content into `dest_dir`.
    ///
    /// A preview of a different file is closed first. The preview handle
    /// of the same file is reused and stays open afterwards.
    pub async fn download_file(&self, file_id: FileId, dest_dir: &Path) -> AppResult<PathBuf> {
        if let Some(previewed) = self.machine.state().preview_file_id() {
            if previewed != file_id {
                self.close_preview();
            }
        }

        let handle = match self.handles.active() {
            Some(handle) if handle.file_id == file_id => handle,
            _ => {
                let (file, data) = self.report(self.files.read_content(file_id).await)?;
                self.handles.acquire(&file, data, HandlePurpose::Download)
            }
        };

        let result = export_handle(&handle, dest_dir).await;
        if handle.purpose == HandlePurpose::Download {
            self.handles.release_for_file(file_id);
        }
        let path = self.report(result)?;
        self.notifications
            .success(format!("Saved '{}' to {}", handle.file_name, path.display()));
        Ok(path)
    }

    // ── Maintenance ────────────────────────────────────────────────

    /// Delete records whose parent no longer exists.
    pub async fn purge_orphans(&self) -> AppResult<CascadeReport> {
        let result = self.store().cascade().purge_orphans().await;
        self.commit(result, |r| {
            if r.is_empty() {
                "No orphaned records found".to_string()
            } else {
                format!("Removed {} orphaned record(s)", r.total())
            }
        })
        .await
    }

    /// Reload from the store and broadcast the (possibly corrected) state.
    pub async fn reload(&self) -> AppResult<Revalidation> {
        let outcome = self.report(self.refresh().await)?;
        self.machine.notify();
        Ok(outcome)
    }

    // ── Internals ──────────────────────────────────────────────────

    /// Finish a mutation: refresh, notify the user, then broadcast.
    async fn commit<T>(
        &self,
        result: AppResult<T>,
        describe: impl FnOnce(&T) -> String,
    ) -> AppResult<T> {
        let value = self.report(result)?;
        self.report(self.refresh().await)?;
        self.notifications.success(describe(&value));
        self.machine.notify();
        Ok(value)
    }

    /// Reload the cache, correct the state, and drop handles it no longer
    /// backs. Does not broadcast.
    async fn refresh(&self) -> AppResult<Revalidation> {
        let snapshot = self.cache.reload().await?;
        let outcome = self.machine.revalidate(&snapshot);
        if !outcome.is_unchanged() {
            debug!(outcome = ?outcome, "State corrected after reload");
        }
        self.release_stale_handles(&snapshot);
        Ok(outcome)
    }

    fn release_stale_handles(&self, snapshot: &CacheSnapshot) {
        let Some(handle) = self.handles.active() else {
            return;
        };
        let previewed = self.machine.state().preview_file_id();
        if snapshot.file(handle.file_id).is_none() || previewed != Some(handle.file_id) {
            self.handles.release_for_file(handle.file_id);
        }
    }

    /// Switch state, releasing a handle the new state does not show.
    fn go(&self, next: Navigation) {
        if let Some(handle) = self.handles.active() {
            if next.preview_file_id() != Some(handle.file_id) {
                self.handles.release_for_file(handle.file_id);
            }
        }
        self.machine.replace(next);
    }

    /// Push one error notification for a failed step.
    fn report<T>(&self, result: AppResult<T>) -> AppResult<T> {
        result.map_err(|e| {
            warn!(kind = %e.kind, error = %e.message, "Operation failed");
            self.notifications.error(e.message.clone());
            e
        })
    }
}

fn deleted_message(label: &str, report: &CascadeReport) -> String {
    if report.is_empty() {
        format!("{label} was already gone")
    } else {
        format!("{label} deleted ({} record(s) removed)", report.total())
    }
}
