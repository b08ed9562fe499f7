//! The view-state machine.

use parking_lot::RwLock;
use tracing::{debug, info};

use studyhub_cache::CacheSnapshot;
use studyhub_core::result::AppResult;
use studyhub_core::types::{FileId, FolderId, LessonId, TopicId};

use crate::navigation::{Navigation, StateChange};
use crate::subscription::{ListenerRegistry, Subscription};

/// Outcome of checking the state against a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revalidation {
    /// Everything still resolves.
    Unchanged,
    /// The previewed file is gone; the lesson view stays.
    PreviewCleared { file_id: FileId },
    /// The selection (or one of its ancestors) is gone.
    FellBack { from: Navigation },
    /// A selection moved in the hierarchy and its ancestors were updated.
    Reparented { from: Navigation },
}

impl Revalidation {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// Owns the single [`Navigation`] value and its subscribers.
///
/// Every transition replaces the whole value and then notifies once.
/// The state lock is released before listeners run, so a listener may
/// read the state or unsubscribe itself.
#[derive(Debug, Default)]
pub struct ViewStateMachine {
    state: RwLock<Navigation>,
    listeners: ListenerRegistry,
}

impl ViewStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> Navigation {
        self.state.read().clone()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Navigation) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Notify every listener with the current state.
    pub fn notify(&self) -> usize {
        let state = self.state();
        self.listeners.notify(&state)
    }

    /// Apply a single-field change and notify.
    ///
    /// On error the state is left as it was and nobody is notified.
    pub fn set(&self, change: StateChange, snapshot: &CacheSnapshot) -> AppResult<Navigation> {
        let next = self.state().apply(change, snapshot)?;
        self.replace(next.clone());
        Ok(next)
    }

    pub fn navigate_dashboard(&self) -> Navigation {
        self.replace(Navigation::Dashboard);
        Navigation::Dashboard
    }

    pub fn navigate_folder(
        &self,
        folder_id: FolderId,
        snapshot: &CacheSnapshot,
    ) -> AppResult<Navigation> {
        let next = Navigation::folder(snapshot, folder_id)?;
        self.replace(next.clone());
        Ok(next)
    }

    pub fn navigate_topic(
        &self,
        topic_id: TopicId,
        snapshot: &CacheSnapshot,
    ) -> AppResult<Navigation> {
        let next = Navigation::topic(snapshot, topic_id)?;
        self.replace(next.clone());
        Ok(next)
    }

    pub fn navigate_lesson(
        &self,
        lesson_id: LessonId,
        snapshot: &CacheSnapshot,
    ) -> AppResult<Navigation> {
        let next = Navigation::lesson(snapshot, lesson_id)?;
        self.replace(next.clone());
        Ok(next)
    }

    pub fn search(&self, query: &str) -> Navigation {
        let next = Navigation::search(query);
        self.replace(next.clone());
        next
    }

    /// Replace the whole state and notify once.
    pub fn replace(&self, next: Navigation) {
        let previous = std::mem::replace(&mut *self.state.write(), next.clone());
        if previous != next {
            info!(from = %previous, to = %next, "Navigation changed");
        }
        self.listeners.notify(&next);
    }

    /// Drop selections that no longer resolve in `snapshot`.
    ///
    /// Does not notify; the caller follows up with [`notify`](Self::notify)
    /// as part of its reload sequence.
    pub fn revalidate(&self, snapshot: &CacheSnapshot) -> Revalidation {
        let mut state = self.state.write();
        let current = state.clone();
        let (next, outcome) = revalidated(&current, snapshot);
        if !outcome.is_unchanged() {
            debug!(from = %current, to = %next, outcome = ?outcome, "State revalidated");
            *state = next;
        }
        outcome
    }
}

fn revalidated(current: &Navigation, snapshot: &CacheSnapshot) -> (Navigation, Revalidation) {
    let fell_back = || {
        (
            Navigation::Dashboard,
            Revalidation::FellBack {
                from: current.clone(),
            },
        )
    };

    match current {
        Navigation::Dashboard | Navigation::Search { .. } => {
            (current.clone(), Revalidation::Unchanged)
        }
        Navigation::Folder { folder_id } => match snapshot.folder(*folder_id) {
            Some(_) => (current.clone(), Revalidation::Unchanged),
            None => fell_back(),
        },
        Navigation::Topic {
            folder_id,
            topic_id,
        } => match snapshot.topic(*topic_id) {
            Some(topic) if topic.folder_id == *folder_id => {
                (current.clone(), Revalidation::Unchanged)
            }
            Some(topic) => (
                Navigation::Topic {
                    folder_id: topic.folder_id,
                    topic_id: *topic_id,
                },
                Revalidation::Reparented {
                    from: current.clone(),
                },
            ),
            None => fell_back(),
        },
        Navigation::Lesson {
            folder_id,
            topic_id,
            lesson_id,
            preview_file_id,
        } => {
            let Some((folder, topic, _)) = snapshot.lesson_ancestry(*lesson_id) else {
                return fell_back();
            };
            let preview_alive = preview_file_id.is_none_or(|file_id| {
                snapshot
                    .file(file_id)
                    .is_some_and(|f| f.lesson_id == *lesson_id)
            });
            let next = Navigation::Lesson {
                folder_id: folder.id,
                topic_id: topic.id,
                lesson_id: *lesson_id,
                preview_file_id: if preview_alive { *preview_file_id } else { None },
            };
            if folder.id != *folder_id || topic.id != *topic_id {
                return (
                    next,
                    Revalidation::Reparented {
                        from: current.clone(),
                    },
                );
            }
            match preview_file_id {
                Some(file_id) if !preview_alive => (
                    next,
                    Revalidation::PreviewCleared { file_id: *file_id },
                ),
                _ => (current.clone(), Revalidation::Unchanged),
            }
        }
    }
}
