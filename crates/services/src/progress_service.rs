use std::sync::Arc;

use course_core::exam_session::{ExamError, ExamSession};
use course_core::model::{
    ContentSource, CourseCatalog, CourseEvent, ExamId, ItemContent, ItemKey, PlayVideo,
    ProgressState,
};
use course_core::progression::{self, ItemCounts, ItemStatus};
use tokio::sync::Mutex;

use crate::event_bus::{EventBus, EventListener};
use crate::exams::ExamHandle;
use crate::progress_store::ProgressStore;

/// What opening a catalog item led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemAction {
    /// Item is locked; nothing happened.
    Locked,
    /// No item at that position.
    Missing,
    /// A `PlayVideo` event was published for the playback surface.
    PlayVideo,
    /// Document opened and counted as completed.
    Document {
        source: ContentSource,
        state: ProgressState,
    },
    /// The host should open the exam through `ExamService`.
    OpenExam { exam_id: ExamId },
}

/// Stateful facade over the progression rules.
///
/// Holds the catalog and the current progress, applies completions and
/// persists after each change. All derived values (lock status, counts,
/// percentage) are recomputed from the current state on every call.
pub struct ProgressService {
    catalog: Arc<CourseCatalog>,
    store: ProgressStore,
    bus: EventBus,
    state: Mutex<ProgressState>,
}

impl ProgressService {
    #[must_use]
    pub fn new(catalog: Arc<CourseCatalog>, store: ProgressStore, bus: EventBus) -> Self {
        Self {
            catalog,
            store,
            bus,
            state: Mutex::new(ProgressState::new()),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    /// Load persisted progress, reconcile the cascade and write it back.
    pub async fn initialize(&self) -> ProgressState {
        let loaded = self.store.load().await;
        let mut next = progression::reconcile(&self.catalog, &loaded);
        next.ensure_bootstrap();
        self.store.save(&next).await;

        let mut guard = self.state.lock().await;
        *guard = next.clone();
        log::debug!(
            "progress initialized: {} entries, {}% unlocked",
            next.len(),
            progression::percentage(&self.catalog, &next)
        );
        next
    }

    pub async fn snapshot(&self) -> ProgressState {
        self.state.lock().await.clone()
    }

    pub async fn is_locked(&self, key: ItemKey) -> bool {
        progression::is_locked(&self.catalog, key, &*self.state.lock().await)
    }

    pub async fn status(&self, key: ItemKey) -> ItemStatus {
        progression::status(&self.catalog, key, &*self.state.lock().await)
    }

    pub async fn counts(&self) -> ItemCounts {
        progression::counts(&self.catalog, &*self.state.lock().await)
    }

    pub async fn percentage(&self) -> u8 {
        self.counts().await.percentage()
    }

    /// Record completion of `key` and persist the result.
    ///
    /// Re-completing an item is a no-op. Keys outside the catalog are ignored.
    pub async fn complete_item(&self, key: ItemKey) -> ProgressState {
        let mut guard = self.state.lock().await;
        if !self.catalog.contains(key) {
            log::warn!("ignoring completion of {key}: not in the catalog");
            return guard.clone();
        }

        let mut next = progression::complete_item(&self.catalog, key, &guard);
        next.ensure_bootstrap();
        if next == *guard {
            return next;
        }

        *guard = next.clone();
        self.store.save(&next).await;
        log::debug!("completed {key}");
        next
    }

    /// React to the learner selecting an item.
    pub async fn open_item(&self, key: ItemKey) -> ItemAction {
        let Some(item) = self.catalog.item(key) else {
            return ItemAction::Missing;
        };
        if self.is_locked(key).await {
            return ItemAction::Locked;
        }

        match &item.content {
            ItemContent::Video { source, thumbnail } => {
                let event = CourseEvent::PlayVideo(PlayVideo {
                    source: source.clone(),
                    title: item.title.clone(),
                    key,
                    thumbnail: thumbnail.clone(),
                });
                self.bus.publish(&event);
                ItemAction::PlayVideo
            }
            ItemContent::Document { source } => {
                let state = self.complete_item(key).await;
                ItemAction::Document {
                    source: source.clone(),
                    state,
                }
            }
            ItemContent::Exam { exam_id, .. } => ItemAction::OpenExam {
                exam_id: exam_id.clone(),
            },
        }
    }

    /// Acknowledge a passed exam and complete its item.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotPassed` unless the attempt holds a passing result.
    pub async fn finish_exam(&self, exam: &ExamHandle) -> Result<ProgressState, ExamError> {
        let result = exam.with_session(ExamSession::continue_after_pass)?;
        log::info!("exam {} passed with score {}", exam.exam_id(), result.score);
        Ok(self.complete_item(exam.key()).await)
    }

    /// Apply `VideoComplete` events from the bus until the listener is dropped.
    #[must_use]
    pub fn listen(self: &Arc<Self>) -> EventListener {
        let mut subscription = self.bus.subscribe();
        let service = Arc::clone(self);
        EventListener::new(tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                if let CourseEvent::VideoComplete(done) = event {
                    service.complete_item(done.key).await;
                }
            }
        }))
    }
}
