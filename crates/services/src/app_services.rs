use std::fmt;
use std::sync::Arc;

use course_core::model::{CourseCatalog, ExamCatalog, ExamId, ItemContent, ItemKey};
use storage::repository::Storage;

use crate::config::ServicesConfig;
use crate::error::AppServicesError;
use crate::event_bus::EventBus;
use crate::exams::ExamService;
use crate::progress_service::ProgressService;
use crate::progress_store::ProgressStore;

/// Parse the course catalog and exam datasets.
///
/// Exam items that point at a missing exam, or whose listed question count or
/// duration disagrees with the exam dataset, are logged; the dataset wins.
///
/// # Errors
///
/// Returns `AppServicesError::Catalog` if either dataset is malformed.
pub fn load_content(
    catalog_json: &str,
    exams_json: &str,
) -> Result<(CourseCatalog, ExamCatalog), AppServicesError> {
    let catalog = CourseCatalog::from_json(catalog_json)?;
    let exams = ExamCatalog::from_json(exams_json)?;
    for mismatch in exam_mismatches(&catalog, &exams) {
        log::warn!("{mismatch}");
    }
    Ok((catalog, exams))
}

/// Disagreement between a catalog exam item and the exam dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ExamMismatch {
    Unknown {
        key: ItemKey,
        exam_id: ExamId,
    },
    QuestionCount {
        key: ItemKey,
        listed: u32,
        actual: usize,
    },
    Duration {
        key: ItemKey,
        listed: u32,
        actual: u32,
    },
}

impl fmt::Display for ExamMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamMismatch::Unknown { key, exam_id } => {
                write!(f, "catalog item {key} references unknown exam {exam_id}")
            }
            ExamMismatch::QuestionCount {
                key,
                listed,
                actual,
            } => write!(
                f,
                "catalog item {key} lists {listed} questions, exam has {actual}"
            ),
            ExamMismatch::Duration {
                key,
                listed,
                actual,
            } => write!(
                f,
                "catalog item {key} lists {listed} minutes, exam allows {actual}"
            ),
        }
    }
}

/// A listed value of `0` means the catalog left it unspecified.
fn exam_mismatches(catalog: &CourseCatalog, exams: &ExamCatalog) -> Vec<ExamMismatch> {
    let mut found = Vec::new();
    for key in catalog.keys() {
        let Some(ItemContent::Exam {
            exam_id,
            question_count,
            duration_minutes,
        }) = catalog.item(key).map(|item| &item.content)
        else {
            continue;
        };
        let Some(exam) = exams.get(exam_id) else {
            found.push(ExamMismatch::Unknown {
                key,
                exam_id: exam_id.clone(),
            });
            continue;
        };
        let listed_count = usize::try_from(*question_count).unwrap_or(usize::MAX);
        if *question_count != 0 && listed_count != exam.question_count() {
            found.push(ExamMismatch::QuestionCount {
                key,
                listed: *question_count,
                actual: exam.question_count(),
            });
        }
        if *duration_minutes != 0 && *duration_minutes != exam.duration_minutes {
            found.push(ExamMismatch::Duration {
                key,
                listed: *duration_minutes,
                actual: exam.duration_minutes,
            });
        }
    }
    found
}

/// Assembles app-facing services around one progress store and event bus.
#[derive(Clone)]
pub struct AppServices {
    bus: EventBus,
    progress: Arc<ProgressService>,
    exams: Arc<ExamService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and load persisted progress.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        config: &ServicesConfig,
        catalog: CourseCatalog,
        exams: ExamCatalog,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.database_url).await?;
        Ok(Self::assemble(storage, config, catalog, exams).await)
    }

    /// Build services over an in-memory store.
    pub async fn in_memory(
        config: &ServicesConfig,
        catalog: CourseCatalog,
        exams: ExamCatalog,
    ) -> Self {
        Self::assemble(Storage::in_memory(), config, catalog, exams).await
    }

    async fn assemble(
        storage: Storage,
        config: &ServicesConfig,
        catalog: CourseCatalog,
        exams: ExamCatalog,
    ) -> Self {
        let bus = EventBus::new();
        let store = ProgressStore::new(Arc::clone(&storage.kv)).with_key(&config.progress_key);
        let progress = Arc::new(ProgressService::new(Arc::new(catalog), store, bus.clone()));
        progress.initialize().await;

        let exams =
            Arc::new(ExamService::new(Arc::new(exams)).with_tick_period(config.tick_period));

        Self {
            bus,
            progress,
            exams,
        }
    }

    #[must_use]
    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn exams(&self) -> Arc<ExamService> {
        Arc::clone(&self.exams)
    }
}
