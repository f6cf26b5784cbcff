use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use course_core::exam_session::{ExamError, ExamResult, ExamSession};
use course_core::model::{ExamCatalog, ExamId, ItemKey};

use super::timer::ExamTimer;

/// Shared handle to an exam attempt opened for a catalog item.
///
/// Cloning shares the same session. Hand a handle back to
/// [`ExamService::open`] to resume an attempt after the exam view was closed.
#[derive(Clone)]
pub struct ExamHandle {
    key: ItemKey,
    session: Arc<Mutex<ExamSession>>,
}

impl ExamHandle {
    fn new(key: ItemKey, session: ExamSession) -> Self {
        Self {
            key,
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Catalog position of the exam item.
    #[must_use]
    pub fn key(&self) -> ItemKey {
        self.key
    }

    #[must_use]
    pub fn exam_id(&self) -> ExamId {
        self.with_session(|s| s.exam_id().clone())
    }

    /// Run `f` against the session under its lock.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut ExamSession) -> R) -> R {
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Copy of the current session state, for rendering.
    #[must_use]
    pub fn snapshot(&self) -> ExamSession {
        self.with_session(|s| s.clone())
    }

    /// # Errors
    ///
    /// See [`ExamSession::go_to_question`].
    pub fn go_to_question(&self, index: usize) -> Result<(), ExamError> {
        self.with_session(|s| s.go_to_question(index))
    }

    /// # Errors
    ///
    /// See [`ExamSession::select_answer`].
    pub fn select_answer(&self, option: usize) -> Result<(), ExamError> {
        self.with_session(|s| s.select_answer(option))
    }

    /// # Errors
    ///
    /// See [`ExamSession::submit`].
    pub fn submit(&self) -> Result<ExamResult, ExamError> {
        self.with_session(ExamSession::submit)
    }

    /// # Errors
    ///
    /// See [`ExamSession::retry`].
    pub fn retry(&self) -> Result<(), ExamError> {
        self.with_session(ExamSession::retry)
    }

    fn is_resumable_for(&self, key: ItemKey, exam_id: &ExamId) -> bool {
        self.key == key && self.with_session(|s| s.exam_id() == exam_id && !s.has_passed())
    }
}

/// Opens exam attempts against the exam content dataset.
#[derive(Clone)]
pub struct ExamService {
    exams: Arc<ExamCatalog>,
    tick_period: Duration,
}

impl ExamService {
    #[must_use]
    pub fn new(exams: Arc<ExamCatalog>) -> Self {
        Self {
            exams,
            tick_period: Duration::from_secs(1),
        }
    }

    #[must_use]
    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    #[must_use]
    pub fn exams(&self) -> &ExamCatalog {
        &self.exams
    }

    /// Open `exam_id` for the item at `key`.
    ///
    /// A `resume` handle for the same item and exam that has not passed is
    /// returned as is; otherwise a fresh attempt starts.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotFound` for an unknown exam id. No session is
    /// created in that case.
    pub fn open(
        &self,
        key: ItemKey,
        exam_id: &ExamId,
        resume: Option<ExamHandle>,
    ) -> Result<ExamHandle, ExamError> {
        let Some(exam) = self.exams.get(exam_id) else {
            log::warn!("exam {exam_id} requested for {key} does not exist");
            return Err(ExamError::NotFound(exam_id.clone()));
        };

        if let Some(handle) = resume.filter(|h| h.is_resumable_for(key, exam_id)) {
            return Ok(handle);
        }

        Ok(ExamHandle::new(key, ExamSession::new(Arc::new(exam.clone()))))
    }

    /// Start the countdown for `handle`. `on_expire` runs once if time runs out.
    pub fn start_timer<F>(&self, handle: &ExamHandle, on_expire: F) -> ExamTimer
    where
        F: FnOnce(ExamResult) + Send + 'static,
    {
        ExamTimer::start(handle.clone(), self.tick_period, on_expire)
    }
}
