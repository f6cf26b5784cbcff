use std::time::Duration;

use course_core::exam_session::{ExamResult, TickOutcome};
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

use super::service::ExamHandle;

/// Countdown driving an exam session.
///
/// Ticks once per period while the session is active. The task ends by itself
/// after an automatic submission or once the session stops being active, and
/// is aborted when the timer is dropped or cancelled.
pub struct ExamTimer {
    handle: JoinHandle<()>,
}

impl ExamTimer {
    pub(crate) fn start<F>(exam: ExamHandle, period: Duration, on_expire: F) -> Self
    where
        F: FnOnce(ExamResult) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                match exam.with_session(|s| s.tick()) {
                    TickOutcome::Running { .. } => {}
                    TickOutcome::Expired(result) => {
                        log::info!(
                            "exam {} timed out with score {}",
                            exam.exam_id(),
                            result.score
                        );
                        on_expire(result);
                        break;
                    }
                    TickOutcome::Idle => break,
                }
            }
        });
        Self { handle }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for ExamTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
