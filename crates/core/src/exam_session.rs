use std::sync::Arc;
use thiserror::Error;

use crate::model::{Exam, ExamId};

/// Minimum score (percent) that passes an exam.
pub const PASS_THRESHOLD: u8 = 90;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("exam {0} not found")]
    NotFound(ExamId),

    #[error("question {index} is out of range for {count} questions")]
    InvalidQuestion { index: usize, count: usize },

    #[error("already at the first question")]
    NoPreviousQuestion,

    #[error("option {option} is out of range for {count} options")]
    InvalidOption { option: usize, count: usize },

    #[error("exam is not in progress")]
    NotActive,

    #[error("only a failed exam can be retried")]
    NotFailed,

    #[error("only a passed exam can be continued")]
    NotPassed,
}

//
// ─── RESULT & PHASE ────────────────────────────────────────────────────────────
//

/// Outcome of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamResult {
    pub correct: usize,
    pub total: usize,
    pub score: u8,
    pub passed: bool,
    /// Submitted by the timer running out rather than by the learner.
    pub timed_out: bool,
}

impl ExamResult {
    #[must_use]
    pub fn new(correct: usize, total: usize, timed_out: bool) -> Self {
        let score = score(correct, total);
        Self {
            correct,
            total,
            score,
            passed: is_passing(score),
            timed_out,
        }
    }
}

/// `round(100 * correct / total)`, half up; `0` when there are no questions.
#[must_use]
pub fn score(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    u8::try_from((200 * correct + total) / (2 * total)).unwrap_or(100)
}

#[must_use]
pub fn is_passing(score: u8) -> bool {
    score >= PASS_THRESHOLD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamPhase {
    Active,
    Submitted(ExamResult),
    /// A passed exam was acknowledged; the host should record completion.
    Finished,
}

/// What a timer tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining_secs: u32 },
    Expired(ExamResult),
    /// Session is not active; nothing changed.
    Idle,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory attempt at one exam.
///
/// Owned by whoever opened the exam. Answers are `None` until selected;
/// unanswered questions score as wrong.
#[derive(Debug, Clone)]
pub struct ExamSession {
    exam: Arc<Exam>,
    current: usize,
    answers: Vec<Option<usize>>,
    remaining_secs: u32,
    phase: ExamPhase,
}

impl ExamSession {
    #[must_use]
    pub fn new(exam: Arc<Exam>) -> Self {
        let answers = vec![None; exam.question_count()];
        let remaining_secs = exam.duration_secs();
        Self {
            exam,
            current: 0,
            answers,
            remaining_secs,
            phase: ExamPhase::Active,
        }
    }

    #[must_use]
    pub fn exam(&self) -> &Exam {
        &self.exam
    }

    #[must_use]
    pub fn exam_id(&self) -> &ExamId {
        &self.exam.id
    }

    #[must_use]
    pub fn phase(&self) -> ExamPhase {
        self.phase
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.phase, ExamPhase::Active)
    }

    #[must_use]
    pub fn result(&self) -> Option<ExamResult> {
        match self.phase {
            ExamPhase::Submitted(result) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_passed(&self) -> bool {
        match self.phase {
            ExamPhase::Submitted(result) => result.passed,
            ExamPhase::Finished => true,
            ExamPhase::Active => false,
        }
    }

    #[must_use]
    pub fn current_question_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<usize> {
        self.answers.get(self.current).copied().flatten()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Time left as `M:SS`.
    #[must_use]
    pub fn formatted_time_left(&self) -> String {
        format!("{}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    /// Jump to a question. Other answers are untouched.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::InvalidQuestion` if `index` is outside the exam;
    /// the session is left as it was.
    pub fn go_to_question(&mut self, index: usize) -> Result<(), ExamError> {
        self.ensure_active()?;
        if index >= self.question_count() {
            return Err(ExamError::InvalidQuestion {
                index,
                count: self.question_count(),
            });
        }
        self.current = index;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ExamError::InvalidQuestion` when already on the last question.
    pub fn next_question(&mut self) -> Result<(), ExamError> {
        self.go_to_question(self.current + 1)
    }

    /// # Errors
    ///
    /// Returns `ExamError::NoPreviousQuestion` when already on the first question.
    pub fn previous_question(&mut self) -> Result<(), ExamError> {
        self.ensure_active()?;
        let index = self
            .current
            .checked_sub(1)
            .ok_or(ExamError::NoPreviousQuestion)?;
        self.go_to_question(index)
    }

    /// Select an option for the current question.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotActive` after submission and
    /// `ExamError::InvalidOption` if the option does not exist.
    pub fn select_answer(&mut self, option: usize) -> Result<(), ExamError> {
        self.ensure_active()?;
        let Some(question) = self.exam.questions.get(self.current) else {
            return Err(ExamError::InvalidQuestion {
                index: self.current,
                count: self.question_count(),
            });
        };
        if option >= question.options.len() {
            return Err(ExamError::InvalidOption {
                option,
                count: question.options.len(),
            });
        }
        self.answers[self.current] = Some(option);
        Ok(())
    }

    /// Score the current answers and leave the active state.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotActive` if the exam was already submitted.
    pub fn submit(&mut self) -> Result<ExamResult, ExamError> {
        self.ensure_active()?;
        Ok(self.finish_attempt(false))
    }

    /// Advance the countdown by one second, auto-submitting at zero.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_active() {
            return TickOutcome::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return TickOutcome::Expired(self.finish_attempt(true));
        }
        TickOutcome::Running {
            remaining_secs: self.remaining_secs,
        }
    }

    /// Start over after a failed submission: answers cleared, full time
    /// allowance, first question.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotFailed` unless the session holds a failing result.
    pub fn retry(&mut self) -> Result<(), ExamError> {
        match self.phase {
            ExamPhase::Submitted(result) if !result.passed => {
                self.answers.fill(None);
                self.current = 0;
                self.remaining_secs = self.exam.duration_secs();
                self.phase = ExamPhase::Active;
                Ok(())
            }
            _ => Err(ExamError::NotFailed),
        }
    }

    /// Acknowledge a pass. The caller then records completion of the exam item.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotPassed` unless the session holds a passing result.
    pub fn continue_after_pass(&mut self) -> Result<ExamResult, ExamError> {
        match self.phase {
            ExamPhase::Submitted(result) if result.passed => {
                self.phase = ExamPhase::Finished;
                Ok(result)
            }
            _ => Err(ExamError::NotPassed),
        }
    }

    fn ensure_active(&self) -> Result<(), ExamError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(ExamError::NotActive)
        }
    }

    fn finish_attempt(&mut self, timed_out: bool) -> ExamResult {
        let correct = self
            .exam
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(question, answer)| question.is_correct(**answer))
            .count();
        let result = ExamResult::new(correct, self.question_count(), timed_out);
        self.phase = ExamPhase::Submitted(result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExamQuestion;

    fn exam(questions: usize, duration_minutes: u32) -> Arc<Exam> {
        Arc::new(Exam {
            id: ExamId::new("course-quiz"),
            title: "Course Quiz".into(),
            questions: (0..questions)
                .map(|i| ExamQuestion {
                    id: u32::try_from(i + 1).unwrap(),
                    prompt: format!("Q{i}"),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_answer: Some(1),
                })
                .collect(),
            duration_minutes,
        })
    }

    fn answer_all(session: &mut ExamSession, correct: usize) {
        for i in 0..session.question_count() {
            session.go_to_question(i).unwrap();
            let option = if i < correct { 1 } else { 0 };
            session.select_answer(option).unwrap();
        }
    }

    #[test]
    fn pass_boundary_is_ninety() {
        assert!(is_passing(90));
        assert!(!is_passing(89));
        assert_eq!(score(9, 10), 90);
        assert_eq!(score(0, 0), 0);
    }

    #[test]
    fn four_of_five_fails_five_of_five_passes() {
        let mut session = ExamSession::new(exam(5, 10));
        answer_all(&mut session, 4);
        let result = session.submit().unwrap();
        assert_eq!(result.score, 80);
        assert!(!result.passed);

        session.retry().unwrap();
        answer_all(&mut session, 5);
        let result = session.submit().unwrap();
        assert_eq!(result.score, 100);
        assert!(result.passed);
    }

    #[test]
    fn invalid_navigation_leaves_state_alone() {
        let mut session = ExamSession::new(exam(3, 1));
        session.go_to_question(1).unwrap();
        session.select_answer(2).unwrap();

        let err = session.go_to_question(3).unwrap_err();
        assert_eq!(err, ExamError::InvalidQuestion { index: 3, count: 3 });
        assert_eq!(session.current_question_index(), 1);
        assert_eq!(session.current_answer(), Some(2));

        session.go_to_question(0).unwrap();
        assert_eq!(session.previous_question(), Err(ExamError::NoPreviousQuestion));
        assert_eq!(session.answers(), &[None, Some(2), None]);
    }

    #[test]
    fn invalid_option_is_rejected() {
        let mut session = ExamSession::new(exam(1, 1));
        assert_eq!(
            session.select_answer(4),
            Err(ExamError::InvalidOption { option: 4, count: 4 })
        );
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn timer_expiry_submits_exactly_once() {
        let mut session = ExamSession::new(exam(2, 0));
        session.remaining_secs = 5;
        session.select_answer(1).unwrap();

        let mut expired = 0;
        for _ in 0..10 {
            match session.tick() {
                TickOutcome::Expired(result) => {
                    expired += 1;
                    assert!(result.timed_out);
                    assert_eq!(result.correct, 1);
                    assert_eq!(result.score, 50);
                }
                TickOutcome::Running { .. } | TickOutcome::Idle => {}
            }
        }
        assert_eq!(expired, 1);
        assert_eq!(session.remaining_secs(), 0);
    }

    #[test]
    fn submission_is_terminal() {
        let mut session = ExamSession::new(exam(2, 1));
        session.submit().unwrap();
        assert_eq!(session.submit(), Err(ExamError::NotActive));
        assert_eq!(session.select_answer(0), Err(ExamError::NotActive));
        assert_eq!(session.go_to_question(0), Err(ExamError::NotActive));
        assert_eq!(session.tick(), TickOutcome::Idle);
    }

    #[test]
    fn retry_resets_everything() {
        let mut session = ExamSession::new(exam(3, 2));
        session.tick();
        session.go_to_question(2).unwrap();
        session.select_answer(3).unwrap();
        session.submit().unwrap();

        session.retry().unwrap();
        assert!(session.is_active());
        assert_eq!(session.current_question_index(), 0);
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.remaining_secs(), 120);
    }

    #[test]
    fn retry_and_continue_follow_result() {
        let mut session = ExamSession::new(exam(1, 1));
        assert_eq!(session.retry(), Err(ExamError::NotFailed));
        assert_eq!(session.continue_after_pass(), Err(ExamError::NotPassed));

        session.select_answer(1).unwrap();
        session.submit().unwrap();
        assert_eq!(session.retry(), Err(ExamError::NotFailed));
        let result = session.continue_after_pass().unwrap();
        assert!(result.passed);
        assert_eq!(session.phase(), ExamPhase::Finished);
        assert!(session.has_passed());
    }

    #[test]
    fn formats_time_left() {
        let mut session = ExamSession::new(exam(1, 10));
        assert_eq!(session.formatted_time_left(), "10:00");
        session.tick();
        assert_eq!(session.formatted_time_left(), "9:59");
    }

    #[test]
    fn empty_exam_fails() {
        let mut session = ExamSession::new(exam(0, 1));
        let result = session.submit().unwrap();
        assert_eq!(result.score, 0);
        assert!(!result.passed);
    }
}
