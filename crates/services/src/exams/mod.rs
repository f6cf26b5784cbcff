mod service;
mod timer;

pub use course_core::exam_session::ExamError;
pub use service::{ExamHandle, ExamService};
pub use timer::ExamTimer;
