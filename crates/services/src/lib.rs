#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod exams;
pub mod progress_service;
pub mod progress_store;

pub use app_services::{AppServices, load_content};
pub use config::ServicesConfig;
pub use error::{AppServicesError, ExamError};
pub use event_bus::{EventBus, EventListener, Subscription};
pub use exams::{ExamHandle, ExamService, ExamTimer};
pub use progress_service::{ItemAction, ProgressService};
pub use progress_store::{PROGRESS_KEY, ProgressStore};
