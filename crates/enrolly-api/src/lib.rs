// enrolly-api: Async Rust client for the course-enrollment administration API

pub mod client;
pub mod error;
pub mod models;
pub mod notify;
pub mod session;
pub mod transport;

mod courses;
mod enrollments;
mod students;

pub use client::{ApiClient, RequestOptions, collect_all_pages};
pub use error::{Error, ErrorKind, GENERIC_FAILURE_MESSAGE};
pub use models::{
    ApiResponse, College, Course, CreateCourseRequest, CreateEnrollmentRequest,
    CreateStudentRequest, Enrollment, EnrollmentStatus, Gender, PaginatedData, PaginationParams,
    Student, UpdateCourseRequest, UpdateStudentRequest,
};
pub use notify::{ChannelNotifier, Notification, Notifier, TracingNotifier};
pub use reqwest::Method;
pub use secrecy::SecretString;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, TOKEN_KEY};
pub use transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};
