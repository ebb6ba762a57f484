// Wire types for the enrollment service.
//
// Field names follow the service's camelCase JSON. The closed enumerations
// (`College`, `Gender`, `EnrollmentStatus`) reject unknown values when a
// payload is decoded or a CLI argument is parsed, never later.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::Error;

// ── Enumerations ────────────────────────────────────────────────────

/// Institutional division. Used as a filter and carried by every entity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum College {
    A,
    B,
    C,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Gender {
    Male,
    Female,
}

/// Enrollment lifecycle: `enrolled` → `dropped`, one way.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EnrollmentStatus {
    Enrolled,
    Dropped,
}

impl EnrollmentStatus {
    /// Whether the client contract allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Enrolled, Self::Dropped) => true,
            (Self::Enrolled | Self::Dropped, _) => false,
        }
    }
}

// ── Student ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub college: College,
    pub major: String,
    pub grade: String,
    pub gender: Gender,
}

/// `POST /students` body: a student without its server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    pub college: College,
    pub major: String,
    pub grade: String,
    pub gender: Gender,
}

/// `PUT /students/{id}` body. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college: Option<College>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

// ── Course ──────────────────────────────────────────────────────────

/// A course offering.
///
/// The service keeps `0 <= current_students <= max_students`; the client
/// relies on that but does not check it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    pub college: College,
    pub credit: f64,
    pub teacher: String,
    pub max_students: u32,
    pub current_students: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Course {
    /// Seats left, as reported by the service.
    pub fn open_seats(&self) -> u32 {
        self.max_students.saturating_sub(self.current_students)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub name: String,
    pub college: College,
    pub credit: f64,
    pub teacher: String,
    pub max_students: u32,
    pub current_students: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college: Option<College>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_students: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_students: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── Enrollment ──────────────────────────────────────────────────────

/// A student's registration in a course.
///
/// `student_id` and `course_id` are plain references: the client owns
/// neither side and nothing cascades from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub college: College,
    /// Assigned by the service when the enrollment is created.
    pub enroll_time: String,
    pub status: EnrollmentStatus,
}

impl Enrollment {
    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Enrolled
    }
}

/// `POST /enrollments` body. Has no `id` or `enrollTime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentRequest {
    pub student_id: String,
    pub course_id: String,
    pub college: College,
    pub status: EnrollmentStatus,
}

impl CreateEnrollmentRequest {
    /// A new enrollment always starts out `enrolled`.
    pub fn new(student_id: impl Into<String>, course_id: impl Into<String>, college: College) -> Self {
        Self {
            student_id: student_id.into(),
            course_id: course_id.into(),
            college,
            status: EnrollmentStatus::Enrolled,
        }
    }
}

// ── Pagination ──────────────────────────────────────────────────────

/// Query for one page of a listing. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    page: u32,
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    college: Option<College>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            college: None,
        }
    }
}

impl PaginationParams {
    pub fn new(page: u32, page_size: u32) -> Result<Self, Error> {
        if page == 0 {
            return Err(Error::InvalidPagination { field: "page" });
        }
        if page_size == 0 {
            return Err(Error::InvalidPagination { field: "pageSize" });
        }
        Ok(Self {
            page,
            page_size,
            college: None,
        })
    }

    pub fn with_college(mut self, college: Option<College>) -> Self {
        self.college = college;
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn college(&self) -> Option<College> {
        self.college
    }

    /// The same query, one page further.
    pub fn next_page(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..*self
        }
    }

    /// Query-string pairs in wire order: `page`, `pageSize`, `college`.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(college) = self.college {
            query.push(("college", college.to_string()));
        }
        query
    }
}

/// One page of results. `total` counts every page, not just `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedData<T> {
    pub total: u64,
    pub items: Vec<T>,
}

impl<T> PaginatedData<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ── Envelope ────────────────────────────────────────────────────────

/// Envelope wrapping every response body:
/// ```json
/// { "code": 200, "data": { ... }, "message": "ok" }
/// ```
/// [`ApiClient`](crate::ApiClient) strips it; callers only see `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    pub data: T,
    pub message: String,
}
