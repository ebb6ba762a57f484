// Enrollment endpoints.
//
// Enrollments are created `enrolled` and can only be dropped; there is no
// update, delete, or re-enroll call in the contract.

use reqwest::Method;
use tracing::debug;

use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::models::{CreateEnrollmentRequest, Enrollment, PaginatedData, PaginationParams};

impl ApiClient {
    /// `GET /enrollments?page=&pageSize=&college=`
    pub async fn list_enrollments(
        &self,
        params: PaginationParams,
    ) -> Result<PaginatedData<Enrollment>, Error> {
        debug!(page = params.page(), "listing enrollments");
        self.request(
            Method::GET,
            &["enrollments"],
            RequestOptions::new().params(&params),
        )
        .await
    }

    /// `GET /enrollments/{id}`
    pub async fn get_enrollment(&self, id: &str) -> Result<Enrollment, Error> {
        self.request(
            Method::GET,
            &["enrollments", id],
            RequestOptions::new(),
        )
        .await
    }

    /// `POST /enrollments`. The service assigns `id` and `enrollTime`.
    pub async fn create_enrollment(
        &self,
        enrollment: &CreateEnrollmentRequest,
    ) -> Result<Enrollment, Error> {
        debug!(
            student_id = %enrollment.student_id,
            course_id = %enrollment.course_id,
            "creating enrollment"
        );
        self.request(
            Method::POST,
            &["enrollments"],
            RequestOptions::new().json(enrollment),
        )
        .await
    }

    /// Move an enrollment to `dropped`.
    ///
    /// `PUT /enrollments/{id}/drop` with no body. Issued once per call;
    /// repeated drops are for the service to reconcile.
    pub async fn drop_enrollment(&self, id: &str) -> Result<Enrollment, Error> {
        debug!(id, "dropping enrollment");
        self.request(
            Method::PUT,
            &["enrollments", id, "drop"],
            RequestOptions::new(),
        )
        .await
    }

    /// `GET /students/{studentId}/enrollments?page=&pageSize=&college=`
    pub async fn list_student_enrollments(
        &self,
        student_id: &str,
        params: PaginationParams,
    ) -> Result<PaginatedData<Enrollment>, Error> {
        debug!(student_id, page = params.page(), "listing student enrollments");
        self.request(
            Method::GET,
            &["students", student_id, "enrollments"],
            RequestOptions::new().params(&params),
        )
        .await
    }

    /// `GET /courses/{courseId}/enrollments?page=&pageSize=&college=`
    pub async fn list_course_enrollments(
        &self,
        course_id: &str,
        params: PaginationParams,
    ) -> Result<PaginatedData<Enrollment>, Error> {
        debug!(course_id, page = params.page(), "listing course enrollments");
        self.request(
            Method::GET,
            &["courses", course_id, "enrollments"],
            RequestOptions::new().params(&params),
        )
        .await
    }
}
