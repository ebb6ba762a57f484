// Student endpoints under `/students`.

use reqwest::Method;
use serde::de::IgnoredAny;
use tracing::debug;

use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::models::{
    CreateStudentRequest, PaginatedData, PaginationParams, Student, UpdateStudentRequest,
};

impl ApiClient {
    /// `GET /students?page=&pageSize=&college=`
    pub async fn list_students(
        &self,
        params: PaginationParams,
    ) -> Result<PaginatedData<Student>, Error> {
        debug!(page = params.page(), "listing students");
        self.request(
            Method::GET,
            &["students"],
            RequestOptions::new().params(&params),
        )
        .await
    }

    /// `GET /students/{id}`
    pub async fn get_student(&self, id: &str) -> Result<Student, Error> {
        self.request(Method::GET, &["students", id], RequestOptions::new())
            .await
    }

    /// `POST /students`
    pub async fn create_student(&self, student: &CreateStudentRequest) -> Result<Student, Error> {
        debug!(name = %student.name, "creating student");
        self.request(
            Method::POST,
            &["students"],
            RequestOptions::new().json(student),
        )
        .await
    }

    /// `PUT /students/{id}` with only the changed fields.
    pub async fn update_student(
        &self,
        id: &str,
        update: &UpdateStudentRequest,
    ) -> Result<Student, Error> {
        debug!(id, "updating student");
        self.request(
            Method::PUT,
            &["students", id],
            RequestOptions::new().json(update),
        )
        .await
    }

    /// `DELETE /students/{id}`
    pub async fn delete_student(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting student");
        // Any acknowledgement payload is accepted and discarded.
        self.request::<IgnoredAny>(
            Method::DELETE,
            &["students", id],
            RequestOptions::new(),
        )
        .await
        .map(|_| ())
    }
}
