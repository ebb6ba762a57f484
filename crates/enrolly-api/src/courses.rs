// Course endpoints under `/courses`.

use reqwest::Method;
use serde::de::IgnoredAny;
use tracing::debug;

use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::models::{
    Course, CreateCourseRequest, PaginatedData, PaginationParams, UpdateCourseRequest,
};

impl ApiClient {
    /// `GET /courses?page=&pageSize=&college=`
    pub async fn list_courses(
        &self,
        params: PaginationParams,
    ) -> Result<PaginatedData<Course>, Error> {
        debug!(page = params.page(), "listing courses");
        self.request(
            Method::GET,
            &["courses"],
            RequestOptions::new().params(&params),
        )
        .await
    }

    /// Courses that still have open seats, filtered by the service.
    ///
    /// `GET /courses/available?page=&pageSize=&college=`
    pub async fn list_available_courses(
        &self,
        params: PaginationParams,
    ) -> Result<PaginatedData<Course>, Error> {
        debug!(page = params.page(), "listing available courses");
        self.request(
            Method::GET,
            &["courses", "available"],
            RequestOptions::new().params(&params),
        )
        .await
    }

    /// `GET /courses/{id}`
    pub async fn get_course(&self, id: &str) -> Result<Course, Error> {
        self.request(Method::GET, &["courses", id], RequestOptions::new())
            .await
    }

    /// `POST /courses`
    pub async fn create_course(&self, course: &CreateCourseRequest) -> Result<Course, Error> {
        debug!(name = %course.name, "creating course");
        self.request(Method::POST, &["courses"], RequestOptions::new().json(course))
            .await
    }

    /// `PUT /courses/{id}`. The service merges the partial body.
    pub async fn update_course(
        &self,
        id: &str,
        update: &UpdateCourseRequest,
    ) -> Result<Course, Error> {
        debug!(id, "updating course");
        self.request(
            Method::PUT,
            &["courses", id],
            RequestOptions::new().json(update),
        )
        .await
    }

    /// `DELETE /courses/{id}`
    pub async fn delete_course(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting course");
        // Any acknowledgement payload is accepted and discarded.
        self.request::<IgnoredAny>(
            Method::DELETE,
            &["courses", id],
            RequestOptions::new(),
        )
        .await
        .map(|_| ())
    }
}
