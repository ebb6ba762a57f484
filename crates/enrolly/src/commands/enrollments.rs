//! Enrollment command handlers.

use enrolly_api::{CreateEnrollmentRequest, Enrollment};
use tabled::Tabled;

use crate::cli::{EnrollmentsArgs, EnrollmentsCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EnrollmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Student")]
    student_id: String,
    #[tabled(rename = "Course")]
    course_id: String,
    #[tabled(rename = "College")]
    college: String,
    #[tabled(rename = "Enrolled At")]
    enroll_time: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Enrollment> for EnrollmentRow {
    fn from(e: &Enrollment) -> Self {
        Self {
            id: e.id.clone(),
            student_id: e.student_id.clone(),
            course_id: e.course_id.clone(),
            college: e.college.to_string(),
            enroll_time: e.enroll_time.clone(),
            status: e.status.to_string(),
        }
    }
}

fn detail(e: &Enrollment) -> String {
    output::detail_lines(&[
        ("ID", e.id.clone()),
        ("Student", e.student_id.clone()),
        ("Course", e.course_id.clone()),
        ("College", e.college.to_string()),
        ("Enrolled At", e.enroll_time.clone()),
        ("Status", e.status.to_string()),
    ])
}

fn not_found(err: enrolly_api::Error, id: &str) -> CliError {
    CliError::for_resource(err, "enrollment", id, "enrollments list")
}

fn id_of(e: &Enrollment) -> String {
    e.id.clone()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: EnrollmentsArgs) -> Result<(), CliError> {
    match args.command {
        EnrollmentsCommand::List(list) => {
            util::list(
                ctx,
                &list,
                |params| ctx.client.list_enrollments(params),
                |e| EnrollmentRow::from(e),
                id_of,
            )
            .await
        }

        EnrollmentsCommand::ForStudent { student_id, list } => {
            util::list(
                ctx,
                &list,
                |params| ctx.client.list_student_enrollments(&student_id, params),
                |e| EnrollmentRow::from(e),
                id_of,
            )
            .await
        }

        EnrollmentsCommand::ForCourse { course_id, list } => {
            util::list(
                ctx,
                &list,
                |params| ctx.client.list_course_enrollments(&course_id, params),
                |e| EnrollmentRow::from(e),
                id_of,
            )
            .await
        }

        EnrollmentsCommand::Get { id } => {
            let enrollment = ctx
                .client
                .get_enrollment(&id)
                .await
                .map_err(|e| not_found(e, &id))?;
            ctx.print(&output::render_single(
                ctx.output,
                &enrollment,
                detail,
                id_of,
            )?);
            Ok(())
        }

        EnrollmentsCommand::Create {
            student,
            course,
            college,
        } => {
            let request = CreateEnrollmentRequest::new(student, course, college);
            let enrollment = ctx.client.create_enrollment(&request).await?;
            ctx.done(&format!(
                "Student {} enrolled in course {}",
                enrollment.student_id, enrollment.course_id
            ));
            ctx.print(&output::render_single(
                ctx.output,
                &enrollment,
                detail,
                id_of,
            )?);
            Ok(())
        }

        EnrollmentsCommand::Drop { id } => {
            if !util::confirm(&format!("Drop enrollment '{id}'?"), ctx.yes)? {
                return Ok(());
            }
            let enrollment = ctx
                .client
                .drop_enrollment(&id)
                .await
                .map_err(|e| not_found(e, &id))?;
            ctx.done(&format!("Enrollment {id} dropped"));
            ctx.print(&output::render_single(
                ctx.output,
                &enrollment,
                detail,
                id_of,
            )?);
            Ok(())
        }
    }
}
