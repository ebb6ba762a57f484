//! Course command handlers.

use enrolly_api::{Course, CreateCourseRequest, UpdateCourseRequest};
use tabled::Tabled;

use crate::cli::{CoursesArgs, CoursesCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "College")]
    college: String,
    #[tabled(rename = "Credit")]
    credit: f64,
    #[tabled(rename = "Teacher")]
    teacher: String,
    #[tabled(rename = "Seats")]
    seats: String,
}

impl From<&Course> for CourseRow {
    fn from(c: &Course) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            college: c.college.to_string(),
            credit: c.credit,
            teacher: c.teacher.clone(),
            seats: format!("{}/{}", c.current_students, c.max_students),
        }
    }
}

fn detail(c: &Course) -> String {
    output::detail_lines(&[
        ("ID", c.id.clone()),
        ("Name", c.name.clone()),
        ("College", c.college.to_string()),
        ("Credit", c.credit.to_string()),
        ("Teacher", c.teacher.clone()),
        (
            "Seats",
            format!(
                "{}/{} ({} open)",
                c.current_students,
                c.max_students,
                c.open_seats()
            ),
        ),
        ("Description", util::or_dash(c.description.as_deref())),
    ])
}

fn not_found(err: enrolly_api::Error, id: &str) -> CliError {
    CliError::for_resource(err, "course", id, "courses list")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: CoursesArgs) -> Result<(), CliError> {
    match args.command {
        CoursesCommand::List(list) => {
            util::list(
                ctx,
                &list,
                |params| ctx.client.list_courses(params),
                |c| CourseRow::from(c),
                |c| c.id.clone(),
            )
            .await
        }

        CoursesCommand::Available(list) => {
            util::list(
                ctx,
                &list,
                |params| ctx.client.list_available_courses(params),
                |c| CourseRow::from(c),
                |c| c.id.clone(),
            )
            .await
        }

        CoursesCommand::Get { id } => {
            let course = ctx
                .client
                .get_course(&id)
                .await
                .map_err(|e| not_found(e, &id))?;
            ctx.print(&output::render_single(
                ctx.output,
                &course,
                detail,
                |c| c.id.clone(),
            )?);
            Ok(())
        }

        CoursesCommand::Create {
            name,
            college,
            credit,
            teacher,
            max_students,
            current_students,
            description,
        } => {
            let request = CreateCourseRequest {
                name,
                college,
                credit,
                teacher,
                max_students,
                current_students,
                description,
            };
            let course = ctx.client.create_course(&request).await?;
            ctx.done(&format!("Course {} created", course.id));
            ctx.print(&output::render_single(
                ctx.output,
                &course,
                detail,
                |c| c.id.clone(),
            )?);
            Ok(())
        }

        CoursesCommand::Update {
            id,
            name,
            college,
            credit,
            teacher,
            max_students,
            current_students,
            description,
        } => {
            let update = UpdateCourseRequest {
                name,
                college,
                credit,
                teacher,
                max_students,
                current_students,
                description,
            };
            if update == UpdateCourseRequest::default() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "pass at least one field to change".into(),
                });
            }
            let course = ctx
                .client
                .update_course(&id, &update)
                .await
                .map_err(|e| not_found(e, &id))?;
            ctx.done(&format!("Course {id} updated"));
            ctx.print(&output::render_single(
                ctx.output,
                &course,
                detail,
                |c| c.id.clone(),
            )?);
            Ok(())
        }

        CoursesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete course '{id}'?"), ctx.yes)? {
                return Ok(());
            }
            ctx.client
                .delete_course(&id)
                .await
                .map_err(|e| not_found(e, &id))?;
            ctx.done(&format!("Course {id} deleted"));
            Ok(())
        }
    }
}

