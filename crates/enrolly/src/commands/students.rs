//! Student command handlers.

use enrolly_api::{CreateStudentRequest, Student, UpdateStudentRequest};
use tabled::Tabled;

use crate::cli::{StudentsArgs, StudentsCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "College")]
    college: String,
    #[tabled(rename = "Major")]
    major: String,
    #[tabled(rename = "Grade")]
    grade: String,
    #[tabled(rename = "Gender")]
    gender: String,
}

impl From<&Student> for StudentRow {
    fn from(s: &Student) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            college: s.college.to_string(),
            major: s.major.clone(),
            grade: s.grade.clone(),
            gender: s.gender.to_string(),
        }
    }
}

fn detail(s: &Student) -> String {
    output::detail_lines(&[
        ("ID", s.id.clone()),
        ("Name", s.name.clone()),
        ("College", s.college.to_string()),
        ("Major", s.major.clone()),
        ("Grade", s.grade.clone()),
        ("Gender", s.gender.to_string()),
    ])
}

fn not_found(err: enrolly_api::Error, id: &str) -> CliError {
    CliError::for_resource(err, "student", id, "students list")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: StudentsArgs) -> Result<(), CliError> {
    match args.command {
        StudentsCommand::List(list) => {
            util::list(
                ctx,
                &list,
                |params| ctx.client.list_students(params),
                |s| StudentRow::from(s),
                |s| s.id.clone(),
            )
            .await
        }

        StudentsCommand::Get { id } => {
            let student = ctx
                .client
                .get_student(&id)
                .await
                .map_err(|e| not_found(e, &id))?;
            ctx.print(&output::render_single(
                ctx.output,
                &student,
                detail,
                |s| s.id.clone(),
            )?);
            Ok(())
        }

        StudentsCommand::Create {
            name,
            college,
            major,
            grade,
            gender,
        } => {
            let request = CreateStudentRequest {
                name,
                college,
                major,
                grade,
                gender,
            };
            let student = ctx.client.create_student(&request).await?;
            ctx.done(&format!("Student {} created", student.id));
            ctx.print(&output::render_single(
                ctx.output,
                &student,
                detail,
                |s| s.id.clone(),
            )?);
            Ok(())
        }

        StudentsCommand::Update {
            id,
            name,
            college,
            major,
            grade,
            gender,
        } => {
            let update = UpdateStudentRequest {
                name,
                college,
                major,
                grade,
                gender,
            };
            if update == UpdateStudentRequest::default() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "pass at least one field to change".into(),
                });
            }
            let student = ctx
                .client
                .update_student(&id, &update)
                .await
                .map_err(|e| not_found(e, &id))?;
            ctx.done(&format!("Student {id} updated"));
            ctx.print(&output::render_single(
                ctx.output,
                &student,
                detail,
                |s| s.id.clone(),
            )?);
            Ok(())
        }

        StudentsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete student '{id}'?"), ctx.yes)? {
                return Ok(());
            }
            ctx.client
                .delete_student(&id)
                .await
                .map_err(|e| not_found(e, &id))?;
            ctx.done(&format!("Student {id} deleted"));
            Ok(())
        }
    }
}
