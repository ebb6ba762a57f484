//! Clap derive structures for the `enrolly` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use enrolly_api::{College, Gender};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// enrolly -- students, courses, and enrollments from the command line
#[derive(Debug, Parser)]
#[command(
    name = "enrolly",
    version,
    about = "Manage students, courses, and enrollments from the command line",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Service base URL, including the path prefix (e.g. http://host/api)
    #[arg(long, env = "ENROLLY_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, env = "ENROLLY_TIMEOUT_MS", global = true)]
    pub timeout_ms: Option<u64>,

    /// Session token file
    #[arg(long, env = "ENROLLY_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "ENROLLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "ENROLLY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "ENROLLY_INSECURE", global = true)]
    pub insecure: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage students
    #[command(alias = "st")]
    Students(StudentsArgs),

    /// Manage courses
    #[command(alias = "co")]
    Courses(CoursesArgs),

    /// Enroll students and drop enrollments
    #[command(alias = "en")]
    Enrollments(EnrollmentsArgs),

    /// Store a session token
    Login(LoginArgs),

    /// Forget the stored session token
    Logout,

    /// Show whether a session token is stored
    Whoami,

    /// Check whether navigation to a route is allowed
    Route(RouteArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Items per page [default: from config]
    #[arg(long, short = 'l', value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Only items belonging to this college (A, B, C)
    #[arg(long)]
    pub college: Option<College>,

    /// Fetch every page
    #[arg(long, short = 'a')]
    pub all: bool,
}

// ── Students ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StudentsArgs {
    #[command(subcommand)]
    pub command: StudentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StudentsCommand {
    /// List students
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one student
    Get { id: String },

    /// Register a student
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        college: College,
        #[arg(long)]
        major: String,
        #[arg(long)]
        grade: String,
        #[arg(long)]
        gender: Gender,
    },

    /// Change selected fields of a student
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        college: Option<College>,
        #[arg(long)]
        major: Option<String>,
        #[arg(long)]
        grade: Option<String>,
        #[arg(long)]
        gender: Option<Gender>,
    },

    /// Delete a student
    #[command(alias = "rm")]
    Delete { id: String },
}

// ── Courses ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CoursesArgs {
    #[command(subcommand)]
    pub command: CoursesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CoursesCommand {
    /// List courses
    #[command(alias = "ls")]
    List(ListArgs),

    /// List courses that still have open seats
    Available(ListArgs),

    /// Show one course
    Get { id: String },

    /// Create a course
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        college: College,
        #[arg(long, value_parser = finite_credit)]
        credit: f64,
        #[arg(long)]
        teacher: String,
        #[arg(long)]
        max_students: u32,
        #[arg(long, default_value = "0")]
        current_students: u32,
        #[arg(long)]
        description: Option<String>,
    },

    /// Change selected fields of a course
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        college: Option<College>,
        #[arg(long, value_parser = finite_credit)]
        credit: Option<f64>,
        #[arg(long)]
        teacher: Option<String>,
        #[arg(long)]
        max_students: Option<u32>,
        #[arg(long)]
        current_students: Option<u32>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a course
    #[command(alias = "rm")]
    Delete { id: String },
}

/// Parse a credit value, rejecting `NaN` and infinities.
fn finite_credit(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{s}' is not a finite number"))
    }
}

// ── Enrollments ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EnrollmentsArgs {
    #[command(subcommand)]
    pub command: EnrollmentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EnrollmentsCommand {
    /// List enrollments
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one enrollment
    Get { id: String },

    /// Enroll a student in a course
    Create {
        #[arg(long)]
        student: String,
        #[arg(long)]
        course: String,
        #[arg(long)]
        college: College,
    },

    /// Drop an active enrollment
    Drop { id: String },

    /// Enrollments of one student
    ForStudent {
        student_id: String,
        #[command(flatten)]
        list: ListArgs,
    },

    /// Enrollments in one course
    ForCourse {
        course_id: String,
        #[command(flatten)]
        list: ListArgs,
    },
}

// ── Session & routing ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Bearer token issued by the service (prompted for when omitted)
    #[arg(long, env = "ENROLLY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Target path, e.g. /dashboard/students
    pub path: String,

    /// Path of the login page
    #[arg(long, default_value = enrolly_core::LOGIN_PATH)]
    pub login_path: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with the given values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the resolved configuration
    Show,

    /// Print config and session file paths
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn college_and_gender_parse_case_insensitively() {
        let cli = Cli::try_parse_from([
            "enrolly", "students", "create", "--name", "Ada", "--college", "b", "--major",
            "Math", "--grade", "2024", "--gender", "Female",
        ])
        .unwrap();
        match cli.command {
            Command::Students(StudentsArgs {
                command: StudentsCommand::Create { college, gender, .. },
            }) => {
                assert_eq!(college, College::B);
                assert_eq!(gender, Gender::Female);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn zero_page_is_rejected() {
        let err = Cli::try_parse_from(["enrolly", "students", "list", "--page", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn non_finite_credit_is_rejected() {
        for bad in ["NaN", "inf", "infinity"] {
            let err = Cli::try_parse_from(["enrolly", "courses", "update", "c1", "--credit", bad])
                .unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation, "{bad}");
        }
        let cli =
            Cli::try_parse_from(["enrolly", "courses", "update", "c1", "--credit", "3.5"]).unwrap();
        match cli.command {
            Command::Courses(CoursesArgs {
                command: CoursesCommand::Update { credit, .. },
            }) => assert!(credit.is_some_and(|c| (c - 3.5).abs() < f64::EPSILON)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_college_is_rejected() {
        assert!(Cli::try_parse_from(["enrolly", "courses", "list", "--college", "D"]).is_err());
    }
}
