//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod config_cmd;
pub mod courses;
pub mod enrollments;
pub mod session;
pub mod students;
pub mod util;

use std::sync::Arc;

use enrolly_api::{ApiClient, FileSessionStore};
use enrolly_config::Config;
use enrolly_core::Session;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::notify::StderrNotifier;
use crate::output;

/// Everything a handler needs, built once per invocation.
pub struct Context {
    pub client: ApiClient,
    pub session: Session,
    pub output: OutputFormat,
    pub page_size: u32,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
}

impl Context {
    pub fn new(cfg: &Config, global: &GlobalOpts) -> Result<Self, CliError> {
        let color = output::should_color(global.color);
        let session = Session::new(Arc::new(FileSessionStore::new(cfg.session_file())));
        let client = ApiClient::new(&cfg.api.base_url, &cfg.transport(), session.store())?
            .with_notifier(Arc::new(StderrNotifier::new(color)));

        Ok(Self {
            client,
            session,
            output: crate::config::output_format(global, cfg)?,
            page_size: cfg.defaults.page_size,
            color,
            quiet: global.quiet,
            yes: global.yes,
        })
    }

    /// Report a completed mutation on stderr unless `--quiet`.
    pub fn done(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", output::success_line(message, self.color));
        }
    }

    pub fn print(&self, rendered: &str) {
        output::print_output(rendered, self.quiet);
    }
}

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Students(args) => students::handle(ctx, args).await,
        Command::Courses(args) => courses::handle(ctx, args).await,
        Command::Enrollments(args) => enrollments::handle(ctx, args).await,
        Command::Login(args) => session::login(ctx, args),
        Command::Logout => session::logout(ctx),
        Command::Whoami => {
            session::whoami(ctx);
            Ok(())
        }
        Command::Route(args) => session::route(ctx, &args),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
