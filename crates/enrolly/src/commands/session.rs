//! Session and navigation commands. None of these touch the network.

use enrolly_api::SecretString;
use enrolly_core::{Navigation, NavigationGuard};
use serde::Serialize;

use crate::cli::{LoginArgs, OutputFormat, RouteArgs};
use crate::error::CliError;

use super::Context;

pub fn login(ctx: &Context, args: LoginArgs) -> Result<(), CliError> {
    let token = match args.token {
        Some(token) => token,
        None => dialoguer::Password::new()
            .with_prompt("Token")
            .interact()
            .map_err(|e| CliError::Io(std::io::Error::other(e)))?,
    };

    ctx.session.login(SecretString::from(token.trim().to_owned()))?;
    ctx.done("Session token stored");
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<(), CliError> {
    ctx.session.logout()?;
    ctx.done("Session token removed");
    Ok(())
}

pub fn whoami(ctx: &Context) {
    let text = if ctx.session.is_authenticated() {
        "authenticated"
    } else {
        "not logged in"
    };
    ctx.print(text);
}

#[derive(Serialize)]
struct RouteDecision<'a> {
    target: &'a str,
    allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'a str>,
}

pub fn route(ctx: &Context, args: &RouteArgs) -> Result<(), CliError> {
    let guard = NavigationGuard::new(ctx.session.store()).with_login_path(args.login_path.clone());
    let navigation = guard.check(&args.path);

    let decision = RouteDecision {
        target: &args.path,
        allowed: navigation.is_allowed(),
        redirect: match navigation {
            Navigation::Allow => None,
            Navigation::Redirect(ref to) => Some(to.as_str()),
        },
    };

    let rendered = match ctx.output {
        OutputFormat::Json => serde_json::to_string_pretty(&decision)?,
        OutputFormat::JsonCompact => serde_json::to_string(&decision)?,
        OutputFormat::Yaml => serde_yaml::to_string(&decision)?,
        OutputFormat::Table | OutputFormat::Plain => match decision.redirect {
            Some(to) => format!("redirect {to}"),
            None => "allow".to_owned(),
        },
    };
    ctx.print(&rendered);
    Ok(())
}
