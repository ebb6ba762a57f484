//! Shared helpers for command handlers.

use std::io::IsTerminal;

use enrolly_api::{Error, PaginatedData, PaginationParams, collect_all_pages};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::ListArgs;
use crate::error::CliError;
use crate::output;

use super::Context;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Pagination parameters from `--page`, `--page-size`, and `--college`.
pub fn pagination(list: &ListArgs, default_page_size: u32) -> Result<PaginationParams, CliError> {
    let size = list.page_size.unwrap_or(default_page_size);
    Ok(PaginationParams::new(list.page, size)?.with_college(list.college))
}

/// Fetch and print either one page or, with `--all`, every page.
pub async fn list<T, R, F, Fut>(
    ctx: &Context,
    list: &ListArgs,
    fetch: F,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<(), CliError>
where
    T: Serialize,
    R: Tabled,
    F: Fn(PaginationParams) -> Fut,
    Fut: Future<Output = Result<PaginatedData<T>, Error>>,
{
    let params = pagination(list, ctx.page_size)?;

    let rendered = if list.all {
        let items = collect_all_pages(params, fetch).await?;
        output::render_list(ctx.output, &items, to_row, id_fn)?
    } else {
        let page = fetch(params).await?;
        output::render_page(ctx.output, &page, params.page(), to_row, id_fn)?
    };

    ctx.print(&rendered);
    Ok(())
}

/// Empty table cells for absent optional values.
pub fn or_dash(value: Option<&str>) -> String {
    value.map_or_else(|| "-".into(), str::to_owned)
}
