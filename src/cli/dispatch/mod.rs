use crate::cli::actions::{server::Args, Action};
use anyhow::{Context, Result};

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let client_id = matches
        .get_one::<String>("client-id")
        .cloned()
        .context("missing required argument: --client-id")?;

    let client_secret = matches
        .get_one::<String>("client-secret")
        .cloned()
        .context("missing required argument: --client-secret")?;

    Ok(Action::Server(Args {
        port,
        dsn,
        client_id,
        client_secret,
    }))
}
