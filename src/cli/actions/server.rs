use crate::{api, cli::globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let mut globals = GlobalArgs::new(args.client_id);

    globals.set_secret(SecretString::from(args.client_secret));

    debug!("Global args: {:?}", globals);

    api::new(args.port, args.dsn, globals).await?;

    Ok(())
}
