pub mod server;

// Interpreter for `Action`, kept out of `mod.rs` so the enum stays readable
// if more actions show up (migrations, data import).
mod run;

/// What the CLI resolved to. `Server` is the only action today.
#[derive(Debug)]
pub enum Action {
    Server(server::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
