use crate::{
    cli::{actions::session, globals::GlobalArgs},
    session::{PopupLauncher, ProviderFailure, ProviderId},
};
use anyhow::Result;
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub provider: ProviderId,
}

/// Terminal stand-in for the provider's consent window: the visitor completes
/// the provider sign-in elsewhere and pastes the resulting id token.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalPopup;

/// An empty line or end of input means the window was closed.
async fn read_credential<R>(reader: R) -> std::io::Result<Option<SecretString>>
where
    R: AsyncBufRead + Unpin,
{
    let line = reader.lines().next_line().await?;
    Ok(line
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .map(SecretString::from))
}

#[async_trait]
impl PopupLauncher for TerminalPopup {
    async fn launch(&self, provider: &ProviderId) -> Result<Option<SecretString>, ProviderFailure> {
        eprintln!("Complete the {provider} sign-in and paste its id token (empty line to cancel):");
        read_credential(BufReader::new(tokio::io::stdin()))
            .await
            .map_err(|err| ProviderFailure::Unavailable(format!("Failed to read credential: {err}")))
    }
}

/// Execute the federated sign-in.
/// # Errors
/// Returns an error if the clients cannot be built or the sign-in fails.
pub async fn execute(args: Args) -> Result<()> {
    let machine = session::build(&args.globals, Arc::new(TerminalPopup))?;
    let outcome = machine.submit_popup(args.provider).await;
    session::report(outcome)
}
