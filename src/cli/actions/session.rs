use crate::{
    cli::globals::GlobalArgs,
    i18n::Catalog,
    session::{
        Collaborators, IdentityToolkitProvider, PopupLauncher, SessionConfig, SessionMachine,
        SubmitOutcome, TokenExchangeClient,
    },
};
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Wires the session core to the Identity Toolkit and the storefront backend.
pub(super) fn build(globals: &GlobalArgs, popup: Arc<dyn PopupLauncher>) -> Result<SessionMachine> {
    let provider = IdentityToolkitProvider::new(&globals.identity_url, globals.api_key.clone(), popup)
        .context("Failed to build identity provider client")?;
    let sync = TokenExchangeClient::new(&globals.api_url)
        .context("Failed to build account sync client")?;
    let translator = Arc::new(Catalog::with_defaults(&globals.locale));

    let machine = SessionMachine::new(
        SessionConfig::default(),
        Collaborators::new(Arc::new(provider), Arc::new(sync), translator),
    );
    debug!(session = %machine.session_id(), api_url = %globals.api_url, "session ready");

    Ok(machine)
}

/// Prints the destination on success; failures become the process error.
pub(super) fn report(outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Authenticated { destination } => {
            println!("{destination}");
            Ok(())
        }
        SubmitOutcome::Failed(error) => Err(anyhow::Error::new(error).context("Sign-in failed")),
        SubmitOutcome::Ignored => Err(anyhow!("A sign-in attempt is already in progress")),
    }
}
