use crate::{
    cli::{
        actions::{popup::TerminalPopup, session},
        globals::GlobalArgs,
    },
    session::Credentials,
};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
}

/// Execute the password sign-in.
/// # Errors
/// Returns an error if the clients cannot be built or the sign-in fails.
pub async fn execute(args: Args) -> Result<()> {
    let machine = session::build(&args.globals, Arc::new(TerminalPopup))?;

    let outcome = machine
        .submit(Credentials {
            email: args.email,
            password: args.password,
        })
        .await;

    session::report(outcome)
}
