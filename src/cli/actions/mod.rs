pub mod login;
pub mod popup;

mod run;
mod session;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    Popup(popup::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the sign-in attempt fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
