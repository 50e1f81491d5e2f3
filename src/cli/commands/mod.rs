pub mod account;
pub mod address;
pub mod catalog;
pub mod config;
pub mod orders;
pub mod sell;

use crate::api::ResaleClient;
use crate::api::models::UserProfile;
use crate::config::Config;
use crate::session::SessionManager;
use anyhow::{Result, anyhow};

/// Everything a command needs, built once in `main`
pub struct AppContext {
    pub config: Config,
    pub client: ResaleClient,
    pub session: SessionManager,
}

impl AppContext {
    /// The signed-in user, or an error telling how to sign in
    pub fn require_user(&self) -> Result<&UserProfile> {
        self.session
            .current_user()
            .ok_or_else(|| anyhow!("You are not signed in. Run 'resale-cli account login' first."))
    }
}
