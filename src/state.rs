use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub issuer: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(config: Config, issuer: TokenIssuer) -> Self {
        Self {
            config: Arc::new(config),
            issuer: Arc::new(issuer),
        }
    }
}
