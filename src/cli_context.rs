use std::path::PathBuf;
use std::sync::Arc;

use crate::client::{ApiClient, UnauthorizedHandler};
use crate::config::{get_access_token, get_api_url, load_config_from};
use crate::error::{KanbanError, KanbanResult};
use crate::logging::{log_error, log_info};
use crate::store::{ConfigSessionStorage, Session, SessionStorage};

/// Central context for CLI operations, managing configuration and client instances
pub struct CliContext {
    api_url: String,
    token: Option<String>,
    storage: ConfigSessionStorage,
    client: Option<Arc<ApiClient>>,
}

impl CliContext {
    pub fn new() -> Self {
        Self {
            api_url: get_api_url(),
            token: None,
            storage: ConfigSessionStorage::new(),
            client: None,
        }
    }

    /// Load context from saved configuration
    pub fn load() -> KanbanResult<Self> {
        let mut context = Self::new();
        context.token = get_access_token().ok();
        Ok(context)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn token(&self) -> KanbanResult<&str> {
        self.token.as_deref().ok_or(KanbanError::NotAuthenticated)
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn storage(&self) -> &ConfigSessionStorage {
        &self.storage
    }

    /// Clears the stored session. Installed on every authenticated client so
    /// a 401 from any endpoint logs the user out.
    pub fn unauthorized_handler(&self) -> UnauthorizedHandler {
        let storage = self.storage.clone();
        Arc::new(move || {
            let mut storage = storage.clone();
            match storage.clear() {
                Ok(()) => log_info("Cleared stored session after 401"),
                Err(e) => log_error(&format!("Failed to clear stored session: {}", e)),
            }
        })
    }

    /// Get or create the client carrying the stored credential
    pub fn authenticated_client(&mut self) -> KanbanResult<Arc<ApiClient>> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }

        let token = self.token()?.to_string();
        let client = Arc::new(
            ApiClient::new(self.api_url.clone(), Some(&token))?
                .with_unauthorized_handler(self.unauthorized_handler()),
        );
        self.client = Some(client.clone());
        Ok(client)
    }

    /// Client without credentials, for login and signup.
    pub fn anonymous_client(&self) -> KanbanResult<Arc<ApiClient>> {
        Ok(Arc::new(ApiClient::new(self.api_url.clone(), None)?))
    }

    /// Adopts a freshly issued session; the next authenticated client uses it.
    pub fn set_session(&mut self, session: &Session) -> KanbanResult<()> {
        self.storage.save(session)?;
        self.token = Some(session.access_token.clone());
        self.client = None;
        Ok(())
    }

    pub fn clear_session(&mut self) -> KanbanResult<()> {
        self.storage.clear()?;
        self.token = None;
        self.client = None;
        Ok(())
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder pattern for creating CLI contexts with specific configurations
pub struct CliContextBuilder {
    api_url: Option<String>,
    token: Option<String>,
    config_path: Option<PathBuf>,
}

impl CliContextBuilder {
    pub fn new() -> Self {
        Self {
            api_url: None,
            token: None,
            config_path: None,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Reads and writes the session in `path` instead of the user's config.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn build(self) -> KanbanResult<CliContext> {
        let (storage, stored) = match &self.config_path {
            Some(path) => {
                let config = load_config_from(path);
                (ConfigSessionStorage::at(path), config)
            }
            None => (ConfigSessionStorage::new(), Default::default()),
        };

        let token = match (self.token, &self.config_path) {
            (Some(token), _) => Some(token),
            (None, Some(_)) => stored.access_token.clone(),
            (None, None) => get_access_token().ok(),
        };
        let api_url = self
            .api_url
            .or(stored.api_url)
            .unwrap_or_else(get_api_url);

        Ok(CliContext {
            api_url,
            token,
            storage,
            client: None,
        })
    }
}

impl Default for CliContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
