use std::path::PathBuf;
use std::sync::Arc;

use crate::client::AuthGateway;
use crate::config::{config_path, load_config_from, save_config_to};
use crate::constants::{LOGIN_FAILED, SIGNUP_FAILED};
use crate::error::{KanbanError, KanbanResult};
use crate::logging::{log_error, log_info};
use crate::models::{AuthResponse, LoginData, SignupData, User};
use crate::validation::Validate;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self {
            access_token: response.access_token,
            user: response.user,
        }
    }
}

/// Where the logged-in session survives between runs.
pub trait SessionStorage: Send {
    fn load(&self) -> Option<Session>;
    fn save(&mut self, session: &Session) -> KanbanResult<()>;
    fn clear(&mut self) -> KanbanResult<()>;
}

/// Keeps the session in the CLI config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigSessionStorage {
    path: Option<PathBuf>,
}

impl ConfigSessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    fn path(&self) -> KanbanResult<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => config_path(),
        }
    }
}

impl SessionStorage for ConfigSessionStorage {
    fn load(&self) -> Option<Session> {
        let config = load_config_from(&self.path().ok()?);
        Some(Session {
            access_token: config.access_token?,
            user: config.user?,
        })
    }

    fn save(&mut self, session: &Session) -> KanbanResult<()> {
        let path = self.path()?;
        let mut config = load_config_from(&path);
        config.access_token = Some(session.access_token.clone());
        config.user = Some(session.user.clone());
        save_config_to(&config, &path)
    }

    fn clear(&mut self) -> KanbanResult<()> {
        let path = self.path()?;
        let mut config = load_config_from(&path);
        if config.access_token.is_none() && config.user.is_none() {
            return Ok(());
        }
        config.access_token = None;
        config.user = None;
        save_config_to(&config, &path)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    session: Option<Session>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Option<Session> {
        self.session.clone()
    }

    fn save(&mut self, session: &Session) -> KanbanResult<()> {
        self.session = Some(session.clone());
        Ok(())
    }

    fn clear(&mut self) -> KanbanResult<()> {
        self.session = None;
        Ok(())
    }
}

pub struct AuthStore<S: SessionStorage> {
    gateway: Arc<dyn AuthGateway>,
    storage: S,
    session: Option<Session>,
    loading: bool,
    error: Option<String>,
}

impl<S: SessionStorage> AuthStore<S> {
    pub fn new(gateway: Arc<dyn AuthGateway>, storage: S) -> Self {
        Self {
            gateway,
            storage,
            session: None,
            loading: false,
            error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.access_token.as_str())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn authenticate(
        &mut self,
        response: KanbanResult<AuthResponse>,
        fallback: &str,
    ) -> KanbanResult<User> {
        self.loading = false;
        match response {
            Ok(response) => {
                let session = Session::from(response);
                self.storage.save(&session)?;
                log_info(&format!("Authenticated as {}", session.user.email));
                let user = session.user.clone();
                self.session = Some(session);
                self.error = None;
                Ok(user)
            }
            Err(e) => {
                log_error(&format!("{}: {}", fallback, e));
                self.error = Some(e.user_message(fallback));
                self.session = None;
                Err(e)
            }
        }
    }

    pub async fn login(&mut self, data: LoginData) -> KanbanResult<User> {
        data.validate()?;
        self.loading = true;
        self.error = None;
        let response = self.gateway.login(&data).await;
        self.authenticate(response, LOGIN_FAILED)
    }

    pub async fn signup(&mut self, data: SignupData) -> KanbanResult<User> {
        data.validate()?;
        self.loading = true;
        self.error = None;
        let response = self.gateway.signup(&data).await;
        self.authenticate(response, SIGNUP_FAILED)
    }

    pub fn logout(&mut self) -> KanbanResult<()> {
        self.session = None;
        self.error = None;
        self.storage.clear()
    }

    /// Drops the session after the API rejected our credential.
    pub fn invalidate(&mut self) -> KanbanResult<()> {
        log_info("Session invalidated by the server");
        self.session = None;
        self.storage.clear()
    }

    /// Restores a stored session if the server still accepts it. An invalid
    /// session is cleared and reported as `Ok(false)`.
    pub async fn check_auth(&mut self) -> KanbanResult<bool> {
        let Some(stored) = self.storage.load() else {
            self.session = None;
            return Ok(false);
        };

        match self.gateway.current_user().await {
            Ok(_) => {
                self.session = Some(stored);
                Ok(true)
            }
            Err(KanbanError::Network(msg)) => Err(KanbanError::Network(msg)),
            Err(e) => {
                log_info(&format!("Stored session rejected: {}", e));
                self.invalidate()?;
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Failure, InMemoryGateway, Operation};

    fn dev() -> User {
        User {
            id: 1,
            username: "dev".to_string(),
            email: "dev@example.com".to_string(),
        }
    }

    fn gateway_with_account() -> Arc<InMemoryGateway> {
        let gateway = Arc::new(InMemoryGateway::new());
        gateway.add_account(dev(), "hunter22");
        gateway
    }

    fn login(password: &str) -> LoginData {
        LoginData {
            email: "dev@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let mut store = AuthStore::new(gateway_with_account(), MemorySessionStorage::new());

        let user = store.login(login("hunter22")).await.unwrap();

        assert_eq!(user, dev());
        assert!(store.is_authenticated());
        assert_eq!(store.token(), Some("token-1"));
        assert_eq!(store.storage().load().unwrap().user, dev());
    }

    #[tokio::test]
    async fn test_login_failure_shows_server_detail() {
        let mut store = AuthStore::new(gateway_with_account(), MemorySessionStorage::new());

        assert!(store.login(login("wrong-password")).await.is_err());

        assert!(!store.is_authenticated());
        assert!(!store.is_loading());
        assert_eq!(store.error(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_login_network_failure_uses_fallback() {
        let gateway = gateway_with_account();
        gateway.fail(Operation::Login, Failure::network());
        let mut store = AuthStore::new(gateway, MemorySessionStorage::new());

        assert!(store.login(login("hunter22")).await.is_err());
        assert_eq!(store.error(), Some("Login failed"));
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email() {
        let mut store = AuthStore::new(gateway_with_account(), MemorySessionStorage::new());

        let result = store
            .signup(SignupData {
                username: "other".to_string(),
                email: "dev@example.com".to_string(),
                password: "password1".to_string(),
            })
            .await;

        assert!(result.is_err());
        assert_eq!(store.error(), Some("Email already registered"));
    }

    #[tokio::test]
    async fn test_check_auth_clears_rejected_session() {
        let gateway = gateway_with_account();
        let storage = MemorySessionStorage::with_session(Session {
            access_token: "stale".to_string(),
            user: dev(),
        });
        let mut store = AuthStore::new(gateway, storage);

        assert!(!store.check_auth().await.unwrap());
        assert!(store.storage().load().is_none());
    }

    #[tokio::test]
    async fn test_check_auth_restores_valid_session() {
        let gateway = gateway_with_account();
        let mut store = AuthStore::new(gateway.clone(), MemorySessionStorage::new());
        store.login(login("hunter22")).await.unwrap();

        let mut restored = AuthStore::new(gateway, store.storage().clone());
        assert!(restored.check_auth().await.unwrap());
        assert_eq!(restored.user(), Some(&dev()));
    }

    #[tokio::test]
    async fn test_expired_session_is_invalidated() {
        let gateway = gateway_with_account();
        let mut store = AuthStore::new(gateway.clone(), MemorySessionStorage::new());
        store.login(login("hunter22")).await.unwrap();
        gateway.expire_session();

        assert!(!store.check_auth().await.unwrap());
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_storage() {
        let mut store = AuthStore::new(gateway_with_account(), MemorySessionStorage::new());
        store.login(login("hunter22")).await.unwrap();

        store.logout().unwrap();

        assert!(!store.is_authenticated());
        assert!(store.storage().load().is_none());
    }
}
