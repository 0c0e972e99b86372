pub mod auth_store;
pub mod issue_store;
pub mod project_store;
pub mod reconcile;

pub use auth_store::{AuthStore, ConfigSessionStorage, MemorySessionStorage, Session, SessionStorage};
pub use issue_store::{IssueStore, MoveTicket, Reconciliation};
pub use project_store::ProjectStore;
