// Module declarations
pub mod board;
pub mod cli;
pub mod cli_context;
pub mod client;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod interactive;
pub mod logging;
pub mod models;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use board::{Board, DropEvent, Lane};
pub use client::{ApiClient, InMemoryGateway, IssueGateway};
pub use config::{load_config, save_config, Config};
pub use error::{KanbanError, KanbanResult};
pub use models::*;
pub use store::{IssueStore, MoveTicket, Reconciliation};
