pub mod app;
pub mod event;
pub mod handlers;
pub mod layout;
pub mod notifications;
pub mod popups;
pub mod ui;

pub use app::BoardApp;
pub use handlers::{restore_terminal, run_board};
