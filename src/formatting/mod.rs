pub mod issues;
pub mod projects;
pub mod utils;

pub use issues::{format_status_color, get_status_icon, print_board, print_issues, print_single_issue, OutputFormat};
pub use projects::{print_projects, print_single_project};
pub use utils::{clean_description, fit, format_priority, format_priority_indicator, truncate};
