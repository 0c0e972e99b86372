pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const CONFIG_FILE: &str = ".kanban-cli-config.json";

// Environment overrides
pub const API_URL_ENV: &str = "KANBAN_API_URL";
pub const TOKEN_ENV: &str = "KANBAN_TOKEN";
pub const CONFIG_PATH_ENV: &str = "KANBAN_CONFIG";

pub const MIN_TITLE_LEN: usize = 3;
pub const MIN_PROJECT_NAME_LEN: usize = 3;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

// Fallback banner text when the server sends no detail
pub const FETCH_ISSUES_FAILED: &str = "Failed to fetch issues";
pub const FETCH_ISSUE_FAILED: &str = "Failed to fetch issue";
pub const CREATE_ISSUE_FAILED: &str = "Failed to create issue";
pub const UPDATE_ISSUE_FAILED: &str = "Failed to update issue";
pub const DELETE_ISSUE_FAILED: &str = "Failed to delete issue";
pub const MOVE_ISSUE_FAILED: &str = "Failed to update issue status";

pub const FETCH_PROJECTS_FAILED: &str = "Failed to fetch projects";
pub const FETCH_PROJECT_FAILED: &str = "Failed to fetch project";
pub const CREATE_PROJECT_FAILED: &str = "Failed to create project";
pub const UPDATE_PROJECT_FAILED: &str = "Failed to update project";
pub const DELETE_PROJECT_FAILED: &str = "Failed to delete project";

pub const LOGIN_FAILED: &str = "Login failed";
pub const SIGNUP_FAILED: &str = "Signup failed";

/// Event loop tick for the interactive board, in milliseconds.
pub const TICK_RATE_MS: u64 = 100;
/// How long success/info notifications stay on screen.
pub const NOTIFICATION_TTL_SECS: u64 = 5;
