use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Calldeck";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Interval between active-record status polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(4);

/// Page sizes the table offers.
pub const PAGE_SIZE_CHOICES: [usize; 5] = [10, 20, 30, 40, 50];

/// Initial page size.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// In-flight cap for bulk per-record operations.
pub const BULK_CONCURRENCY: usize = 4;

/// Timeout for API requests, delegated to the HTTP client.
pub const API_TIMEOUT_SECS: u64 = 30;

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/Calldeck/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Calldeck")
}

/// File holding per-workflow column-visibility selections.
pub fn column_prefs_path() -> PathBuf {
    app_data_dir().join("column_prefs.json")
}
