use std::ffi::OsString;
use std::path::PathBuf;

/// Where the aggregated dataset lives unless told otherwise.
pub const DEFAULT_DATA_PATH: &str = "dashboard/all_data.csv";

/// Environment variable overriding [`DEFAULT_DATA_PATH`].
pub const DATA_PATH_ENV: &str = "BIKESHARE_DATA";

pub const WINDOW_SIZE: [f32; 2] = [1200.0, 860.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [640.0, 420.0];

/// Startup settings for the dashboard binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
}

impl DashboardConfig {
    /// First CLI argument, then `$BIKESHARE_DATA`, then the default path.
    pub fn from_env() -> Self {
        Self::resolve(std::env::args_os().nth(1), std::env::var_os(DATA_PATH_ENV))
    }

    fn resolve(arg: Option<OsString>, env: Option<OsString>) -> Self {
        let data_path = arg
            .or(env)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        DashboardConfig { data_path }
    }
}
