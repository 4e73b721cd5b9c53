use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

/// Get the configuration directory path for lifeplan
/// If profile is Dev, uses "lifeplan-dev" instead of "lifeplan"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "lifeplan-dev",
        Profile::Prod => "lifeplan",
    };
    // Use "com" as qualifier for better cross-platform compatibility
    ProjectDirs::from("com", "lifeplan", app_name).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for lifeplan
/// If profile is Dev, uses "lifeplan-dev" instead of "lifeplan"
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "lifeplan-dev",
        Profile::Prod => "lifeplan",
    };
    ProjectDirs::from("com", "lifeplan", app_name).map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

/// Normalize a date or timestamp string to calendar-day granularity (YYYY-MM-DD).
/// Anything after the day component (a time-of-day suffix) is dropped, so a full
/// timestamp and its calendar day compare equal as keys.
pub fn normalize_day(input: &str) -> Result<String, chrono::ParseError> {
    let day = input.get(..10).unwrap_or(input);
    parse_date(day).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Get the current date as an ISO 8601 string (YYYY-MM-DD)
pub fn get_current_date_string() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Current instant as a UTC timestamp string, the format used for
/// created_at/updated_at stamps
pub fn now_stamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_days() {
        assert!(parse_date("2024-06-01").is_ok());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("junk").is_err());
    }

    #[test]
    fn normalize_day_strips_time_component() {
        assert_eq!(normalize_day("2024-06-01").unwrap(), "2024-06-01");
        assert_eq!(normalize_day("2024-06-01 13:45:00").unwrap(), "2024-06-01");
        assert_eq!(normalize_day("2024-06-01T13:45:00Z").unwrap(), "2024-06-01");
        assert!(normalize_day("not-a-date").is_err());
    }
}
