use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MediCloud";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when MEDICLOUD_LOG / RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "medicloud=info,tower_http=warn".to_string()
}

/// Get the application data directory.
/// `MEDICLOUD_DATA_DIR` if set, otherwise ~/MediCloud/ (user-visible).
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MEDICLOUD_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("MediCloud")
}

/// Path of the clinic database inside the data directory.
pub fn database_path() -> PathBuf {
    data_dir().join("clinic.db")
}

/// Address the API server binds to. `MEDICLOUD_BIND_IP` / `MEDICLOUD_PORT`.
pub fn bind_addr() -> (IpAddr, u16) {
    let ip = std::env::var("MEDICLOUD_BIND_IP")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
    let port = std::env::var("MEDICLOUD_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8420);
    (ip, port)
}

/// Emails granted the admin role at registration.
///
/// `MEDICLOUD_ADMIN_EMAILS` is a comma-separated allow-list keyed by
/// identity (email), never by display name.
pub fn admin_emails() -> Vec<String> {
    std::env::var("MEDICLOUD_ADMIN_EMAILS")
        .map(|s| parse_admin_emails(&s))
        .unwrap_or_default()
}

/// Parse a comma-separated allow-list into normalized (lowercase) emails.
pub fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_under_data_dir() {
        let db = database_path();
        assert!(db.starts_with(data_dir()));
        assert!(db.ends_with("clinic.db"));
    }

    #[test]
    fn app_name_is_medicloud() {
        assert_eq!(APP_NAME, "MediCloud");
    }

    #[test]
    fn parse_admin_emails_normalizes() {
        let list = parse_admin_emails(" Admin@Clinic.com ,dr.house@clinic.com,, ");
        assert_eq!(list, vec!["admin@clinic.com", "dr.house@clinic.com"]);
    }

    #[test]
    fn parse_admin_emails_empty_input() {
        assert!(parse_admin_emails("").is_empty());
        assert!(parse_admin_emails(" , ,").is_empty());
    }
}
