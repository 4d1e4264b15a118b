pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_DISPLAY_NAME: &str = "Family Member";
pub const TRANSCRIPT_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub default_server_url: String,
    pub log_filter: String,
    pub default_display_name: String,
    pub transcript_limit: usize,
    pub notice_timeout_ms: u32,
    pub pdf_render_scale: f64,
    pub build: BuildStamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStamp {
    pub hash: String,
    pub epoch: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_server_url: DEFAULT_SERVER_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            default_display_name: DEFAULT_DISPLAY_NAME.to_string(),
            transcript_limit: TRANSCRIPT_LIMIT,
            notice_timeout_ms: 4_000,
            pdf_render_scale: 1.5,
            build: BuildStamp::unknown(),
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with whatever was baked in at build time.
    pub fn load() -> Self {
        let mut cfg = Self::default();
        cfg.apply_overrides(
            option_env!("DINNER_OS_SERVER_URL"),
            option_env!("DINNER_OS_LOG"),
        );
        cfg.build = BuildStamp::capture();
        cfg
    }

    fn apply_overrides(&mut self, server_url: Option<&str>, log_filter: Option<&str>) {
        if let Some(url) = server_url.map(normalize_server_url).filter(|v| !v.is_empty()) {
            self.default_server_url = url;
        }
        if let Some(filter) = log_filter.map(str::trim).filter(|v| !v.is_empty()) {
            self.log_filter = filter.to_string();
        }
    }
}

impl BuildStamp {
    fn unknown() -> Self {
        Self {
            hash: "unknown".to_string(),
            epoch: 0,
        }
    }

    fn capture() -> Self {
        let hash = option_env!("BUILD_HASH")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("unknown")
            .to_string();
        let epoch = option_env!("BUILD_EPOCH")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);
        Self { hash, epoch }
    }
}

pub fn normalize_server_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

const AGE_UNITS: [(i64, &str); 3] = [(86_400, "d"), (3_600, "h"), (60, "m")];

/// Age of a build in its largest whole unit. A build stamped ahead of the
/// local clock reads as "in ...".
pub fn format_relative_age(epoch: i64, now: i64) -> String {
    if epoch <= 0 {
        return "unknown".to_string();
    }
    let elapsed = now - epoch;
    let seconds = elapsed.abs();
    let amount = AGE_UNITS
        .iter()
        .find(|(unit, _)| seconds >= *unit)
        .map(|(unit, label)| format!("{}{label}", seconds / unit));

    match amount {
        None => "just now".to_string(),
        Some(amount) if elapsed < 0 => format!("in {amount}"),
        Some(amount) => format!("{amount} ago"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_defaults_and_strip_trailing_slash() {
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(Some(" https://dinner.example:9000/ "), Some("debug"));
        assert_eq!(cfg.default_server_url, "https://dinner.example:9000");
        assert_eq!(cfg.log_filter, "debug");
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(Some("   "), Some(""));
        assert_eq!(cfg.default_server_url, DEFAULT_SERVER_URL);
        assert_eq!(cfg.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn relative_age_buckets() {
        let now = 1_770_000_000;
        assert_eq!(format_relative_age(0, now), "unknown");
        assert_eq!(format_relative_age(now - 30, now), "just now");
        assert_eq!(format_relative_age(now + 30, now), "just now");
        assert_eq!(format_relative_age(now - 300, now), "5m ago");
        assert_eq!(format_relative_age(now - 7_200, now), "2h ago");
        assert_eq!(format_relative_age(now - 3 * 86_400 - 5, now), "3d ago");
        assert_eq!(format_relative_age(now - 59 * 60, now), "59m ago");
        assert_eq!(format_relative_age(now + 120, now), "in 2m");
    }
}
