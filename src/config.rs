use std::env;

/// Runtime settings for talking to the offers API
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Path of the search page that owns the query string
    pub page_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".into(),
            request_timeout_secs: 30,
            page_path: "/".into(),
        }
    }
}

/// Defaults overridden by environment variables. Unparseable numbers are ignored.
pub fn load_settings() -> Settings {
    apply_overrides(Settings::default(), |key| env::var(key).ok())
}

fn apply_overrides(mut settings: Settings, var: impl Fn(&str) -> Option<String>) -> Settings {
    if let Some(v) = var("HOLIDAY_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = var("APP__API_URL") {
        settings.api_base_url = v;
    }

    for key in ["HOLIDAY_API_TIMEOUT_SECS", "APP__API_TIMEOUT_SECS"] {
        if let Some(parsed) = var(key).and_then(|v| v.trim().parse::<u64>().ok()) {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = var("HOLIDAY_PAGE_PATH") {
        settings.page_path = v;
    }

    settings
}
