use std::sync::OnceLock;

use learn_core::OnboardingConfig;

const ONBOARDING_TOML: &str = include_str!("../Onboarding.toml");

/// Backend the dev server talks to when the page is served from localhost.
const LOCAL_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub google_developer_key: String,
    pub google_app_id: String,
    pub onboarding: OnboardingConfig,
}

/// Pick the API base for a page hostname.
/// - `LEARN_API_BASE` set at build time wins
/// - In development (localhost): use http://localhost:8000
/// - In production: use same origin
pub fn api_base_for_host(hostname: &str, build_override: Option<&str>) -> String {
    if let Some(base) = build_override.map(str::trim).filter(|b| !b.is_empty()) {
        return base.trim_end_matches('/').to_string();
    }
    if hostname == "localhost" || hostname == "127.0.0.1" {
        LOCAL_API_BASE.to_string()
    } else {
        String::new()
    }
}

fn load_onboarding() -> OnboardingConfig {
    match OnboardingConfig::from_toml_str(ONBOARDING_TOML) {
        Ok(config) => config,
        Err(e) => {
            dioxus_logger::tracing::warn!("Invalid Onboarding.toml, using defaults: {}", e);
            OnboardingConfig::default()
        }
    }
}

fn build_config() -> AppConfig {
    let hostname = web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default();

    AppConfig {
        api_base: api_base_for_host(&hostname, option_env!("LEARN_API_BASE")),
        supabase_url: option_env!("LEARN_SUPABASE_URL")
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string(),
        supabase_anon_key: option_env!("LEARN_SUPABASE_ANON_KEY")
            .unwrap_or_default()
            .to_string(),
        google_developer_key: option_env!("LEARN_GOOGLE_DEVELOPER_KEY")
            .unwrap_or_default()
            .to_string(),
        google_app_id: option_env!("LEARN_GOOGLE_APP_ID")
            .unwrap_or_default()
            .to_string(),
        onboarding: load_onboarding(),
    }
}

/// Computed at first use
static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

pub fn app_config() -> &'static AppConfig {
    APP_CONFIG.get_or_init(build_config)
}

pub fn api_base() -> &'static str {
    app_config().api_base.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_points_at_dev_backend() {
        assert_eq!(api_base_for_host("localhost", None), LOCAL_API_BASE);
        assert_eq!(api_base_for_host("127.0.0.1", None), LOCAL_API_BASE);
        assert_eq!(api_base_for_host("learn.example.com", None), "");
    }

    #[test]
    fn build_override_wins() {
        assert_eq!(
            api_base_for_host("localhost", Some("https://api.example.com/")),
            "https://api.example.com"
        );
        assert_eq!(api_base_for_host("localhost", Some("  ")), LOCAL_API_BASE);
    }

    #[test]
    fn bundled_onboarding_config_parses() {
        let config = OnboardingConfig::from_toml_str(ONBOARDING_TOML).unwrap();
        assert_eq!(config.page_size, 8);
        assert_eq!(config.max_file_megabytes(), 100);
    }
}
