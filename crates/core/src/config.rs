use serde::Deserialize;
use url::Url;

/// Path of the release callback below the plugin's route prefix.
pub const RELEASE_PATH: &str = "/api/release";

/// Host configuration the plugin depends on.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Public base URL of the host. Release controls call back below it.
    pub site_url: Url,
}

impl ServerConfig {
    /// Creates a config for `site_url`.
    #[must_use]
    pub const fn new(site_url: Url) -> Self {
        Self { site_url }
    }

    /// URL the host calls when a release control is invoked.
    #[must_use]
    pub fn release_url(&self, plugin_id: &str) -> String {
        format!(
            "{}{}",
            self.site_url.as_str().trim_end_matches('/'),
            route_path(plugin_id)
        )
    }
}

/// Route serving the release callback for `plugin_id`.
pub(crate) fn route_path(plugin_id: &str) -> String {
    format!("/plugins/{plugin_id}{RELEASE_PATH}")
}
