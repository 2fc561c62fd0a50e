use std::{collections::HashMap, fs, path::Path};

use tracing::warn;
use url::Url;

use crate::{error::SettingsError, workflow::StalePolicy};

pub const SETTINGS_FILE: &str = "dsolve.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub solve_path: String,
    pub stale_policy: StalePolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            solve_path: "/solve".into(),
            stale_policy: StalePolicy::default(),
        }
    }
}

impl ClientSettings {
    /// `solve_path` is resolved below `server_url`, so a server mounted under
    /// a prefix keeps it.
    pub fn solve_endpoint(&self) -> Result<Url, SettingsError> {
        let invalid = |source| SettingsError::InvalidServerUrl {
            url: self.server_url.clone(),
            source,
        };
        let mut base = Url::parse(self.server_url.trim()).map_err(invalid)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(self.solve_path.trim_start_matches('/'))
            .map_err(invalid)
    }
}

/// Defaults, then `dsolve.toml` in the working directory, then environment.
pub fn load_settings() -> Result<ClientSettings, SettingsError> {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, SettingsError> {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("server_url") {
                    settings.server_url = v.clone();
                }
                if let Some(v) = file_cfg.get("solve_path") {
                    settings.solve_path = v.clone();
                }
                if let Some(v) = file_cfg.get("stale_policy") {
                    settings.stale_policy = v.parse()?;
                }
            }
            Err(err) => warn!("ignoring unreadable settings file '{}': {err}", path.display()),
        }
    }

    if let Some(v) = env("DSOLVE_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SOLVE_PATH") {
        settings.solve_path = v;
    }
    if let Some(v) = env("APP__STALE_POLICY") {
        settings.stale_policy = v.parse()?;
    }

    settings.solve_endpoint()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn temp_settings_file(contents: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("dsolve_settings_test_{suffix}"));
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join(SETTINGS_FILE);
        fs::write(&path, contents).expect("write settings");
        path
    }

    #[test]
    fn defaults_point_at_local_solver() {
        let settings =
            load_settings_from(Path::new("does/not/exist.toml"), no_env).expect("settings");
        assert_eq!(settings, ClientSettings::default());
        assert_eq!(
            settings.solve_endpoint().expect("endpoint").as_str(),
            "http://127.0.0.1:5000/solve"
        );
    }

    #[test]
    fn file_values_then_env_overrides() {
        let path = temp_settings_file(
            "server_url = \"http://solver.internal:8080\"\nstale_policy = \"last_arrival\"\n",
        );
        let settings = load_settings_from(&path, |name| {
            (name == "APP__SOLVE_PATH").then(|| "/api/solve".to_string())
        })
        .expect("settings");

        assert_eq!(settings.server_url, "http://solver.internal:8080");
        assert_eq!(settings.stale_policy, StalePolicy::LastArrival);
        assert_eq!(
            settings.solve_endpoint().expect("endpoint").as_str(),
            "http://solver.internal:8080/api/solve"
        );
        fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
    }

    #[test]
    fn keeps_server_path_prefix() {
        let settings = ClientSettings {
            server_url: "https://example.org/ode".into(),
            ..ClientSettings::default()
        };
        assert_eq!(
            settings.solve_endpoint().expect("endpoint").as_str(),
            "https://example.org/ode/solve"
        );
    }

    #[test]
    fn rejects_unparsable_server_url() {
        let result = load_settings_from(Path::new("does/not/exist.toml"), |name| {
            (name == "APP__SERVER_URL").then(|| "not a url".to_string())
        });
        assert!(matches!(
            result,
            Err(SettingsError::InvalidServerUrl { .. })
        ));
    }

    #[test]
    fn rejects_unknown_stale_policy() {
        let result = load_settings_from(Path::new("does/not/exist.toml"), |name| {
            (name == "APP__STALE_POLICY").then(|| "random".to_string())
        });
        assert!(matches!(result, Err(SettingsError::InvalidStalePolicy(_))));
    }
}
