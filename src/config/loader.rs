//! Layered configuration loading for hookcast

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};

use crate::config::error::ConfigError;
use crate::config::profile::Profile;
use crate::config::settings::Settings;

/// Directory holding the layered files
const CONFIG_DIR_ENV: &str = "HOOKCAST_CONFIG_DIR";

/// Single file replacing the layered directory
const CONFIG_FILE_ENV: &str = "HOOKCAST_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

/// `HOOKCAST_DELIVERY__STRATEGY` maps to `delivery.strategy`
const ENV_PREFIX: &str = "HOOKCAST";
const ENV_SEPARATOR: &str = "__";

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

/// Where the file layers come from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    /// `default.toml`, `{profile}.toml`, `local.toml`, all optional
    Directory(PathBuf),
    /// One file that must exist
    File(PathBuf),
}

/// Loads [`Settings`] from files and `HOOKCAST_*` variables
///
/// Layers, lowest priority first:
/// 1. built-in defaults of [`Settings`]
/// 2. `default.toml`
/// 3. `{profile}.toml` when a [`Profile`] is selected
/// 4. `local.toml`
/// 5. `HOOKCAST_*` environment variables
///
/// In single file mode the file replaces layers 2 to 4.
#[derive(Debug)]
pub struct ConfigLoader {
    source: Source,
    profile: Option<Profile>,
}

impl ConfigLoader {
    /// Loader configured from `HOOKCAST_CONFIG_DIR`, `HOOKCAST_CONFIG_FILE`
    /// and `HOOKCAST_PROFILE`
    ///
    /// # Errors
    /// `MutualExclusivityError` when both the directory and the file variable
    /// are set; `ValidationError` for a malformed profile name.
    pub fn new() -> Result<Self, ConfigError> {
        let dir = std::env::var_os(CONFIG_DIR_ENV);
        let file = std::env::var_os(CONFIG_FILE_ENV);

        let source = match (dir, file) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::mutual_exclusivity(format!(
                    "{CONFIG_DIR_ENV} and {CONFIG_FILE_ENV} cannot both be set; \
                     pick a layered directory or a single file"
                )));
            }
            (_, Some(file)) => Source::File(file.into()),
            (Some(dir), None) => Source::Directory(dir.into()),
            (None, None) => Source::Directory(PathBuf::from(DEFAULT_CONFIG_DIR)),
        };

        Ok(Self {
            source,
            profile: Profile::from_env()?,
        })
    }

    /// Loader reading a single file plus environment variables
    pub fn with_config_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
            profile: None,
        }
    }

    /// Selects the `{profile}.toml` layer, replacing `HOOKCAST_PROFILE`
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Load, deserialize and validate the settings
    ///
    /// # Errors
    /// `FileNotFound` for a missing single file, `ParseError` for malformed
    /// input, `ValidationError` for values outside their allowed range.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let builder = match self.source {
            Source::File(ref file) => {
                if !file.is_file() {
                    return Err(ConfigError::file_not_found(format!(
                        "Required configuration file not found: {}",
                        file.display()
                    )));
                }
                with_toml(Config::builder(), file, true)?
            }
            Source::Directory(ref dir) => self.directory_layers(Config::builder(), dir)?,
        };

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize configuration: {e}")))?;

        settings.validate()?;
        Ok(settings)
    }

    fn directory_layers(&self, builder: Builder, dir: &Path) -> Result<Builder, ConfigError> {
        let mut builder = with_toml(builder, &dir.join("default.toml"), false)?;
        if let Some(ref profile) = self.profile {
            builder = with_toml(builder, &dir.join(profile.file_name()), false)?;
        }
        with_toml(builder, &dir.join("local.toml"), false)
    }
}

fn with_toml(builder: Builder, path: &Path, required: bool) -> Result<Builder, ConfigError> {
    let name = path.to_str().ok_or_else(|| {
        ConfigError::ParseError(format!(
            "Configuration path is not valid UTF-8: {}",
            path.display()
        ))
    })?;
    Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Global mutex to ensure tests run sequentially to avoid env var conflicts
    pub(crate) static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const HOOKCAST_VARS: &[&str] = &[
        "HOOKCAST_CONFIG_DIR",
        "HOOKCAST_CONFIG_FILE",
        "HOOKCAST_PROFILE",
        "HOOKCAST_WEBHOOK__URL",
        "HOOKCAST_DELIVERY__STRATEGY",
        "HOOKCAST_DELIVERY__TIMEOUT_SECONDS",
        "HOOKCAST_WEBHOOK__DEFAULTS__USERNAME",
    ];

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Sets environment variables for one test and restores them on drop
    pub(crate) struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        /// Guard that starts with every `HOOKCAST_*` variable used here cleared
        pub(crate) fn clean() -> Self {
            let mut guard = Self {
                vars_to_restore: Vec::new(),
            };
            for var in HOOKCAST_VARS {
                guard.remove(var);
            }
            guard
        }

        pub(crate) fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        pub(crate) fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // Restore in reverse so the earliest saved value wins
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    const DEFAULT_TOML: &str = r#"
[webhook]
url = "https://hooks.slack.com/services/T000/B000/DEFAULT"

[webhook.defaults]
username = "default-bot"

[delivery]
strategy = "auto"
timeout_seconds = 30
"#;

    #[test]
    fn test_config_loader_new_default() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.source, Source::Directory(PathBuf::from("config")));
        assert!(loader.profile().is_none());
    }

    #[test]
    fn test_config_loader_rejects_bad_profile_variable() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        env.set("HOOKCAST_PROFILE", "../secrets");

        assert!(matches!(
            ConfigLoader::new(),
            Err(ConfigError::ValidationError { field, .. }) if field == "profile"
        ));
    }

    #[test]
    fn test_config_loader_mutual_exclusivity_error() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        env.set("HOOKCAST_CONFIG_DIR", "/custom/config");
        env.set("HOOKCAST_CONFIG_FILE", "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains("HOOKCAST_CONFIG_DIR"));
                assert!(msg.contains("HOOKCAST_CONFIG_FILE"));
            }
            other => panic!("Expected MutualExclusivityError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_without_any_files_uses_defaults() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[]);
        env.set("HOOKCAST_CONFIG_DIR", temp_dir.path().to_str().unwrap());

        let settings = ConfigLoader::new().unwrap().load().expect("Should load defaults");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[]);

        let result = ConfigLoader::with_config_file(temp_dir.path().join("missing.toml")).load();
        match result {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("missing.toml")),
            other => panic!("Expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_full_precedence_chain() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        let ops_config = r#"
[webhook]
url = "https://hooks.slack.com/services/T000/B000/PROD"

[delivery]
timeout_seconds = 5
"#;
        let local_config = r#"
[delivery]
strategy = "binary"
"#;

        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("ops.toml", ops_config),
            ("local.toml", local_config),
        ]);

        env.set("HOOKCAST_CONFIG_DIR", temp_dir.path().to_str().unwrap());
        env.set("HOOKCAST_PROFILE", "ops");
        env.set("HOOKCAST_DELIVERY__TIMEOUT_SECONDS", "7");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        // ops.toml overrides default.toml
        assert_eq!(
            settings.webhook.url,
            "https://hooks.slack.com/services/T000/B000/PROD"
        );
        // local.toml overrides default.toml
        assert_eq!(settings.delivery.strategy, "binary");
        // environment variable has highest priority
        assert_eq!(settings.delivery.timeout_seconds, 7);
        // untouched values come from default.toml
        assert_eq!(settings.webhook.defaults["username"], "default-bot");
    }

    #[test]
    fn test_env_var_overrides_nested_default_field() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);

        env.set("HOOKCAST_CONFIG_DIR", temp_dir.path().to_str().unwrap());
        env.set("HOOKCAST_WEBHOOK__DEFAULTS__USERNAME", "env-bot");

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.webhook.defaults["username"], "env-bot");
    }

    #[test]
    fn test_load_single_file_mode_skips_layers() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let single_config = r#"
[webhook]
url = "https://hooks.slack.com/services/T000/B000/SINGLE"

[delivery]
native_enabled = false
"#;
        let temp_dir = setup_config_dir(&[
            ("single.toml", single_config),
            ("default.toml", DEFAULT_TOML),
        ]);

        let settings = ConfigLoader::with_config_file(temp_dir.path().join("single.toml"))
            .load()
            .unwrap();

        assert_eq!(
            settings.webhook.url,
            "https://hooks.slack.com/services/T000/B000/SINGLE"
        );
        assert!(!settings.delivery.native_enabled);
        assert!(settings.webhook.defaults.is_empty());
    }

    #[test]
    fn test_invalid_settings_fail_validation() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);

        env.set("HOOKCAST_CONFIG_DIR", temp_dir.path().to_str().unwrap());
        env.set("HOOKCAST_DELIVERY__STRATEGY", "pigeon");

        match ConfigLoader::new().unwrap().load() {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "delivery.strategy")
            }
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }
}
