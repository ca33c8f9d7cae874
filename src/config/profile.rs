//! Named configuration profiles
//!
//! A profile selects one extra `{name}.toml` layer, e.g. one profile per team
//! or per webhook: `hookcast --profile ops send "disk full"`.

use std::fmt;
use std::str::FromStr;

use crate::config::error::ConfigError;

/// Variable naming the profile when `--profile` is not given
pub const PROFILE_ENV_VAR: &str = "HOOKCAST_PROFILE";

/// File stems that already have a fixed place in the layering
const RESERVED: &[&str] = &["default", "local"];

/// Validated profile name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile(String);

impl Profile {
    /// # Errors
    /// `ValidationError` when the name is empty, reserved, or contains
    /// anything other than ASCII letters, digits, `-` and `_`.
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        let name = name.trim();
        let well_formed = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !well_formed {
            return Err(ConfigError::validation(
                "profile".to_string(),
                format!("'{name}' is not a valid profile name; use letters, digits, '-' or '_'"),
            ));
        }
        if RESERVED.contains(&name) {
            return Err(ConfigError::validation(
                "profile".to_string(),
                format!("'{name}' is reserved for {name}.toml"),
            ));
        }

        Ok(Self(name.to_string()))
    }

    /// Profile named by `HOOKCAST_PROFILE`; unset or empty means none
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        match std::env::var(PROFILE_ENV_VAR) {
            Ok(name) if !name.trim().is_empty() => Self::new(&name).map(Some),
            _ => Ok(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Layer file loaded for this profile
    pub fn file_name(&self) -> String {
        format!("{}.toml", self.0)
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["ops", "team-billing", "ci_nightly", " prod2 "] {
            let profile = Profile::new(name).unwrap();
            assert_eq!(profile.name(), name.trim());
        }
        assert_eq!(Profile::new("ops").unwrap().file_name(), "ops.toml");
    }

    #[test]
    fn test_rejected_names() {
        for name in ["", "  ", "../etc", "a/b", "team ops", "default", "local"] {
            assert!(
                matches!(Profile::new(name), Err(ConfigError::ValidationError { .. })),
                "{name:?} should be rejected"
            );
        }
    }
}
