//! Lookup of the external HTTP client used by binary delivery.

use crate::config::DeliverySettings;
use regex::Regex;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::debug;

/// Directories searched when neither the application nor the system
/// search-path variable is set
pub const FALLBACK_SEARCH_DIRS: &[&str] = &[
    "/opt/local/bin",
    "/usr/local/bin",
    "/usr/bin",
    "/bin",
    "/usr/sbin",
    "/sbin",
];

/// System search-path variable
const SYSTEM_PATH_VAR: &str = "PATH";

/// Finds an executable by name and remembers the answer
///
/// Resolution order:
/// 1. every directory of the search path (application variable, then
///    `PATH`, then [`FALLBACK_SEARCH_DIRS`]), deduplicated, first hit wins;
/// 2. running `<name> -V` unqualified and matching the version banner.
///
/// The result, including "not found", is cached until [`reset`](Self::reset).
pub struct BinaryLocator {
    binary_name: String,
    search_path_var: String,
    fallback_dirs: Vec<PathBuf>,
    cached: Mutex<Option<Option<PathBuf>>>,
}

impl BinaryLocator {
    pub fn new(binary_name: impl Into<String>, search_path_var: impl Into<String>) -> Self {
        Self {
            binary_name: binary_name.into(),
            search_path_var: search_path_var.into(),
            fallback_dirs: FALLBACK_SEARCH_DIRS.iter().map(PathBuf::from).collect(),
            cached: Mutex::new(None),
        }
    }

    pub fn from_settings(settings: &DeliverySettings) -> Self {
        let mut locator = Self::new(&settings.binary_name, &settings.search_path_var);
        if !settings.fallback_dirs.is_empty() {
            locator.fallback_dirs = settings.fallback_dirs.iter().map(PathBuf::from).collect();
        }
        locator
    }

    pub fn binary_name(&self) -> &str {
        &self.binary_name
    }

    /// Returns the cached location, resolving it on first use
    pub async fn locate(&self) -> Option<PathBuf> {
        let mut cached = self.cached.lock().await;
        if let Some(found) = cached.as_ref() {
            return found.clone();
        }

        let found = self.resolve().await;
        *cached = Some(found.clone());
        found
    }

    /// Forgets the cached location
    pub async fn reset(&self) {
        *self.cached.lock().await = None;
    }

    async fn resolve(&self) -> Option<PathBuf> {
        let dirs = search_dirs(
            std::env::var_os(&self.search_path_var),
            std::env::var_os(SYSTEM_PATH_VAR),
            &self.fallback_dirs,
        );

        // which_in and canonicalize hit the filesystem; keep them off the runtime
        let name = self.binary_name.clone();
        let scan_dirs = dirs.clone();
        let found = tokio::task::spawn_blocking(move || find_in_dirs(&name, &scan_dirs))
            .await
            .unwrap_or_else(|e| {
                debug!(error = %e, "Search path scan did not complete");
                None
            });

        if let Some(path) = found {
            debug!(binary = %self.binary_name, path = %path.display(), "Found binary on search path");
            return Some(path);
        }

        if responds_to_version_query(&self.binary_name).await {
            debug!(binary = %self.binary_name, "Binary invocable without a path");
            return Some(PathBuf::from(&self.binary_name));
        }

        debug!(binary = %self.binary_name, searched = dirs.len(), "Binary not found");
        None
    }
}

/// Builds the ordered, deduplicated list of directories to search
///
/// The first non-empty source wins; entries keep their original order and
/// only the first occurrence of a repeated directory is kept.
pub fn search_dirs(
    app_path: Option<OsString>,
    system_path: Option<OsString>,
    fallback: &[PathBuf],
) -> Vec<PathBuf> {
    let candidates: Vec<PathBuf> = match app_path
        .filter(|p| !p.is_empty())
        .or(system_path.filter(|p| !p.is_empty()))
    {
        Some(raw) => std::env::split_paths(&raw).collect(),
        None => fallback.to_vec(),
    };

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|dir| !dir.as_os_str().is_empty())
        .filter(|dir| seen.insert(dir.clone()))
        .collect()
}

/// Returns the canonical path of the first executable `name` in `dirs`
pub fn find_in_dirs(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter().find_map(|dir| {
        let found = which::which_in(name, Some(dir.as_os_str()), dir).ok()?;
        Some(std::fs::canonicalize(&found).unwrap_or(found))
    })
}

/// Checks whether `name -V` prints a `<name> <major>...` banner
async fn responds_to_version_query(name: &str) -> bool {
    let Ok(output) = Command::new(name).arg("-V").output().await else {
        return false;
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first_line = stdout.lines().next().unwrap_or_default();
    version_banner_matches(name, first_line)
}

fn version_banner_matches(name: &str, line: &str) -> bool {
    let Some(stem) = Path::new(name).file_name().and_then(|s| s.to_str()) else {
        return false;
    };
    Regex::new(&format!(r"^{} \d+", regex::escape(stem)))
        .map(|re| re.is_match(line))
        .unwrap_or(false)
}
