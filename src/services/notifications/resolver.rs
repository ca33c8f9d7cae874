//! Delivery strategy selection.
//!
//! A [`DeliveryResolver`] holds an ordered list of [`DeliveryProbe`]s. The
//! first probe that yields a delivery wins and the choice is kept for the
//! lifetime of the resolver. An override replaces the choice at any time.

use super::binary_delivery::BinaryShimDelivery;
use super::delivery::Delivery;
use super::locator::BinaryLocator;
use super::native_delivery::NativeHttpDelivery;
use crate::config::DeliverySettings;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, LazyLock, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Prefix of a strategy name that points at a custom executable
pub const COMMAND_STRATEGY_PREFIX: &str = "command:";

/// Process-wide resolver used by notifiers that were not given one
static GLOBAL_RESOLVER: LazyLock<Arc<DeliveryResolver>> =
    LazyLock::new(|| Arc::new(DeliveryResolver::new(DeliverySettings::default())));

/// Capability check that may produce a delivery
#[async_trait]
pub trait DeliveryProbe: Send + Sync {
    /// Returns a delivery if the capability is available
    async fn probe(&self) -> AppResult<Option<Arc<dyn Delivery>>>;

    fn name(&self) -> &'static str;
}

/// Native HTTP is available whenever it is enabled in settings
pub struct NativeHttpProbe {
    settings: DeliverySettings,
}

impl NativeHttpProbe {
    pub fn new(settings: DeliverySettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl DeliveryProbe for NativeHttpProbe {
    async fn probe(&self) -> AppResult<Option<Arc<dyn Delivery>>> {
        if !self.settings.native_enabled {
            return Ok(None);
        }
        Ok(Some(Arc::new(NativeHttpDelivery::from_settings(
            &self.settings,
        )?)))
    }

    fn name(&self) -> &'static str {
        "native"
    }
}

/// Binary delivery is available when the locator finds the executable
pub struct BinaryProbe {
    locator: Arc<BinaryLocator>,
}

impl BinaryProbe {
    pub fn new(locator: Arc<BinaryLocator>) -> Self {
        Self { locator }
    }
}

#[async_trait]
impl DeliveryProbe for BinaryProbe {
    async fn probe(&self) -> AppResult<Option<Arc<dyn Delivery>>> {
        Ok(self
            .locator
            .locate()
            .await
            .map(|path| Arc::new(BinaryShimDelivery::new(path)) as Arc<dyn Delivery>))
    }

    fn name(&self) -> &'static str {
        "binary"
    }
}

/// Chooses and caches the delivery strategy
pub struct DeliveryResolver {
    settings: DeliverySettings,
    locator: Arc<BinaryLocator>,
    probes: Vec<Box<dyn DeliveryProbe>>,
    selected: RwLock<Option<Arc<dyn Delivery>>>,
    resolving: Mutex<()>,
}

impl DeliveryResolver {
    /// Resolver probing native HTTP first, then the external binary
    pub fn new(settings: DeliverySettings) -> Self {
        let locator = Arc::new(BinaryLocator::from_settings(&settings));
        let probes: Vec<Box<dyn DeliveryProbe>> = vec![
            Box::new(NativeHttpProbe::new(settings.clone())),
            Box::new(BinaryProbe::new(locator.clone())),
        ];
        Self::with_probes(settings, locator, probes)
    }

    /// Resolver with an explicit probe order
    pub fn with_probes(
        settings: DeliverySettings,
        locator: Arc<BinaryLocator>,
        probes: Vec<Box<dyn DeliveryProbe>>,
    ) -> Self {
        Self {
            settings,
            locator,
            probes,
            selected: RwLock::new(None),
            resolving: Mutex::new(()),
        }
    }

    /// Resolver honouring `settings.strategy`
    ///
    /// `auto` leaves selection to the probes; any other name is applied as an
    /// override right away so a bad name fails before anything is sent.
    pub async fn from_settings(settings: DeliverySettings) -> AppResult<Self> {
        let strategy = settings.strategy.clone();
        let resolver = Self::new(settings);
        resolver.set_override_by_name(&strategy).await?;
        Ok(resolver)
    }

    /// Shared resolver built from default delivery settings
    pub fn global() -> Arc<DeliveryResolver> {
        GLOBAL_RESOLVER.clone()
    }

    pub fn locator(&self) -> &Arc<BinaryLocator> {
        &self.locator
    }

    /// Name of the currently selected strategy, if any
    pub fn selected_name(&self) -> Option<&'static str> {
        self.current().map(|delivery| delivery.name())
    }

    /// Replaces the delivery strategy used by subsequent posts
    pub fn set_override(&self, delivery: Arc<dyn Delivery>) {
        info!(strategy = delivery.name(), "Delivery strategy overridden");
        *self.selected.write().unwrap_or_else(|e| e.into_inner()) = Some(delivery);
    }

    /// Drops the current choice so the next post probes again
    pub fn clear(&self) {
        *self.selected.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Selects a strategy by name
    ///
    /// Accepted names:
    /// - `auto`: forget any choice and probe on next use
    /// - `native`: in-process HTTP client
    /// - `binary` / `curl`: located external binary
    /// - `command:<path>`: a specific executable used like curl
    ///
    /// # Errors
    /// `InvalidCallback` when the name is unknown or does not lead to
    /// something that can be invoked.
    pub async fn set_override_by_name(&self, name: &str) -> AppResult<()> {
        let name = name.trim();
        let delivery: Arc<dyn Delivery> = match name {
            "auto" => {
                self.clear();
                return Ok(());
            }
            "native" => Arc::new(NativeHttpDelivery::from_settings(&self.settings)?),
            "binary" | "curl" => match self.locator.locate().await {
                Some(path) => Arc::new(BinaryShimDelivery::new(path)),
                None => {
                    return Err(AppError::invalid_callback(
                        name,
                        format!("'{}' was not found on the search path", self.locator.binary_name()),
                    ));
                }
            },
            _ => match name.strip_prefix(COMMAND_STRATEGY_PREFIX) {
                Some(command) => Arc::new(BinaryShimDelivery::new(executable_path(name, command)?)),
                None => {
                    return Err(AppError::invalid_callback(
                        name,
                        "expected one of: auto, native, binary, curl, command:<path>",
                    ));
                }
            },
        };

        self.set_override(delivery);
        Ok(())
    }

    /// Returns the delivery strategy, probing on first use
    ///
    /// # Errors
    /// `NoDeliveryMechanism` when no probe succeeds and nothing was set.
    pub async fn resolve(&self) -> AppResult<Arc<dyn Delivery>> {
        if let Some(delivery) = self.current() {
            return Ok(delivery);
        }

        let _guard = self.resolving.lock().await;
        // Another task may have finished resolving while we waited
        if let Some(delivery) = self.current() {
            return Ok(delivery);
        }

        for probe in &self.probes {
            debug!(probe = probe.name(), "Probing delivery capability");
            if let Some(delivery) = probe.probe().await? {
                info!(strategy = delivery.name(), "Selected delivery strategy");
                *self.selected.write().unwrap_or_else(|e| e.into_inner()) = Some(delivery.clone());
                return Ok(delivery);
            }
        }

        Err(AppError::NoDeliveryMechanism)
    }

    fn current(&self) -> Option<Arc<dyn Delivery>> {
        self.selected
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Resolves a user-supplied command to an executable path
fn executable_path(name: &str, command: &str) -> AppResult<std::path::PathBuf> {
    let command = command.trim();
    if command.is_empty() {
        return Err(AppError::invalid_callback(name, "command path is empty"));
    }

    let path = Path::new(command);
    if path.components().count() > 1 && !path.is_file() {
        return Err(AppError::invalid_callback(name, "no such file"));
    }

    which::which(command).map_err(|e| AppError::invalid_callback(name, e.to_string()))
}
