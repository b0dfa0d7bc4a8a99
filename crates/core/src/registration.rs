//! One-time registration of the search source with a host registry.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use serde::Serialize;
use tracing::{debug, info};

use crate::{config::SearchSettings, search::SearchProvider};

static SOURCE_REGISTRATION: RegistrationGuard = RegistrationGuard::new();

/// How a source presents itself to the host. Sources register without a
/// query prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDescriptor {
    /// Display name of the source.
    pub name: String,
    /// Priority among competing sources; higher wins.
    pub priority: i32,
}

impl From<&SearchSettings> for SourceDescriptor {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            name: settings.source_name.clone(),
            priority: settings.priority,
        }
    }
}

/// Host-side registry of search sources.
pub trait SourceRegistry {
    /// Add `provider` to the registry under `descriptor`.
    fn add_source(&mut self, descriptor: SourceDescriptor, provider: Arc<dyn SearchProvider>);
}

/// Idempotent registration flag.
#[derive(Debug, Default)]
pub struct RegistrationGuard {
    registered: AtomicBool,
}

impl RegistrationGuard {
    /// A guard that has not registered anything yet.
    pub const fn new() -> Self {
        Self {
            registered: AtomicBool::new(false),
        }
    }

    /// Whether a registration already went through this guard.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// Register `provider` unless this guard already did. Returns whether the
    /// provider was added.
    pub fn register(
        &self,
        registry: &mut dyn SourceRegistry,
        provider: Arc<dyn SearchProvider>,
    ) -> bool {
        if self
            .registered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("search source already registered, ignoring");
            return false;
        }

        let descriptor = provider.descriptor();
        info!(
            "registering search source '{}' with priority {}",
            descriptor.name, descriptor.priority
        );
        registry.add_source(descriptor, provider);
        true
    }
}

/// Register `provider` once for the lifetime of the process.
pub fn register_once(registry: &mut dyn SourceRegistry, provider: Arc<dyn SearchProvider>) -> bool {
    SOURCE_REGISTRATION.register(registry, provider)
}
