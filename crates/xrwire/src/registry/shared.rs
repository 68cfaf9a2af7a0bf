// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lock-free handle for a registry that may be reconfigured at runtime.

use super::{RegistryBuilder, SerializerRegistry};
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Registry shared across threads.
///
/// Readers take a snapshot with [`load`](Self::load) and keep using it for the
/// whole message; a concurrent [`replace`](Self::replace) never affects an
/// in-flight encode or decode.
pub struct SharedRegistry {
    inner: ArcSwap<SerializerRegistry>,
}

impl SharedRegistry {
    pub fn new(registry: SerializerRegistry) -> Self {
        Self {
            inner: ArcSwap::from_pointee(registry),
        }
    }

    /// Current registry snapshot.
    pub fn load(&self) -> Arc<SerializerRegistry> {
        self.inner.load_full()
    }

    /// Swap in a new registry; returns the previous one.
    pub fn replace(&self, registry: SerializerRegistry) -> Arc<SerializerRegistry> {
        let previous = self.inner.swap(Arc::new(registry));
        log::debug!(
            "[registry] replaced shared registry ({} modules)",
            self.inner.load().modules().count()
        );
        previous
    }

    /// Rebuild from the current registry, edited by `edit`.
    pub fn reconfigure<F>(&self, edit: F) -> Arc<SerializerRegistry>
    where
        F: FnOnce(RegistryBuilder) -> RegistryBuilder,
    {
        let builder = edit(self.inner.load().to_builder());
        self.replace(builder.build())
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new(SerializerRegistry::standard())
    }
}

impl std::fmt::Debug for SharedRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedRegistry")
            .field(&*self.inner.load())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;

    #[test]
    fn test_snapshot_survives_replace() {
        let shared = SharedRegistry::default();
        let before = shared.load();
        assert!(before.claims_type::<u64>());

        shared.replace(SerializerRegistry::builder().build());
        assert!(!shared.load().claims_type::<u64>());
        // old snapshot still usable
        assert_eq!(before.encode(&1u64).expect("old snapshot").len(), 8);
    }

    #[test]
    fn test_reconfigure_keeps_modules() {
        let shared = SharedRegistry::default();
        let modules = shared.load().modules().count();

        shared.reconfigure(|b| b.with_config(CodecConfig::default().with_max_depth(4)));
        let current = shared.load();
        assert_eq!(current.config().max_depth, 4);
        assert_eq!(current.modules().count(), modules);
    }
}
