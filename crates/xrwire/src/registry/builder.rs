// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry construction.

use super::{ModuleSlot, ResolvedClaim, SerializerRegistry};
use crate::config::CodecConfig;
use crate::module::{Claims, SerializationModule};
use std::collections::HashMap;
use std::sync::Arc;

/// Collects modules and configuration, then resolves claims once.
///
/// Modules are tried in ascending `priority`; equal priorities keep insertion order.
#[derive(Clone, Default)]
pub struct RegistryBuilder {
    config: CodecConfig,
    modules: Vec<(i32, Arc<dyn SerializationModule>)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn register_module<M: SerializationModule>(self, module: M, priority: i32) -> Self {
        self.register_shared(Arc::new(module), priority)
    }

    pub fn register_shared(mut self, module: Arc<dyn SerializationModule>, priority: i32) -> Self {
        self.modules.push((priority, module));
        self
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn build(self) -> SerializerRegistry {
        let mut modules = self.modules;
        // Stable: ties stay in insertion order.
        modules.sort_by_key(|(priority, _)| *priority);

        let mut claims: HashMap<_, Vec<ResolvedClaim>> = HashMap::new();
        let mut slots = Vec::with_capacity(modules.len());

        for (priority, module) in modules {
            let name = module.name();
            let mut collected = Claims::new(name);
            module.claim(&mut collected);

            let entries = collected.into_entries();
            log::debug!(
                "[registry] module '{}' (priority {}) claims {} types",
                name,
                priority,
                entries.len()
            );

            for entry in entries {
                let claimants = claims.entry(entry.type_id).or_default();
                if let Some(first) = claimants.first() {
                    log::debug!(
                        "[registry] {} already claimed by '{}'; '{}' is fallback #{}",
                        entry.type_name,
                        first.module,
                        name,
                        claimants.len()
                    );
                }
                claimants.push(ResolvedClaim {
                    module: name,
                    type_name: entry.type_name,
                    codec: entry.codec,
                });
            }

            slots.push(ModuleSlot {
                name,
                priority,
                module,
            });
        }

        log::debug!(
            "[registry] built: {} modules, {} types, protocol {}",
            slots.len(),
            claims.len(),
            self.config.protocol_version
        );

        SerializerRegistry {
            config: self.config,
            modules: slots,
            claims,
        }
    }
}
