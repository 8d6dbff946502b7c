//! HandlerRegistry: `CommandId` to typed handler, built once at startup
//!
//! - Registration order preserved, duplicate ids rejected
//! - Handlers can be disabled without being removed
//! - Per-handler dispatch counters for the status/debug view

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::{
    error::{CoreError, CoreResult},
    model::command_palette::{Command, CommandId, CommandIndex},
};

/// Handler dispatch statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerStats {
    pub id: CommandId,
    pub is_enabled: bool,
    pub dispatch_count: u64,
}

/// Entry for each registered handler
struct HandlerEntry<H> {
    id: CommandId,
    handler: H,
    is_enabled: bool,
    dispatch_count: AtomicU64,
}

pub struct HandlerRegistry<H> {
    handlers: Vec<HandlerEntry<H>>,
}

impl<H> HandlerRegistry<H> {
    /// Create new empty handler registry
    #[must_use]
    pub const fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Build from `index`, asking `make` for each command's handler.
    /// Commands `make` declines stay unregistered.
    pub fn from_index<F>(index: &CommandIndex, mut make: F) -> Self
    where
        F: FnMut(&Command) -> Option<H>,
    {
        let handlers: Vec<HandlerEntry<H>> = index
            .all()
            .iter()
            .filter_map(|command| {
                make(command).map(|handler| HandlerEntry {
                    id: command.id,
                    handler,
                    is_enabled: true,
                    dispatch_count: AtomicU64::new(0),
                })
            })
            .collect();

        info!("HandlerRegistry initialized with {} of {} commands", handlers.len(), index.len());

        Self { handlers }
    }

    /// Register a single handler
    ///
    /// # Errors
    /// `InvalidInput` if `id` already has a handler.
    pub fn register(&mut self, id: CommandId, handler: H) -> CoreResult<()> {
        if self.entry(id).is_some() {
            return Err(CoreError::invalid_input("command_id", format!("handler already registered for {id}")));
        }

        self.handlers.push(HandlerEntry {
            id,
            handler,
            is_enabled: true,
            dispatch_count: AtomicU64::new(0),
        });

        debug!("Registered handler for {}", id);
        Ok(())
    }

    /// Handler for `id`.
    ///
    /// # Errors
    /// `InvalidInput` when `id` is unknown or its handler is disabled.
    pub fn resolve(&self, id: CommandId) -> CoreResult<&H> {
        let entry = self
            .entry(id)
            .ok_or_else(|| CoreError::invalid_input("command_id", format!("no handler for {id}")))?;

        if !entry.is_enabled {
            return Err(CoreError::invalid_input("command_id", format!("handler for {id} is disabled")));
        }

        entry.dispatch_count.fetch_add(1, Ordering::Relaxed);
        Ok(&entry.handler)
    }

    /// Commands of `index` that have no handler, in registration order.
    #[must_use]
    pub fn missing(&self, index: &CommandIndex) -> Vec<CommandId> {
        index
            .all()
            .iter()
            .map(|c| c.id)
            .filter(|id| self.entry(*id).is_none())
            .collect()
    }

    /// Enable/disable specific handler
    pub fn set_handler_enabled(&mut self, id: CommandId, enabled: bool) {
        if let Some(entry) = self.handlers.iter_mut().find(|e| e.id == id) {
            entry.is_enabled = enabled;

            info!("Handler {} {}", id, if enabled { "enabled" } else { "disabled" });
        }
    }

    /// Get dispatch report for all handlers
    #[must_use]
    pub fn get_performance_report(&self) -> Vec<HandlerStats> {
        self.handlers
            .iter()
            .map(|entry| HandlerStats {
                id: entry.id,
                is_enabled: entry.is_enabled,
                dispatch_count: entry.dispatch_count.load(Ordering::Relaxed),
            })
            .collect()
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn has_handlers(&self) -> bool {
        !self.handlers.is_empty()
    }

    fn entry(&self, id: CommandId) -> Option<&HandlerEntry<H>> {
        self.handlers.iter().find(|e| e.id == id)
    }
}

impl<H> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> std::fmt::Debug for HandlerRegistry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handler_count", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_are_invalid_input() {
        let registry: HandlerRegistry<u8> = HandlerRegistry::new();
        assert!(!registry.has_handlers());
        assert!(matches!(
            registry.resolve(CommandId::REFRESH),
            Err(CoreError::InvalidInput { .. })
        ));
    }

    #[test]
    fn from_index_skips_declined_commands() {
        let index = CommandIndex::builtin();
        let registry = HandlerRegistry::from_index(index, |c| (c.id != CommandId::GO_HOME).then_some(c.name.len()));

        assert_eq!(registry.handler_count(), index.len() - 1);
        assert_eq!(registry.missing(index), [CommandId::GO_HOME]);
        assert_eq!(registry.resolve(CommandId::REFRESH), Ok(&"Refresh".len()));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = HandlerRegistry::new();
        registry.register(CommandId::GO_UP, "first").unwrap();
        assert!(registry.register(CommandId::GO_UP, "second").is_err());
        assert_eq!(registry.resolve(CommandId::GO_UP), Ok(&"first"));
    }

    #[test]
    fn disabled_handlers_do_not_resolve_and_dispatch_is_counted() {
        let mut registry = HandlerRegistry::new();
        registry.register(CommandId::SWAP_PANES, ()).unwrap();

        registry.resolve(CommandId::SWAP_PANES).unwrap();
        registry.resolve(CommandId::SWAP_PANES).unwrap();
        registry.set_handler_enabled(CommandId::SWAP_PANES, false);
        assert!(registry.resolve(CommandId::SWAP_PANES).is_err());

        assert_eq!(
            registry.get_performance_report(),
            [HandlerStats {
                id: CommandId::SWAP_PANES,
                is_enabled: false,
                dispatch_count: 2,
            }]
        );
    }
}
