use std::fmt;

use super::slot::{ResourceKind, SlotState};

/// Acquisition failure returned by `Sequencer::initialize`.
///
/// By the time this value is observed every slot acquired before `stage` has
/// already been torn down; `slot_states` records the final table.
#[derive(Debug)]
pub struct InitError {
    pub stage: ResourceKind,
    pub cause: anyhow::Error,
    /// Teardown failures hit while rolling back earlier slots.
    pub rollback_errors: Vec<ShutdownError>,
    pub slot_states: Vec<(ResourceKind, SlotState)>,
}

impl InitError {
    pub(crate) fn new(stage: ResourceKind, cause: anyhow::Error) -> Self {
        Self {
            stage,
            cause,
            rollback_errors: Vec::new(),
            slot_states: Vec::new(),
        }
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to initialize {}: {:#}", self.stage, self.cause)
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause.as_ref())
    }
}

/// A teardown step that failed. Collected, never propagated.
#[derive(Debug)]
pub struct ShutdownError {
    pub stage: ResourceKind,
    pub cause: anyhow::Error,
}

impl fmt::Display for ShutdownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to tear down {}: {:#}", self.stage, self.cause)
    }
}

impl std::error::Error for ShutdownError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause.as_ref())
    }
}

/// Outcome of a shutdown pass.
#[derive(Debug, Default)]
pub struct ShutdownReport {
    /// Slots released during this pass, in release order.
    pub released: Vec<ResourceKind>,
    pub errors: Vec<ShutdownError>,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Emits every collected failure as a warning.
    pub fn log(&self) {
        for err in &self.errors {
            log::warn!("{err}");
        }
    }
}
