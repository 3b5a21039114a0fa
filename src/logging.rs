//! Injected logging seam.
//!
//! Every pipeline stage that can emit a non-fatal warning takes a
//! [`CompareLogger`] instead of logging through a global. The default
//! [`TracingLogger`] forwards to the `tracing` facade; tests use
//! [`MemoryLogger`] to assert on what was emitted.

use std::sync::Mutex;

pub trait CompareLogger {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
}

/// Forwards to `tracing::info!` / `tracing::warn!`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl CompareLogger for TracingLogger {
    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }
}

/// Captures messages in memory for test assertions.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    infos: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().expect("logger poisoned").clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().expect("logger poisoned").clone()
    }
}

impl CompareLogger for MemoryLogger {
    fn info(&self, msg: &str) {
        self.infos.lock().expect("logger poisoned").push(msg.to_string());
    }

    fn warn(&self, msg: &str) {
        self.warnings
            .lock()
            .expect("logger poisoned")
            .push(msg.to_string());
    }
}
