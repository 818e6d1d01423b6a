//! In-flight export flags.
//!
//! One flag per (kind, file name). A second request for an artifact that is still being
//! built is refused instead of queued. The flag is cleared when the guard drops, so a
//! failed export can be retried immediately.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::render::artifact::ExportKind;

type Key = (ExportKind, String);

#[derive(Clone, Default)]
pub struct ExportGate {
    in_flight: Arc<Mutex<HashSet<Key>>>,
}

impl ExportGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when the same artifact is already being built.
    pub fn try_acquire(&self, kind: ExportKind, file_name: &str) -> Option<ExportGuard> {
        let key = (kind, file_name.to_string());
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !in_flight.insert(key.clone()) {
            return None;
        }
        Some(ExportGuard {
            in_flight: Arc::clone(&self.in_flight),
            key,
        })
    }

    #[cfg(test)]
    pub fn is_busy(&self, kind: ExportKind, file_name: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&(kind, file_name.to_string()))
    }
}

pub struct ExportGuard {
    in_flight: Arc<Mutex<HashSet<Key>>>,
    key: Key,
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_refused_while_held() {
        let gate = ExportGate::new();
        let guard = gate.try_acquire(ExportKind::Pdf, "a.pdf");
        assert!(guard.is_some());
        assert!(gate.try_acquire(ExportKind::Pdf, "a.pdf").is_none());
        assert!(gate.is_busy(ExportKind::Pdf, "a.pdf"));
    }

    #[test]
    fn test_drop_releases_flag() {
        let gate = ExportGate::new();
        {
            let _guard = gate.try_acquire(ExportKind::Pdf, "a.pdf").unwrap();
        }
        assert!(!gate.is_busy(ExportKind::Pdf, "a.pdf"));
        assert!(gate.try_acquire(ExportKind::Pdf, "a.pdf").is_some());
    }

    #[test]
    fn test_kinds_and_names_are_independent() {
        let gate = ExportGate::new();
        let _pdf = gate.try_acquire(ExportKind::Pdf, "a").unwrap();
        assert!(gate.try_acquire(ExportKind::Pptx, "a").is_some());
        assert!(gate.try_acquire(ExportKind::Pdf, "b").is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let gate = ExportGate::new();
        let other = gate.clone();
        let _guard = gate.try_acquire(ExportKind::Pptx, "deck").unwrap();
        assert!(other.try_acquire(ExportKind::Pptx, "deck").is_none());
    }
}
