//! Thread-safe warning accumulator.
//!
//! Recoverable input problems (an unresolved net member, a malformed entity
//! line) are reported here and surfaced to the user after loading finishes,
//! rather than aborting the run.

use std::sync::Mutex;

/// A thread-safe accumulator for warnings emitted while loading input files.
///
/// Loading continues past anything reported here; the caller decides when
/// (and whether) to print the accumulated messages.
pub struct WarningSink {
    warnings: Mutex<Vec<String>>,
}

impl WarningSink {
    /// Creates a new empty warning sink.
    pub fn new() -> Self {
        Self {
            warnings: Mutex::new(Vec::new()),
        }
    }

    /// Emits a warning message into the sink.
    pub fn warn(&self, message: impl Into<String>) {
        let mut warnings = self.warnings.lock().unwrap();
        warnings.push(message.into());
    }

    /// Returns the number of warnings emitted so far.
    pub fn len(&self) -> usize {
        self.warnings.lock().unwrap().len()
    }

    /// Returns `true` if no warnings have been emitted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes all accumulated warnings, leaving the sink empty.
    pub fn take_all(&self) -> Vec<String> {
        let mut warnings = self.warnings.lock().unwrap();
        std::mem::take(&mut *warnings)
    }
}

impl Default for WarningSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sink() {
        let sink = WarningSink::new();
        assert!(sink.is_empty());
        assert_eq!(sink.len(), 0);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn warn_accumulates() {
        let sink = WarningSink::new();
        sink.warn("first");
        sink.warn(String::from("second"));
        assert_eq!(sink.len(), 2);
        assert!(!sink.is_empty());
    }

    #[test]
    fn take_all_drains() {
        let sink = WarningSink::new();
        sink.warn("a");
        let all = sink.take_all();
        assert_eq!(all, vec!["a".to_string()]);
        assert!(sink.is_empty());
    }

    #[test]
    fn thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(WarningSink::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let sink = Arc::clone(&sink);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    sink.warn("w");
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(sink.len(), 800);
    }
}
