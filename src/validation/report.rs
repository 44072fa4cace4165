//! Append-only diagnostic collection for one validation pass.
//!
//! Workers append individual messages keyed by class; the container merges them at
//! finalization into one newline-joined entry per offending class. The backing store
//! is a `boxcar::Vec`, so parallel per-class workers append lock-free and the
//! orchestrator stays free of synchronization code.
//!
//! Ordering is driven by the `order` rank the orchestrator assigns from the
//! universe's type registration order, not by append order, so parallel and
//! sequential runs finalize to byte-identical output.

/// One appended message, ranked for deterministic output.
#[derive(Debug, Clone)]
struct ReportEntry {
    /// Rank of the offending class in the universe's registration order
    order: usize,
    /// Fully-qualified class name, the diagnostic key
    class_name: String,
    /// A single human-readable error line
    message: String,
}

/// Thread-safe, append-only container for mapping diagnostics.
///
/// Messages for the same class never overwrite each other; they merge into one
/// entry at finalization. A report with zero entries means the whole universe
/// validated cleanly.
#[derive(Debug, Default)]
pub struct MappingReport {
    entries: boxcar::Vec<ReportEntry>,
}

impl MappingReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        MappingReport {
            entries: boxcar::Vec::new(),
        }
    }

    /// Appends one message for the class ranked `order`.
    pub fn append(&self, order: usize, class_name: impl Into<String>, message: impl Into<String>) {
        self.entries.push(ReportEntry {
            order,
            class_name: class_name.into(),
            message: message.into(),
        });
    }

    /// Returns true if no diagnostics have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.count() == 0
    }

    /// Returns the number of raw messages collected (before per-class merging).
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Merges the collected messages into the final ordered diagnostic list.
    ///
    /// Output is one `(class name, newline-joined messages)` pair per offending
    /// class, ordered by the class rank. Within one class, messages keep the order
    /// the worker produced them in; the stable sort preserves it because each class
    /// is handled by exactly one worker.
    #[must_use]
    pub fn finalize(&self) -> Vec<(String, String)> {
        let mut entries: Vec<&ReportEntry> = self.entries.iter().map(|(_, entry)| entry).collect();
        entries.sort_by_key(|entry| entry.order);

        let mut merged: Vec<(String, String)> = Vec::new();
        for entry in entries {
            match merged.last_mut() {
                Some((class_name, text)) if *class_name == entry.class_name => {
                    text.push('\n');
                    text.push_str(&entry.message);
                }
                _ => merged.push((entry.class_name.clone(), entry.message.clone())),
            }
        }

        merged
    }
}
