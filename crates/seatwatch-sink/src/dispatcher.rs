use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Local};
use tracing::debug;

use seatwatch_types::{no_changes_line, Change, SectionId};

use crate::error::{SinkError, SinkResult};
use crate::export::ExportSink;

/// Render one cycle's output lines.
///
/// One line per change, in section order then emission order; a single
/// "no changes" marker stamped `timestamp` when nothing changed.
pub fn cycle_lines(
    timestamp: &DateTime<Local>,
    changes: &BTreeMap<SectionId, Vec<Change>>,
) -> Vec<String> {
    let lines: Vec<String> = changes.values().flatten().map(Change::to_string).collect();
    if lines.is_empty() {
        vec![no_changes_line(timestamp)]
    } else {
        lines
    }
}

/// What a dispatch wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Lines written to the live output.
    pub printed: usize,
    /// Lines appended to the export destination.
    pub exported: usize,
}

#[derive(Clone, Copy, Debug, Default)]
struct Toggles {
    live_print: bool,
    export: bool,
}

/// Routes a completed cycle's changes to the live and export sinks.
///
/// Both sinks are independent toggles that may be flipped at any time from
/// any thread; each dispatch reads them once.
pub struct UpdateDispatcher {
    toggles: RwLock<Toggles>,
    destination: RwLock<Option<Arc<dyn ExportSink>>>,
    live: Mutex<Box<dyn Write + Send>>,
}

impl UpdateDispatcher {
    /// Dispatcher printing to stdout, with both sinks disabled.
    pub fn new() -> Self {
        Self::with_live_output(Box::new(io::stdout()))
    }

    /// Dispatcher printing to the given writer, with both sinks disabled.
    pub fn with_live_output(live: Box<dyn Write + Send>) -> Self {
        Self {
            toggles: RwLock::new(Toggles::default()),
            destination: RwLock::new(None),
            live: Mutex::new(live),
        }
    }

    pub fn enable_live_print(&self, enabled: bool) {
        self.toggles.write().expect("lock poisoned").live_print = enabled;
    }

    /// Toggle export. A missing destination is only reported at dispatch.
    pub fn enable_export(&self, enabled: bool) {
        self.toggles.write().expect("lock poisoned").export = enabled;
    }

    pub fn set_export_destination(&self, sink: Arc<dyn ExportSink>) {
        *self.destination.write().expect("lock poisoned") = Some(sink);
    }

    pub fn live_print_enabled(&self) -> bool {
        self.toggles.read().expect("lock poisoned").live_print
    }

    pub fn export_enabled(&self) -> bool {
        self.toggles.read().expect("lock poisoned").export
    }

    pub fn has_export_destination(&self) -> bool {
        self.destination.read().expect("lock poisoned").is_some()
    }

    /// Emit a cycle's changes to every enabled sink.
    ///
    /// Export enabled without a destination fails before anything is
    /// written. A write failure aborts the remainder of this dispatch only.
    pub fn dispatch(
        &self,
        timestamp: &DateTime<Local>,
        changes: &BTreeMap<SectionId, Vec<Change>>,
    ) -> SinkResult<DispatchSummary> {
        let toggles = *self.toggles.read().expect("lock poisoned");
        let mut summary = DispatchSummary::default();
        if !toggles.live_print && !toggles.export {
            return Ok(summary);
        }

        let destination = if toggles.export {
            let dest = self.destination.read().expect("lock poisoned").clone();
            Some(dest.ok_or(SinkError::MissingDestination)?)
        } else {
            None
        };

        let lines = cycle_lines(timestamp, changes);

        if toggles.live_print {
            let mut live = self.live.lock().expect("live output mutex poisoned");
            for line in &lines {
                writeln!(live, "{line}").map_err(SinkError::Live)?;
            }
            live.flush().map_err(SinkError::Live)?;
            summary.printed = lines.len();
        }

        if let Some(dest) = destination {
            for line in &lines {
                dest.append_line(line)?;
                summary.exported += 1;
            }
            debug!(destination = %dest.describe(), lines = summary.exported, "cycle exported");
        }

        Ok(summary)
    }
}

impl Default for UpdateDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UpdateDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let toggles = *self.toggles.read().expect("lock poisoned");
        f.debug_struct("UpdateDispatcher")
            .field("live_print", &toggles.live_print)
            .field("export", &toggles.export)
            .field("has_destination", &self.has_export_destination())
            .finish()
    }
}
