//! Diagnostics sink injected into assembly and solve entry points.
//!
//! Library code never reaches for a global logger. It reports through a
//! [`Diagnostics`] handle, which by default forwards to `tracing`.

use std::cell::RefCell;

pub use tracing::Level;

pub trait Diagnostics {
  fn record(&self, level: Level, message: &str);

  fn info(&self, message: &str) {
    self.record(Level::INFO, message);
  }
  fn debug(&self, message: &str) {
    self.record(Level::DEBUG, message);
  }
  fn warn(&self, message: &str) {
    self.record(Level::WARN, message);
  }
  fn error(&self, message: &str) {
    self.record(Level::ERROR, message);
  }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
  fn record(&self, level: Level, message: &str) {
    (**self).record(level, message);
  }
}

/// Forwards every record to the `tracing` subscriber of the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;
impl Diagnostics for TracingSink {
  fn record(&self, level: Level, message: &str) {
    match level {
      Level::ERROR => tracing::error!("{message}"),
      Level::WARN => tracing::warn!("{message}"),
      Level::INFO => tracing::info!("{message}"),
      Level::DEBUG => tracing::debug!("{message}"),
      _ => tracing::trace!("{message}"),
    }
  }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;
impl Diagnostics for NoopSink {
  fn record(&self, _level: Level, _message: &str) {}
}

/// Keeps every record in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
  records: RefCell<Vec<(Level, String)>>,
}
impl RecordingSink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn records(&self) -> Vec<(Level, String)> {
    self.records.borrow().clone()
  }

  pub fn contains(&self, level: Level, needle: &str) -> bool {
    self
      .records
      .borrow()
      .iter()
      .any(|(l, m)| *l == level && m.contains(needle))
  }
}
impl Diagnostics for RecordingSink {
  fn record(&self, level: Level, message: &str) {
    self.records.borrow_mut().push((level, message.to_owned()));
  }
}

#[cfg(test)]
mod test {
  use super::{Diagnostics, Level, NoopSink, RecordingSink};

  #[test]
  fn recording_sink_keeps_order() {
    let sink = RecordingSink::new();
    sink.info("first");
    sink.warn("second");
    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], (Level::INFO, "first".to_owned()));
    assert!(sink.contains(Level::WARN, "sec"));
    assert!(!sink.contains(Level::INFO, "second"));
  }

  #[test]
  fn sinks_work_through_references() {
    let sink = RecordingSink::new();
    let dyn_sink: &dyn Diagnostics = &sink;
    dyn_sink.error("boom");
    NoopSink.error("ignored");
    assert!(sink.contains(Level::ERROR, "boom"));
  }
}
