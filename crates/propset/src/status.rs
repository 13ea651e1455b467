//! # Status reporting
//!
//! The binder never aborts a configuration pass on a bad property. Each failure is pushed to
//! a [`StatusSink`] as a [`Status`] and the pass continues.
//!
//! Two sinks are provided:
//! * [`StatusManager`] keeps every status in memory for later inspection.
//! * [`TracingSink`] only forwards statuses to `tracing`.
//!
//! Both emit each status as a `tracing` event under the `propset` target.

use parking_lot::RwLock;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Severity of a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// One diagnostic raised while configuring a target.
#[derive(Debug, Clone)]
pub struct Status {
    level: Level,
    origin: &'static str,
    message: String,
    cause: Option<Arc<dyn Error + Send + Sync>>,
}

impl Status {
    pub fn new(level: Level, origin: &'static str, message: impl Into<String>) -> Self {
        Self { level, origin, message: message.into(), cause: None }
    }

    pub fn info(origin: &'static str, message: impl Into<String>) -> Self {
        Self::new(Level::Info, origin, message)
    }

    pub fn warn(origin: &'static str, message: impl Into<String>) -> Self {
        Self::new(Level::Warn, origin, message)
    }

    pub fn error(origin: &'static str, message: impl Into<String>) -> Self {
        Self::new(Level::Error, origin, message)
    }

    /// Attaches the underlying error.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Type name of the target that raised the status.
    #[must_use]
    pub const fn origin(&self) -> &'static str {
        self.origin
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} in {}: {}", self.level, self.origin, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " caused by: {cause}")?;
        }
        Ok(())
    }
}

/// Receiver of binder diagnostics.
pub trait StatusSink {
    fn add_status(&self, status: Status);
}

fn emit(status: &Status) {
    let cause = status.cause.as_ref().map(tracing::field::display);
    match status.level {
        Level::Info => info!(target: "propset", origin = status.origin, cause, "{}", status.message),
        Level::Warn => warn!(target: "propset", origin = status.origin, cause, "{}", status.message),
        Level::Error => error!(target: "propset", origin = status.origin, cause, "{}", status.message),
    }
}

/// In-memory sink that records every status.
#[derive(Debug, Default)]
pub struct StatusManager {
    statuses: RwLock<Vec<Status>>,
}

impl StatusManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every recorded status, oldest first.
    #[must_use]
    pub fn statuses(&self) -> Vec<Status> {
        self.statuses.read().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statuses.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.read().is_empty()
    }

    /// Number of statuses at exactly `level`.
    #[must_use]
    pub fn count(&self, level: Level) -> usize {
        self.statuses.read().iter().filter(|status| status.level == level).count()
    }

    /// The most severe level recorded so far.
    #[must_use]
    pub fn highest_level(&self) -> Option<Level> {
        self.statuses.read().iter().map(Status::level).max()
    }

    pub fn clear(&self) {
        self.statuses.write().clear();
    }
}

impl StatusSink for StatusManager {
    fn add_status(&self, status: Status) {
        emit(&status);
        self.statuses.write().push(status);
    }
}

/// Sink that forwards statuses to `tracing` and keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn add_status(&self, status: Status) {
        emit(&status);
    }
}
