//! Optional progress reporting for display purposes.
//!
//! Pipeline stages report human-readable status lines through a
//! [`StatusReporter`]. Every line is logged; if an observer is attached it
//! also receives the line. Nothing in the pipeline depends on whether an
//! observer is present.

use std::fmt;
use std::sync::Arc;

use tracing::info;

/// Receives status lines such as "Searching documents..." for UI display.
pub trait StatusObserver: Send + Sync {
    fn on_status(&self, message: &str);
}

impl<F> StatusObserver for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_status(&self, message: &str) {
        self(message)
    }
}

/// Forwards status lines to an optional [`StatusObserver`].
#[derive(Clone, Default)]
pub struct StatusReporter {
    observer: Option<Arc<dyn StatusObserver>>,
}

impl StatusReporter {
    pub fn new(observer: Arc<dyn StatusObserver>) -> Self {
        Self { observer: Some(observer) }
    }

    /// A reporter that only logs.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn report(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        info!(status = message, "pipeline status");
        if let Some(observer) = &self.observer {
            observer.on_status(message);
        }
    }
}

impl fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusReporter").field("observer", &self.observer.is_some()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn forwards_to_closure_observer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let reporter = StatusReporter::new(Arc::new(move |message: &str| {
            sink.lock().unwrap().push(message.to_string());
        }));

        reporter.report("Loading vector store");
        reporter.report(format!("Found {} chunks", 3));

        assert_eq!(*seen.lock().unwrap(), vec!["Loading vector store", "Found 3 chunks"]);
    }

    #[test]
    fn silent_reporter_does_nothing_observable() {
        StatusReporter::silent().report("ignored");
    }
}
