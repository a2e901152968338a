//! Testing utilities
//!
//! A recording transport and a log capture for asserting on what the
//! sender did. Available to other crates with the `testing` feature.
//!
//! ```rust,ignore
//! use email_sender::testing::{LogCapture, RecordingTransport};
//!
//! let (logs, _guard) = LogCapture::start();
//! let transport = RecordingTransport::new();
//! // ... send through an EmailSender built on `transport` ...
//! assert_eq!(transport.sent_count(), 1);
//! assert_eq!(logs.at("ERROR").len(), 0);
//! ```

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use crate::email::{Email, EmailError, MailTransport};

/// Transport that records emails in memory
///
/// A failing transport counts attempts but records nothing.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<Email>>>,
    attempts: Arc<AtomicUsize>,
    failure: Option<String>,
}

impl RecordingTransport {
    /// Create a transport that accepts every valid email
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport whose every send fails with `message`
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Number of emails recorded
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// All recorded emails
    #[must_use]
    pub fn sent_emails(&self) -> Vec<Email> {
        self.sent.lock().clone()
    }

    /// The last recorded email
    #[must_use]
    pub fn last_sent(&self) -> Option<Email> {
        self.sent.lock().last().cloned()
    }

    /// Number of send calls, successful or not
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, email: &Email) -> Result<(), EmailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(EmailError::smtp(message.clone()));
        }

        email.validate()?;
        self.sent.lock().push(email.clone());
        Ok(())
    }
}

/// Captures formatted `tracing` output for the current thread
///
/// Lines look like `INFO Email sent to ...` (no timestamps or targets).
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Start capturing; events are captured until the guard is dropped
    #[must_use]
    pub fn start() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    /// All captured lines
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buffer.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Captured lines at `level` (`"INFO"`, `"WARN"`, `"ERROR"`, ...), without the level prefix
    #[must_use]
    pub fn at(&self, level: &str) -> Vec<String> {
        self.lines()
            .iter()
            .filter_map(|line| line.trim_start().strip_prefix(level))
            .map(|rest| rest.trim_start().to_string())
            .collect()
    }
}

/// Writer handed out by [`LogCapture`]
#[derive(Debug)]
pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter(Arc::clone(&self.buffer))
    }
}
