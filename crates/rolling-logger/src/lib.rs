//! Rolling Logger
//!
//! A `tracing` layer that keeps the most recent log lines in a circular
//! buffer and echoes each line to the browser console (stderr natively).

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// One captured log line
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>5} {}: {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Shared circular buffer of recent lines
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<LogLine>>>,
    capacity: Arc<AtomicUsize>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: Arc::new(AtomicUsize::new(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Relaxed)
    }

    /// Change the capacity of every handle to this buffer, dropping the
    /// oldest lines if it shrinks
    pub fn resize(&self, capacity: usize) {
        let capacity = capacity.max(1);
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        self.capacity.store(capacity, Ordering::Relaxed);
        let excess = lines.len().saturating_sub(capacity);
        lines.drain(..excess);
    }

    /// Append a line, evicting the oldest when full
    pub fn push(&self, line: LogLine) {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        while lines.len() >= self.capacity() {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Oldest first
    pub fn snapshot(&self) -> Vec<LogLine> {
        let lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Layer feeding a [`LogBuffer`]
pub struct RollingLayer {
    buffer: LogBuffer,
    max_level: Level,
    echo: bool,
}

impl RollingLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self {
            buffer,
            max_level: Level::DEBUG,
            echo: true,
        }
    }

    /// Drop events more verbose than `level`
    pub fn with_max_level(mut self, level: Level) -> Self {
        self.max_level = level;
        self
    }

    /// Toggle console/stderr echo
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

impl<S: Subscriber> Layer<S> for RollingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > self.max_level {
            return;
        }

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let line = LogLine {
            timestamp: Utc::now(),
            level: *meta.level(),
            target: meta.target().to_string(),
            message: visitor.finish(),
        };
        if self.echo {
            echo(&line);
        }
        self.buffer.push(line);
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push_str(&format!(" {}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push_str(&format!(" {}={:?}", field.name(), value));
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn echo(line: &LogLine) {
    let text = line.to_string();
    match line.level {
        Level::ERROR => web_sys::console::error_1(&text.into()),
        Level::WARN => web_sys::console::warn_1(&text.into()),
        _ => web_sys::console::log_1(&text.into()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn echo(line: &LogLine) {
    eprintln!("{}", line);
}

/// Logger setup failure
#[derive(Debug)]
pub struct InitError(String);

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to install logger: {}", self.0)
    }
}

impl std::error::Error for InitError {}

/// Install the rolling layer as the global subscriber
pub fn init_logger(app_name: &str, capacity: usize) -> Result<LogBuffer, InitError> {
    let buffer = LogBuffer::new(capacity);
    tracing_subscriber::registry()
        .with(RollingLayer::new(buffer.clone()))
        .try_init()
        .map_err(|e| InitError(e.to_string()))?;
    tracing::info!("{} logger ready (keeping {} lines)", app_name, buffer.capacity());
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture<F: FnOnce()>(buffer: &LogBuffer, max_level: Level, f: F) {
        let subscriber = tracing_subscriber::registry().with(
            RollingLayer::new(buffer.clone())
                .with_max_level(max_level)
                .with_echo(false),
        );
        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn test_buffer_evicts_oldest() {
        let buffer = LogBuffer::new(2);
        capture(&buffer, Level::TRACE, || {
            tracing::info!("first");
            tracing::info!("second");
            tracing::info!("third");
        });

        let lines = buffer.snapshot();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].message, "second");
        assert_eq!(lines[1].message, "third");
    }

    #[test]
    fn test_level_filter() {
        let buffer = LogBuffer::new(10);
        capture(&buffer, Level::INFO, || {
            tracing::debug!("too chatty");
            tracing::warn!("kept");
        });

        let lines = buffer.snapshot();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].level, Level::WARN);
    }

    #[test]
    fn test_fields_are_appended() {
        let buffer = LogBuffer::new(10);
        capture(&buffer, Level::DEBUG, || {
            tracing::info!(id = 7, label = "Home", "moved");
        });

        let line = &buffer.snapshot()[0];
        assert_eq!(line.message, "moved id=7 label=Home");
        assert!(line.to_string().contains("INFO"));
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let buffer = LogBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
        capture(&buffer, Level::DEBUG, || {
            tracing::error!("a");
            tracing::error!("b");
        });
        assert_eq!(buffer.len(), 1);
        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_resize_applies_to_shared_handles() {
        let buffer = LogBuffer::new(5);
        let handle = buffer.clone();
        capture(&buffer, Level::DEBUG, || {
            for n in 0..4 {
                tracing::info!("line {}", n);
            }
        });

        handle.resize(2);

        assert_eq!(buffer.capacity(), 2);
        let messages: Vec<String> = buffer.snapshot().into_iter().map(|l| l.message).collect();
        assert_eq!(messages, vec!["line 2", "line 3"]);
    }
}
