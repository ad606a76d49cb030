//! Pausable play-time tracking.

/// Source of monotonic milliseconds.
pub trait TimeSource {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time source backed by [`std::time::Instant`].
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicTime {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Offset plus a running interval; elapsed time only accumulates while
/// started, so pausing is `stop` and resuming is `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stopwatch {
    offset_ms: u64,
    started_at: Option<u64>,
}

impl Stopwatch {
    /// A stopped stopwatch that already reads `offset_ms`.
    pub fn with_offset(offset_ms: u64) -> Self {
        Self {
            offset_ms,
            started_at: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.started_at.is_none() {
            self.started_at = Some(now_ms);
        }
    }

    pub fn stop(&mut self, now_ms: u64) {
        if let Some(start) = self.started_at.take() {
            self.offset_ms += now_ms.saturating_sub(start);
        }
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.started_at {
            Some(start) => self.offset_ms + now_ms.saturating_sub(start),
            None => self.offset_ms,
        }
    }
}
