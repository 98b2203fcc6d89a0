//! Per-connection rate limiting for inbound WebSocket frames.
//!
//! Each connection gets a [`MessageLimiter`] combining a short burst window
//! with a longer sustained window. A frame must fit in both to be handled.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sliding-window counter
#[derive(Debug)]
pub struct SlidingWindow {
    /// Timestamps of accepted frames, oldest first
    timestamps: VecDeque<Instant>,
    /// Maximum number of frames allowed in the window
    max_requests: usize,
    window: Duration,
}

impl SlidingWindow {
    /// # Example
    ///
    /// ```
    /// use bluff_server::api::rate_limiter::SlidingWindow;
    /// use std::time::Duration;
    ///
    /// let mut window = SlidingWindow::new(2, Duration::from_secs(1));
    /// assert!(window.check());
    /// assert!(window.check());
    /// assert!(!window.check());
    /// ```
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: VecDeque::with_capacity(max_requests),
            max_requests,
            window,
        }
    }

    fn evict(&mut self, now: Instant) {
        while let Some(ts) = self.timestamps.front() {
            if now.duration_since(*ts) > self.window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    fn has_room(&mut self, now: Instant) -> bool {
        self.evict(now);
        self.timestamps.len() < self.max_requests
    }

    fn record(&mut self, now: Instant) {
        self.timestamps.push_back(now);
    }

    /// Record a frame if the window has room for it.
    pub fn check(&mut self) -> bool {
        let now = Instant::now();
        if !self.has_room(now) {
            return false;
        }
        self.record(now);
        true
    }

    pub fn remaining(&self) -> usize {
        self.max_requests.saturating_sub(self.timestamps.len())
    }
}

/// Which window rejected a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitExceeded {
    Burst,
    Sustained,
}

impl LimitExceeded {
    pub fn label(&self) -> &'static str {
        match self {
            LimitExceeded::Burst => "burst",
            LimitExceeded::Sustained => "sustained",
        }
    }

    /// Text sent back to the client in an `error` frame.
    pub fn client_message(&self) -> &'static str {
        match self {
            LimitExceeded::Burst => "Rate limit exceeded. Please slow down.",
            LimitExceeded::Sustained => "Too many messages. Please wait before sending more.",
        }
    }
}

/// Burst and sustained limits for one connection
#[derive(Debug)]
pub struct MessageLimiter {
    burst: SlidingWindow,
    sustained: SlidingWindow,
}

impl Default for MessageLimiter {
    /// 10 frames per second, 100 frames per minute
    fn default() -> Self {
        Self::new(
            SlidingWindow::new(10, Duration::from_secs(1)),
            SlidingWindow::new(100, Duration::from_secs(60)),
        )
    }
}

impl MessageLimiter {
    pub fn new(burst: SlidingWindow, sustained: SlidingWindow) -> Self {
        Self { burst, sustained }
    }

    /// Admit a frame, counting it against both windows.
    ///
    /// A rejected frame is not counted, so a client that backs off regains
    /// capacity as soon as its oldest frames age out.
    pub fn check(&mut self) -> Result<(), LimitExceeded> {
        let now = Instant::now();
        if !self.burst.has_room(now) {
            return Err(LimitExceeded::Burst);
        }
        if !self.sustained.has_room(now) {
            return Err(LimitExceeded::Sustained);
        }
        self.burst.record(now);
        self.sustained.record(now);
        Ok(())
    }
}
