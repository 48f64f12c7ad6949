//! Per-connection message rate limiting.
//!
//! Every socket gets a [`MessageLimits`] pair: a short burst window and a
//! longer sustained window. A frame is admitted only if both have room.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;

/// Sliding-window counter over the last `window` of admitted messages.
#[derive(Debug)]
pub struct RateLimiter {
    name: &'static str,
    sent_at: VecDeque<Instant>,
    limit: usize,
    window: Duration,
}

impl RateLimiter {
    /// # Example
    ///
    /// ```
    /// use ttt_server::api::rate_limiter::RateLimiter;
    /// use std::time::Duration;
    ///
    /// let mut limiter = RateLimiter::new("burst", 2, Duration::from_secs(1));
    /// assert!(limiter.check());
    /// assert!(limiter.check());
    /// assert!(!limiter.check());
    /// ```
    pub fn new(name: &'static str, limit: usize, window: Duration) -> Self {
        Self {
            name,
            sent_at: VecDeque::with_capacity(limit),
            limit,
            window,
        }
    }

    /// Label used in logs and metrics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn check(&mut self) -> bool {
        self.check_at(Instant::now())
    }

    /// Admit a message sent at `now`. Refused messages are not recorded.
    pub fn check_at(&mut self, now: Instant) -> bool {
        if !self.has_room_at(now) {
            return false;
        }
        self.record(now);
        true
    }

    /// Drop entries older than the window and report whether one more fits.
    fn has_room_at(&mut self, now: Instant) -> bool {
        while self
            .sent_at
            .front()
            .is_some_and(|sent| now.duration_since(*sent) > self.window)
        {
            self.sent_at.pop_front();
        }
        self.sent_at.len() < self.limit
    }

    fn record(&mut self, now: Instant) {
        self.sent_at.push_back(now);
    }

    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.sent_at.len())
    }
}

/// Burst and sustained limiters for one connection.
#[derive(Debug)]
pub struct MessageLimits {
    burst: RateLimiter,
    sustained: RateLimiter,
}

impl MessageLimits {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            burst: RateLimiter::new("burst", config.burst_per_second, Duration::from_secs(1)),
            sustained: RateLimiter::new(
                "sustained",
                config.sustained_per_minute,
                Duration::from_secs(60),
            ),
        }
    }

    /// Admit one inbound frame, or name the limiter that refused it.
    pub fn admit(&mut self) -> Result<(), &'static str> {
        self.admit_at(Instant::now())
    }

    /// A refused frame is recorded in neither window.
    pub fn admit_at(&mut self, now: Instant) -> Result<(), &'static str> {
        if !self.burst.has_room_at(now) {
            return Err(self.burst.name());
        }
        if !self.sustained.has_room_at(now) {
            return Err(self.sustained.name());
        }
        self.burst.record(now);
        self.sustained.record(now);
        Ok(())
    }
}
