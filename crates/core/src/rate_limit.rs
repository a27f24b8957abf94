use std::time::{Duration, Instant};

use serde::{Deserialize, Deserializer};

/// Read from config as `{ kind = "debounce" | "throttle", window_ms = N }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", content = "window_ms", rename_all = "lowercase")]
pub enum RateLimitPolicy {
    /// Release the latest value once input has been quiet for the window.
    Debounce(#[serde(deserialize_with = "millis")] Duration),
    /// Release at most one value per window; values inside the window are dropped.
    Throttle(#[serde(deserialize_with = "millis")] Duration),
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        RateLimitPolicy::Debounce(Duration::from_millis(250))
    }
}

impl RateLimitPolicy {
    pub fn window(&self) -> Duration {
        match self {
            RateLimitPolicy::Debounce(w) | RateLimitPolicy::Throttle(w) => *w,
        }
    }
}

fn millis<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
    Ok(Duration::from_millis(u64::deserialize(d)?))
}

/// Timer-driven gate between raw input events and dispatch.
///
/// Time is passed in explicitly so the host loop decides when to poll and
/// tests can step through windows without sleeping.
#[derive(Debug)]
pub struct RateLimiter<T> {
    policy: RateLimitPolicy,
    pending: Option<(Instant, T)>,
    last_release: Option<Instant>,
}

impl<T> RateLimiter<T> {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            pending: None,
            last_release: None,
        }
    }

    pub fn schedule(&mut self, now: Instant, value: T) {
        match self.policy {
            RateLimitPolicy::Debounce(window) => {
                // replaces whatever was waiting
                self.pending = Some((now + window, value));
            }
            RateLimitPolicy::Throttle(window) => {
                let open = match self.last_release {
                    Some(at) => now.saturating_duration_since(at) >= window,
                    None => true,
                };
                if open && self.pending.is_none() {
                    self.pending = Some((now, value));
                }
            }
        }
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = matches!(&self.pending, Some((deadline, _)) if *deadline <= now);
        if !due {
            return None;
        }
        let (_, value) = self.pending.take()?;
        self.last_release = Some(now);
        Some(value)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(d, _)| *d)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
