//! Per-integration sliding window admission control
//!
//! Each integration gets its own window of admission timestamps behind its
//! own lock. Admission prunes timestamps older than the window and admits while
//! fewer than `max_requests` remain.
//!
//! Only successful dispatches are recorded. Admission hands out an
//! `AdmissionPermit` that reserves a slot; `commit` turns the reservation
//! into a recorded timestamp and dropping the permit releases it. Reserved
//! slots count against the limit, so concurrent callers cannot both take the
//! last slot, while failed calls still never consume the window.

use crate::config::RateLimitSettings;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Configuration for rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Admissions allowed per window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        RateLimitSettings::default().into()
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    /// `requests` admissions per minute
    pub fn per_minute(requests: u32) -> Self {
        Self::new(requests, Duration::from_secs(60))
    }
}

impl From<RateLimitSettings> for RateLimiterConfig {
    fn from(settings: RateLimitSettings) -> Self {
        Self::new(
            settings.max_requests,
            Duration::from_secs(settings.window_secs),
        )
    }
}

#[derive(Debug, Default)]
struct WindowState {
    admitted: VecDeque<Instant>,
    reserved: u32,
}

impl WindowState {
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&oldest) = self.admitted.front() {
            if now.saturating_duration_since(oldest) < window {
                break;
            }
            self.admitted.pop_front();
        }
    }

    fn in_use(&self) -> usize {
        self.admitted.len() + self.reserved as usize
    }
}

type SharedWindow = Arc<Mutex<WindowState>>;

fn lock(window: &SharedWindow) -> MutexGuard<'_, WindowState> {
    window.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sliding window rate limiter keyed by integration id
#[derive(Debug, Default)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    windows: Mutex<HashMap<String, SharedWindow>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Limiter configuration
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    fn window(&self, key: &str) -> SharedWindow {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(windows.entry(key.to_string()).or_default())
    }

    /// Try to reserve a slot for `key` now
    pub fn try_acquire(&self, key: &str) -> Option<AdmissionPermit> {
        self.try_acquire_at(key, Instant::now())
    }

    /// Try to reserve a slot for `key` as of `now`
    pub fn try_acquire_at(&self, key: &str, now: Instant) -> Option<AdmissionPermit> {
        let window = self.window(key);
        {
            let mut state = lock(&window);
            state.prune(now, self.config.window);
            if state.in_use() >= self.config.max_requests as usize {
                return None;
            }
            state.reserved += 1;
        }

        Some(AdmissionPermit {
            window,
            committed: false,
        })
    }

    /// Recorded admissions for `key` still inside the window as of `now`
    pub fn recorded_at(&self, key: &str, now: Instant) -> usize {
        let window = self.window(key);
        let mut state = lock(&window);
        state.prune(now, self.config.window);
        state.admitted.len()
    }

    /// Recorded admissions for `key` still inside the window
    pub fn recorded(&self, key: &str) -> usize {
        self.recorded_at(key, Instant::now())
    }
}

/// A reserved admission slot
///
/// Commit after a successful dispatch; drop otherwise.
#[derive(Debug)]
#[must_use = "dropping a permit releases the reserved slot"]
pub struct AdmissionPermit {
    window: SharedWindow,
    committed: bool,
}

impl AdmissionPermit {
    /// Record the admission now
    pub fn commit(self) {
        self.commit_at(Instant::now());
    }

    /// Record the admission at `at`
    pub fn commit_at(mut self, at: Instant) {
        let mut state = lock(&self.window);
        state.reserved = state.reserved.saturating_sub(1);
        state.admitted.push_back(at);
        drop(state);
        self.committed = true;
    }
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        if !self.committed {
            let mut state = lock(&self.window);
            state.reserved = state.reserved.saturating_sub(1);
        }
    }
}
