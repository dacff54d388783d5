//! Per-caller rate limiting for the sync endpoints
//!
//! Both sync endpoints share one configured budget; each caller gets an
//! independent fixed window per endpoint.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::auth::user_fingerprint;
use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncEndpoint {
    Upload,
    Download,
}

impl SyncEndpoint {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upload => "sync_upload",
            Self::Download => "sync_download",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct RateWindow {
    started_at: Instant,
    count: u32,
}

impl RateWindow {
    const fn fresh(now: Instant) -> Self {
        Self {
            started_at: now,
            count: 0,
        }
    }

    fn remaining_secs(&self, now: Instant, window: Duration) -> u64 {
        window
            .saturating_sub(now.duration_since(self.started_at))
            .as_secs()
    }
}

#[derive(Debug, Default)]
struct EndpointCounters {
    allowed: AtomicU64,
    limited: AtomicU64,
}

/// Allowed/limited totals per endpoint, reported on `/healthz`
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct RateLimitSnapshot {
    pub upload: EndpointSnapshot,
    pub download: EndpointSnapshot,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct EndpointSnapshot {
    pub allowed: u64,
    pub limited: u64,
}

pub struct SyncRateLimiter {
    windows: Mutex<HashMap<(SyncEndpoint, String), RateWindow>>,
    window: Duration,
    limit: u32,
    counters: [EndpointCounters; 2],
}

impl SyncRateLimiter {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            window: config.rate_limit_window,
            limit: config.sync_rate_limit_per_window,
            counters: [EndpointCounters::default(), EndpointCounters::default()],
        }
    }

    pub async fn check(&self, endpoint: SyncEndpoint, caller: &str) -> Result<(), AppError> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let entry = windows
            .entry((endpoint, caller.to_string()))
            .or_insert_with(|| RateWindow::fresh(now));

        if now.duration_since(entry.started_at) >= self.window {
            *entry = RateWindow::fresh(now);
        }

        if entry.count >= self.limit {
            let retry_after_secs = entry.remaining_secs(now, self.window);
            self.counters[endpoint.index()]
                .limited
                .fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                endpoint = endpoint.label(),
                user = user_fingerprint(caller),
                retry_after_secs,
                "Rate limit exceeded"
            );
            return Err(AppError::too_many_requests(
                "Rate limit exceeded for sync endpoint",
                retry_after_secs,
            ));
        }

        entry.count += 1;
        self.counters[endpoint.index()]
            .allowed
            .fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn snapshot(&self) -> RateLimitSnapshot {
        RateLimitSnapshot {
            upload: self.endpoint_snapshot(SyncEndpoint::Upload),
            download: self.endpoint_snapshot(SyncEndpoint::Download),
        }
    }

    fn endpoint_snapshot(&self, endpoint: SyncEndpoint) -> EndpointSnapshot {
        let counters = &self.counters[endpoint.index()];
        EndpointSnapshot {
            allowed: counters.allowed.load(Ordering::Relaxed),
            limited: counters.limited.load(Ordering::Relaxed),
        }
    }
}
