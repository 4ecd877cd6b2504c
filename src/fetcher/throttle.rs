use std::time::Duration;

use tokio::time::Instant;

/// Enforces a minimum gap between the start of consecutive requests.
///
/// A retry backoff registered with [`Throttle::defer`] is added on top of
/// that gap rather than overlapping it.
#[derive(Debug)]
pub struct Throttle {
    delay: Duration,
    ready_at: Option<Instant>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ready_at: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleep until the next request may start, then mark now.
    pub async fn wait(&mut self) {
        if let Some(ready_at) = self.ready_at {
            if Instant::now() < ready_at {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        self.ready_at = Some(Instant::now() + self.delay);
    }

    /// Push the next request start out by `extra`, counted from whichever is
    /// later: now or the point the plain delay would release it.
    pub fn defer(&mut self, extra: Duration) {
        let now = Instant::now();
        let base = match self.ready_at {
            Some(ready_at) if ready_at > now => ready_at,
            _ => now,
        };
        self.ready_at = Some(base + extra);
    }
}
