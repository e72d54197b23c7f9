use std::sync::Arc;
use tokio::sync::{AcquireError, Semaphore};
use tokio::time::{sleep, Duration, Instant};
use parking_lot::Mutex;

/// Paces calls to an upstream API.
///
/// CoinGecko's free tier throttles bursts, so calls are spaced by a fixed
/// delay measured from the moment the previous call finished.
pub struct RateLimiter {
    /// Semaphore to limit concurrent requests
    semaphore: Arc<Semaphore>,
    /// When the last request finished
    last_request: Arc<Mutex<Instant>>,
    /// Minimum gap between the end of one request and the start of the next
    min_delay: Duration,
}

impl RateLimiter {
    /// # Arguments
    /// * `max_concurrent` - Maximum number of in-flight requests
    /// * `min_delay` - Gap enforced between consecutive requests
    pub fn new(max_concurrent: usize, min_delay: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            last_request: Arc::new(Mutex::new(
                Instant::now().checked_sub(min_delay).unwrap_or_else(Instant::now),
            )),
            min_delay,
        }
    }

    /// Wait for a permit and for the delay since the previous request to
    /// elapse. The returned guard stamps the completion time when dropped.
    pub async fn acquire(&self) -> Result<RateLimitGuard, AcquireError> {
        let permit = self.semaphore.clone().acquire_owned().await?;

        let wait_time = {
            let last = self.last_request.lock();
            let elapsed = last.elapsed();

            if elapsed < self.min_delay {
                Some(self.min_delay - elapsed)
            } else {
                None
            }
        }; // Lock is dropped here

        if let Some(delay) = wait_time {
            sleep(delay).await;
        }

        Ok(RateLimitGuard {
            _permit: permit,
            last_request: self.last_request.clone(),
        })
    }

    #[cfg(test)]
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Holds a rate limit permit until the request completes.
pub struct RateLimitGuard {
    _permit: tokio::sync::OwnedSemaphorePermit,
    last_request: Arc<Mutex<Instant>>,
}

impl Drop for RateLimitGuard {
    fn drop(&mut self) {
        *self.last_request.lock() = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant as StdInstant;

    #[tokio::test]
    async fn test_rate_limiter_enforces_delay() {
        let limiter = RateLimiter::new(2, Duration::from_millis(500));

        let start = StdInstant::now();

        // First request should be immediate
        let guard1 = limiter.acquire().await.unwrap();
        assert!(start.elapsed().as_millis() < 100, "First request should be immediate");
        drop(guard1);

        // Second request waits out the delay
        let _guard2 = limiter.acquire().await.unwrap();
        assert!(start.elapsed().as_millis() >= 450, "Second request should wait ~500ms");
    }

    #[tokio::test]
    async fn test_delay_counts_from_completion() {
        let limiter = RateLimiter::new(1, Duration::from_millis(300));

        let guard = limiter.acquire().await.unwrap();
        sleep(Duration::from_millis(200)).await;
        let released = StdInstant::now();
        drop(guard);

        let _guard = limiter.acquire().await.unwrap();
        assert!(released.elapsed().as_millis() >= 250, "Delay should start when the request finishes");
    }

    #[tokio::test]
    async fn test_single_permit_serializes() {
        let limiter = Arc::new(RateLimiter::new(1, Duration::from_millis(0)));

        let guard = limiter.acquire().await.unwrap();
        assert_eq!(limiter.available_permits(), 0);

        let limiter2 = limiter.clone();
        let handle = tokio::spawn(async move {
            let _guard = limiter2.acquire().await.unwrap();
        });

        sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished(), "Second caller should wait for the permit");

        drop(guard);
        handle.await.unwrap();
        assert_eq!(limiter.available_permits(), 1);
    }
}
