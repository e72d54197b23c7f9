use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::info;

#[derive(Debug, Error, PartialEq)]
pub enum WorkerPoolError {
    #[error("worker pool is shut down")]
    Closed,
}

/// Bounded pool for upstream fetch pipelines.
///
/// At most `size` jobs run at once; the rest queue in FIFO order. `drain`
/// waits for every queued and running job, then rejects new submissions.
#[derive(Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of idle workers.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn spawn<F, T>(&self, job: F) -> JoinHandle<Result<T, WorkerPoolError>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let semaphore = self.semaphore.clone();
        tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| WorkerPoolError::Closed)?;
            Ok(job.await)
        })
    }

    /// Waits for in-flight jobs to finish, then closes the pool.
    pub async fn drain(&self) {
        info!("Draining worker pool ({} workers)", self.size);
        // Every permit held by us means no job is running
        if let Ok(permits) = self.semaphore.acquire_many(self.size as u32).await {
            permits.forget();
        }
        self.semaphore.close();
        info!("Worker pool drained");
    }
}
