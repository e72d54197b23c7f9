use std::sync::Arc;

use crate::external::price_provider::{CryptoMarketProvider, PriceProvider};
use crate::services::worker_pool::WorkerPool;

#[derive(Clone)]
pub struct AppState {
    pub crypto_provider: Arc<dyn CryptoMarketProvider>,
    pub traditional_provider: Arc<dyn PriceProvider>,
    pub worker_pool: WorkerPool,
}
