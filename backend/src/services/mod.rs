pub mod blend_service;
pub mod performance_service;
pub mod rate_limiter;
pub mod sample_service;
pub mod worker_pool;
