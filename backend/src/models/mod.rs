mod price_point;
mod timeframe;
mod performance;
mod assets;

pub use price_point::{percent_change, PricePoint};
pub use timeframe::{DateRange, InvalidTimeframe, Timeframe};
pub use performance::{AssetPerformanceResponse, DataSource, PerformanceResponse, SeriesResult};
pub use assets::{AssetsInfo, CryptoMarket};
