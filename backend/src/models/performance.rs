use serde::{Deserialize, Serialize};

use crate::models::{PricePoint, Timeframe};

/// Whether a series came from an upstream provider or the sample generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Synthetic,
}

/// A produced series together with its provenance.
#[derive(Debug, Clone)]
pub struct SeriesResult {
    pub points: Vec<PricePoint>,
    pub source: DataSource,
}

impl SeriesResult {
    pub fn live(points: Vec<PricePoint>) -> Self {
        Self { points, source: DataSource::Live }
    }

    pub fn synthetic(points: Vec<PricePoint>) -> Self {
        Self { points, source: DataSource::Synthetic }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceResponse {
    pub crypto_data: Vec<PricePoint>,
    pub traditional_data: Vec<PricePoint>,
    pub timeframe: Timeframe,
    pub crypto_source: DataSource,
    pub traditional_source: DataSource,
}

impl PerformanceResponse {
    pub fn new(timeframe: Timeframe, crypto: SeriesResult, traditional: SeriesResult) -> Self {
        Self {
            crypto_data: crypto.points,
            traditional_data: traditional.points,
            timeframe,
            crypto_source: crypto.source,
            traditional_source: traditional.source,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetPerformanceResponse {
    pub coin_id: String,
    pub timeframe: Timeframe,
    pub source: DataSource,
    pub data: Vec<PricePoint>,
}
