use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetInfo {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsInfo {
    pub crypto: AssetInfo,
    pub traditional: AssetInfo,
}

impl AssetsInfo {
    /// Static description of the two compared portfolios.
    pub fn comparison() -> Self {
        Self {
            crypto: AssetInfo {
                name: "Top 10 Crypto Portfolio".to_string(),
                symbol: "TOP10".to_string(),
                description: "Equal-weighted basket of the ten largest cryptocurrencies by market cap".to_string(),
                color: "#f7931a".to_string(),
            },
            traditional: AssetInfo {
                name: "60/40 Portfolio".to_string(),
                symbol: "60/40".to_string(),
                description: "60% S&P 500 (SPY) + 40% 20+ Year Treasury Bonds (TLT)".to_string(),
                color: "#3b82f6".to_string(),
            },
        }
    }
}

/// One row of the upstream market listing, ranked by market cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub market_cap_rank: Option<u32>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
}
