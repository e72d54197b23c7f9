pub mod price_provider;
pub mod coingecko;
pub mod yahoofinance;
