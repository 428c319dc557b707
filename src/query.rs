//! Read side: candles and current price from stored samples

use crate::errors::{QueryError, QueryResult};
use crate::logger::{self, LogTag};
use crate::ohlcvs::{Candle, Interval, OhlcvAggregator, PricePoint};
use crate::store::{SampleStore, SortOrder};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleSeries {
    pub token: String,
    pub interval: Interval,
    pub candles: Vec<Candle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPrice {
    pub token: String,
    pub price: f64,
    #[serde(rename = "priceChange24hPercent")]
    pub price_change_24h_percent: f64,
    pub timestamp: DateTime<Utc>,
}

/// Percentage change from `old` to `current`, 0 when there is no usable reference
pub fn price_change_percent(current: f64, old: Option<f64>) -> f64 {
    match old {
        Some(old) if old != 0.0 => (current - old) / old * 100.0,
        _ => 0.0,
    }
}

pub struct QueryService {
    store: Arc<dyn SampleStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn SampleStore>) -> Self {
        Self { store }
    }

    pub fn get_candles(&self, token: &str, interval: &str, limit: usize) -> QueryResult<CandleSeries> {
        self.get_candles_at(token, interval, limit, Utc::now())
    }

    /// Candles covering the last `limit` intervals before `now`
    ///
    /// Unknown interval names resolve to 1h. An empty series is not an error.
    pub fn get_candles_at(
        &self,
        token: &str,
        interval: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> QueryResult<CandleSeries> {
        let token = token.to_uppercase();
        let interval = Interval::from_name(interval);
        let minutes = i64::from(interval.minutes());

        let window_minutes = i64::try_from(limit).unwrap_or(i64::MAX).saturating_mul(minutes);
        let from = now
            .checked_sub_signed(Duration::minutes(window_minutes.min(MAX_LOOKBACK_MINUTES)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let points: Vec<PricePoint> = self
            .store
            .query_samples(&token, from, SortOrder::Ascending)?
            .into_iter()
            .map(|s| PricePoint::new(s.timestamp, s.price))
            .collect();

        let candles = OhlcvAggregator::aggregate(&points, interval.minutes(), limit);

        logger::debug(
            LogTag::Ohlcv,
            &format!(
                "{} {}: {} samples since {} -> {} candles",
                token,
                interval,
                points.len(),
                from,
                candles.len()
            ),
        );

        Ok(CandleSeries {
            token,
            interval,
            candles,
        })
    }

    pub fn get_current_price(&self, token: &str) -> QueryResult<CurrentPrice> {
        self.get_current_price_at(token, Utc::now())
    }

    /// Latest price and its change against the newest sample at least 24h old
    pub fn get_current_price_at(&self, token: &str, now: DateTime<Utc>) -> QueryResult<CurrentPrice> {
        let token = token.to_uppercase();

        let current = self
            .store
            .query_latest(&token, None)?
            .ok_or_else(|| QueryError::NoData(token.clone()))?;

        let reference = self
            .store
            .query_latest(&token, Some(now - Duration::hours(24)))?
            .map(|s| s.price);

        Ok(CurrentPrice {
            price_change_24h_percent: price_change_percent(current.price, reference),
            price: current.price,
            timestamp: current.timestamp,
            token,
        })
    }
}

/// Lookback cap, keeps window arithmetic within chrono's range
const MAX_LOOKBACK_MINUTES: i64 = 100 * 365 * 24 * 60;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PriceSample;
    use crate::testing::FakeStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn sample(token: &str, price: f64, minutes_ago: i64) -> PriceSample {
        PriceSample::new("0xpool", token, price, now() - Duration::minutes(minutes_ago))
    }

    fn service(samples: Vec<PriceSample>) -> QueryService {
        QueryService::new(Arc::new(FakeStore::with_samples(samples)))
    }

    #[test]
    fn test_change_against_day_old_sample() {
        let svc = service(vec![sample("WATER", 100.0, 25 * 60), sample("WATER", 110.0, 1)]);
        let current = svc.get_current_price_at("water", now()).unwrap();

        assert_eq!(current.token, "WATER");
        assert_eq!(current.price, 110.0);
        assert!((current.price_change_24h_percent - 10.0).abs() < 1e-9);
        assert_eq!(current.timestamp, now() - Duration::minutes(1));
    }

    #[test]
    fn test_change_without_reference_is_zero() {
        let svc = service(vec![sample("WATER", 100.0, 60), sample("WATER", 110.0, 1)]);
        let current = svc.get_current_price_at("WATER", now()).unwrap();
        assert_eq!(current.price_change_24h_percent, 0.0);
    }

    #[test]
    fn test_zero_reference_price_is_zero_change() {
        assert_eq!(price_change_percent(5.0, Some(0.0)), 0.0);
        assert_eq!(price_change_percent(5.0, None), 0.0);
        assert_eq!(price_change_percent(90.0, Some(100.0)), -10.0);
    }

    #[test]
    fn test_no_data() {
        let svc = service(vec![sample("COAL", 1.0, 1)]);
        let err = svc.get_current_price_at("WATER", now()).unwrap_err();
        assert!(matches!(err, QueryError::NoData(ref t) if t == "WATER"));
    }

    #[test]
    fn test_candles_use_lookback_window() {
        // 1h interval, limit 2: only samples from the last 120 minutes count
        let svc = service(vec![
            sample("WATER", 50.0, 180),
            sample("WATER", 10.0, 100),
            sample("WATER", 12.0, 90),
            sample("WATER", 11.0, 30),
        ]);

        let series = svc.get_candles_at("water", "1h", 2, now()).unwrap();
        assert_eq!(series.token, "WATER");
        assert_eq!(series.interval, Interval::Hour1);
        assert_eq!(series.candles.len(), 2);
        assert!(series.candles.iter().all(|c| c.high < 50.0));
        assert_eq!(series.candles[0].open, 10.0);
        assert_eq!(series.candles[0].close, 12.0);
        assert_eq!(series.candles[1].close, 11.0);
    }

    #[test]
    fn test_unknown_interval_and_empty_series() {
        let svc = service(vec![]);
        let series = svc.get_candles_at("water", "3w", 10, now()).unwrap();
        assert_eq!(series.interval, Interval::Hour1);
        assert!(series.candles.is_empty());
    }

    #[test]
    fn test_store_errors_propagate() {
        let store = FakeStore::new();
        store.fail_reads();
        let svc = QueryService::new(Arc::new(store));

        assert!(matches!(
            svc.get_candles_at("water", "1m", 5, now()),
            Err(QueryError::Store(_))
        ));
        assert!(matches!(
            svc.get_current_price_at("water", now()),
            Err(QueryError::Store(_))
        ));
    }

    #[test]
    fn test_current_price_json_shape() {
        let svc = service(vec![sample("WATER", 2.5, 1)]);
        let value = serde_json::to_value(svc.get_current_price_at("WATER", now()).unwrap()).unwrap();
        assert!(value.get("priceChange24hPercent").is_some());
        assert_eq!(value["token"], "WATER");
    }
}
