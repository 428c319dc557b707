// Bucketing of raw price samples into candles

use crate::ohlcvs::types::{Candle, PricePoint};
use std::collections::BTreeMap;

pub struct OhlcvAggregator;

impl OhlcvAggregator {
    /// Group price points into fixed-width candles
    ///
    /// Input order is not trusted. Points are stably sorted by timestamp, so
    /// equal timestamps keep their arrival order and decide open/close within a
    /// bucket. Buckets without points are not materialized. Only the most
    /// recent `limit` candles are returned, oldest first.
    pub fn aggregate(points: &[PricePoint], interval_minutes: u32, limit: usize) -> Vec<Candle> {
        if points.is_empty() || limit == 0 || interval_minutes == 0 {
            return Vec::new();
        }

        let width_ms = i64::from(interval_minutes) * 60_000;

        let mut sorted: Vec<&PricePoint> = points.iter().collect();
        sorted.sort_by_key(|p| p.timestamp);

        let mut buckets: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
        for point in sorted {
            let key = Self::bucket_key(point.timestamp.timestamp_millis(), width_ms);
            buckets.entry(key).or_default().push(point.price);
        }

        let skip = buckets.len().saturating_sub(limit);

        buckets
            .into_iter()
            .skip(skip)
            .filter_map(|(key, prices)| Self::build_candle(key, &prices))
            .collect()
    }

    /// Start of the bucket containing `ts_ms`, in milliseconds
    pub fn bucket_key(ts_ms: i64, width_ms: i64) -> i64 {
        ts_ms.div_euclid(width_ms) * width_ms
    }

    fn build_candle(key_ms: i64, prices: &[f64]) -> Option<Candle> {
        let open = *prices.first()?;
        let close = *prices.last()?;
        let high = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let low = prices.iter().copied().fold(f64::INFINITY, f64::min);

        Some(Candle {
            time: key_ms.div_euclid(1000),
            open,
            high,
            low,
            close,
            volume: 0.0,
        })
    }
}
