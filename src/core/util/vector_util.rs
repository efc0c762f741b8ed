//! Sparse time-series arithmetic over [`Vector`] samples.
//!
//! Samples are matched on 10-second buckets so that series scraped at
//! slightly different instants still line up. Every function here is pure;
//! inputs are never modified.

use std::collections::BTreeMap;

use crate::domain::cost::model::cost_record::Vector;

/// Width of a merge bucket in seconds.
pub const BUCKET_SECONDS: f64 = 10.0;

/// Rounds `ts` to the nearest multiple of `precision`, halves away from zero
/// (24 -> 20, 25 -> 30).
#[inline]
pub fn round_timestamp(ts: f64, precision: f64) -> f64 {
    (ts / precision).round() * precision
}

/// Buckets a timestamp to the nearest 10 s, leaving the zero sentinel alone.
#[inline]
pub fn bucket_timestamp(ts: f64) -> f64 {
    if ts == 0.0 {
        ts
    } else {
        round_timestamp(ts, BUCKET_SECONDS)
    }
}

/// Adds two series.
///
/// If either side is empty the other is returned as is. Otherwise samples
/// without a timestamp are dropped, the rest are bucketed and values sharing
/// a bucket are summed. The result is sorted by timestamp.
pub fn add_vectors(xs: &[Vector], ys: &[Vector]) -> Vec<Vector> {
    if xs.is_empty() {
        return ys.to_vec();
    }
    if ys.is_empty() {
        return xs.to_vec();
    }

    let mut sums: BTreeMap<i64, f64> = BTreeMap::new();

    for v in xs.iter().chain(ys.iter()) {
        if v.timestamp == 0.0 {
            continue;
        }
        *sums.entry(bucket_index(v.timestamp)).or_insert(0.0) += v.value;
    }

    sums.into_iter()
        .map(|(idx, value)| Vector {
            timestamp: idx as f64 * BUCKET_SECONDS,
            value,
        })
        .collect()
}

/// Sum of all values; zero for an empty series.
pub fn total_vector(vectors: &[Vector]) -> f64 {
    vectors.iter().map(|v| v.value).sum()
}

#[inline]
fn bucket_index(ts: f64) -> i64 {
    (ts / BUCKET_SECONDS).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(f64, f64)]) -> Vec<Vector> {
        points.iter().map(|&(t, v)| Vector::new(t, v)).collect()
    }

    #[test]
    fn round_timestamp_rounds_half_away_from_zero() {
        assert_eq!(round_timestamp(24.0, 10.0), 20.0);
        assert_eq!(round_timestamp(25.0, 10.0), 30.0);
        assert_eq!(round_timestamp(-25.0, 10.0), -30.0);
        assert_eq!(round_timestamp(1_700_000_004.9, 10.0), 1_700_000_000.0);
    }

    #[test]
    fn bucketing_is_idempotent() {
        for t in [0.0, 4.0, 5.0, 14.99, 1_700_000_123.4] {
            let once = round_timestamp(t, 10.0);
            assert_eq!(round_timestamp(once, 10.0), once);
        }
    }

    #[test]
    fn empty_side_is_identity() {
        let a = series(&[(10.0, 1.0), (20.0, 2.0)]);
        assert_eq!(add_vectors(&a, &[]), a);
        assert_eq!(add_vectors(&[], &a), a);
        assert!(add_vectors(&[], &[]).is_empty());
    }

    #[test]
    fn addition_is_commutative() {
        let a = series(&[(10.0, 1.0), (21.0, 2.0), (40.0, 0.5)]);
        let b = series(&[(19.0, 3.0), (30.0, 4.0)]);
        assert_eq!(add_vectors(&a, &b), add_vectors(&b, &a));
    }

    #[test]
    fn matching_buckets_are_summed_and_others_pass_through() {
        let a = series(&[(10.0, 1.0), (21.0, 2.0)]);
        let b = series(&[(19.0, 3.0), (30.0, 4.0)]);
        assert_eq!(
            add_vectors(&a, &b),
            series(&[(10.0, 1.0), (20.0, 5.0), (30.0, 4.0)])
        );
    }

    #[test]
    fn colliding_samples_collapse_into_one_bucket() {
        let a = series(&[(1.0, 1.0), (2.0, 2.0)]);
        let b = series(&[(2.0, 2.0), (3.0, 3.0)]);
        assert_eq!(add_vectors(&a, &b), series(&[(0.0, 8.0)]));
    }

    #[test]
    fn addition_conserves_totals() {
        let a = series(&[(10.0, 1.5), (20.0, 2.5), (33.0, 1.0)]);
        let b = series(&[(11.0, 3.0), (50.0, 4.0)]);
        let sum = add_vectors(&a, &b);
        assert!((total_vector(&sum) - (total_vector(&a) + total_vector(&b))).abs() < 1e-12);
    }

    #[test]
    fn zero_timestamps_are_excluded_from_merge() {
        let a = series(&[(0.0, 100.0), (10.0, 1.0)]);
        let b = series(&[(10.0, 2.0)]);
        assert_eq!(add_vectors(&a, &b), series(&[(10.0, 3.0)]));
    }

    #[test]
    fn inputs_are_left_untouched() {
        let a = series(&[(12.0, 1.0)]);
        let b = series(&[(14.0, 1.0)]);
        let _ = add_vectors(&a, &b);
        assert_eq!(a[0].timestamp, 12.0);
        assert_eq!(b[0].timestamp, 14.0);
    }

    #[test]
    fn bucketing_keeps_the_sentinel() {
        assert_eq!(bucket_timestamp(0.0), 0.0);
        assert_eq!(bucket_timestamp(16.0), 20.0);
    }

    #[test]
    fn total_of_empty_is_zero() {
        assert_eq!(total_vector(&[]), 0.0);
        assert_eq!(total_vector(&series(&[(10.0, 1.0), (20.0, 2.5)])), 3.5);
    }
}
