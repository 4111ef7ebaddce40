//! Year/month aggregation: the dense matrix behind every view.
//!
//! Records are bucketed into a flat array indexed by
//! `YearRange::offset(year, month)`, so the output order (year-major,
//! month-minor) falls out of the indexing rather than from sorting keys.

use tracing::{debug, warn};

use crate::domain::{DailyRecord, MatrixSnapshot, MonthBucket, YearRange, MONTHS_PER_YEAR};

pub mod stats;

/// Build the dense matrix for `range` from records in any order.
///
/// Records outside the range are dropped. Each bucket's days are sorted by
/// date; when a date repeats, the record that came last in `records` wins.
pub fn aggregate(records: &[DailyRecord], range: YearRange) -> MatrixSnapshot {
    let mut groups: Vec<Vec<DailyRecord>> = vec![Vec::new(); range.bucket_count()];
    let mut outside = 0usize;

    for record in records {
        match range.offset(record.year(), record.month()) {
            Some(idx) => groups[idx].push(*record),
            None => outside += 1,
        }
    }

    if outside > 0 {
        debug!(
            outside,
            first_year = range.first(),
            last_year = range.last(),
            "dropped records outside the year range"
        );
    }

    let mut duplicates = 0usize;
    let mut buckets = Vec::with_capacity(range.bucket_count());

    for (idx, days) in groups.into_iter().enumerate() {
        let year = range.first() + (idx / MONTHS_PER_YEAR) as i32;
        let month = (idx % MONTHS_PER_YEAR) as u32 + 1;

        if days.is_empty() {
            buckets.push(MonthBucket::empty(year, month));
            continue;
        }

        let (days, dropped) = sort_unique_by_date(days);
        duplicates += dropped;

        buckets.push(MonthBucket {
            year,
            month,
            has_data: true,
            summary: Some(stats::summarize(&days)),
            days,
        });
    }

    if duplicates > 0 {
        warn!(duplicates, "repeated dates found; kept the last row for each date");
    }

    MatrixSnapshot {
        range,
        years: range.years().collect(),
        buckets,
    }
}

/// Sort ascending by date, keeping the last occurrence of a repeated date.
///
/// Returns the surviving days and how many were discarded.
fn sort_unique_by_date(mut days: Vec<DailyRecord>) -> (Vec<DailyRecord>, usize) {
    // Stable sort: equal dates keep their input order, so the last one is the latest row.
    days.sort_by_key(|d| d.date);

    let before = days.len();
    let mut unique: Vec<DailyRecord> = Vec::with_capacity(before);
    for day in days {
        match unique.last_mut() {
            Some(prev) if prev.date == day.date => *prev = day,
            _ => unique.push(day),
        }
    }

    let dropped = before - unique.len();
    (unique, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(y: i32, m: u32, d: u32, max: f64, min: f64) -> DailyRecord {
        DailyRecord::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), max, min)
    }

    fn range(first: i32, last: i32) -> YearRange {
        YearRange::new(first, last).unwrap()
    }

    #[test]
    fn two_january_days_produce_expected_summary() {
        let records = [rec(2010, 1, 1, 5.0, -1.0), rec(2010, 1, 2, 7.0, 0.0)];
        let snapshot = aggregate(&records, range(2010, 2010));

        assert_eq!(snapshot.years, vec![2010]);
        assert_eq!(snapshot.buckets.len(), 12);

        let jan = snapshot.bucket(2010, 1).unwrap();
        assert!(jan.has_data);
        assert_eq!(jan.days.len(), 2);
        let s = jan.summary.unwrap();
        assert!((s.mean_max.unwrap() - 6.0).abs() < 1e-12);
        assert!((s.mean_min.unwrap() - -0.5).abs() < 1e-12);
        assert_eq!(s.month_max, Some(7.0));
        assert_eq!(s.month_min, Some(-1.0));

        for bucket in &snapshot.buckets[1..] {
            assert!(!bucket.has_data, "{} should be empty", bucket.label());
            assert!(bucket.days.is_empty());
            assert!(bucket.summary.is_none());
        }
    }

    #[test]
    fn grid_is_dense_and_ordered_for_any_range() {
        let records = [rec(2003, 6, 15, 30.0, 22.0)];
        for (first, last) in [(2000, 2000), (2000, 2004), (2008, 2017), (1990, 2030)] {
            let snapshot = aggregate(&records, range(first, last));
            let years = (last - first + 1) as usize;
            assert_eq!(snapshot.buckets.len(), years * 12);
            snapshot.validate().unwrap();

            let mut expected = Vec::new();
            for y in first..=last {
                for m in 1..=12 {
                    expected.push((y, m));
                }
            }
            let actual: Vec<(i32, u32)> = snapshot.buckets.iter().map(|b| (b.year, b.month)).collect();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn records_outside_range_are_ignored() {
        let records = [
            rec(2007, 12, 31, 18.0, 12.0),
            rec(2008, 1, 1, 17.0, 11.0),
            rec(2018, 1, 1, 16.0, 10.0),
        ];
        let snapshot = aggregate(&records, range(2008, 2017));
        assert_eq!(snapshot.populated_months(), 1);
        assert_eq!(snapshot.buckets[0].days.len(), 1);
    }

    #[test]
    fn days_are_sorted_and_deduplicated() {
        let records = [
            rec(2012, 3, 9, 21.0, 15.0),
            rec(2012, 3, 2, 19.0, 14.0),
            rec(2012, 3, 9, 23.0, 16.0),
            rec(2012, 3, 5, 20.0, 13.0),
        ];
        let snapshot = aggregate(&records, range(2012, 2012));
        let march = snapshot.bucket(2012, 3).unwrap();

        let days: Vec<u32> = march.days.iter().map(|d| d.day()).collect();
        assert_eq!(days, vec![2, 5, 9]);
        // Last row for 2012-03-09 wins.
        assert_eq!(march.days[2].max, 23.0);
        assert_eq!(march.summary.unwrap().month_max, Some(23.0));

        let span = march.date_span().unwrap();
        assert_eq!(span.0, NaiveDate::from_ymd_opt(2012, 3, 2).unwrap());
        assert_eq!(span.1, NaiveDate::from_ymd_opt(2012, 3, 9).unwrap());
    }

    #[test]
    fn means_and_extremes_match_daily_values() {
        let values = [(12.5, 4.0), (15.0, 6.5), (9.0, 1.5), (13.25, 7.0)];
        let records: Vec<DailyRecord> = values
            .iter()
            .enumerate()
            .map(|(i, &(max, min))| rec(2015, 11, i as u32 + 1, max, min))
            .collect();
        let snapshot = aggregate(&records, range(2015, 2015));
        let s = snapshot.bucket(2015, 11).unwrap().summary.unwrap();

        let mean_max = values.iter().map(|v| v.0).sum::<f64>() / 4.0;
        let mean_min = values.iter().map(|v| v.1).sum::<f64>() / 4.0;
        assert!((s.mean_max.unwrap() - mean_max).abs() < 1e-12);
        assert!((s.mean_min.unwrap() - mean_min).abs() < 1e-12);
        assert_eq!(s.month_max, Some(15.0));
        assert_eq!(s.month_min, Some(1.5));
    }

    #[test]
    fn coerced_nan_rows_still_mark_month_as_populated() {
        let records = [rec(2011, 8, 1, f64::NAN, f64::NAN)];
        let snapshot = aggregate(&records, range(2011, 2011));
        let aug = snapshot.bucket(2011, 8).unwrap();
        assert!(aug.has_data);
        assert_eq!(aug.summary.unwrap().month_max, None);
        assert_eq!(aug.summary.unwrap().mean_min, None);
    }

    #[test]
    fn aggregation_is_idempotent_and_order_independent() {
        let mut records = vec![
            rec(2009, 2, 3, 14.0, 9.0),
            rec(2009, 2, 1, 13.0, 8.0),
            rec(2010, 7, 30, 32.0, 27.0),
            rec(2009, 2, 2, 12.0, 7.5),
        ];
        let a = aggregate(&records, range(2009, 2010));
        let b = aggregate(&records, range(2009, 2010));
        assert_eq!(a, b);

        records.reverse();
        let c = aggregate(&records, range(2009, 2010));
        assert_eq!(a, c);
    }
}
