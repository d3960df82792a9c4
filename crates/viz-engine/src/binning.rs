//! Axis binning: raw value in, discrete ordered bin out.
//!
//! Binning is pure and deterministic. The selection resolver replays the
//! same functions over the same inputs, so equal inputs must always produce
//! bit-identical bin keys.

use chrono::NaiveDate;
use viz_model::{BinKey, RawValue};
use viz_model::value::format_number;

/// Clamp an untrusted bin size to something usable. Non-finite or
/// non-positive sizes fall back to 1.
fn sanitize_bin_size(bin_size: f64) -> f64 {
    if bin_size.is_finite() && bin_size > 0.0 {
        bin_size
    } else {
        1.0
    }
}

/// Bucket a continuous value: bucket start = `floor(value / size) * size`.
///
/// For sizes above 1 the label is the closed bucket range `"lo - hi"`; for
/// size 1 (or fractional sizes) the label is the bucket start itself. A
/// missing value maps to the reserved missing bucket, which sorts last.
pub fn bin_numeric(value: Option<f64>, bin_size: f64) -> BinKey {
    let size = sanitize_bin_size(bin_size);
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return BinKey::missing();
    };
    let bucket = (value / size).floor() * size;
    if size > 1.0 {
        let hi = bucket + size - 1.0;
        BinKey::number(
            bucket,
            format!("{} - {}", format_number(bucket), format_number(hi)),
        )
    } else {
        BinKey::number(bucket, format_number(bucket))
    }
}

/// The numeric path over a derived whole-day count.
pub fn bin_days(days: Option<i64>, bin_size: f64) -> BinKey {
    bin_numeric(days.map(|d| d as f64), bin_size)
}

const EPOCH: NaiveDate = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();

/// Truncate a calendar date into whole-day buckets anchored on the epoch.
/// The label is the bucket's representative (start) date.
pub fn bin_calendar_date(date: Option<NaiveDate>, bin_size_days: f64) -> BinKey {
    let Some(date) = date else {
        return BinKey::missing();
    };
    let size = sanitize_bin_size(bin_size_days).round().max(1.0) as i64;
    let days = (date - EPOCH).num_days();
    let bucket_start = days.div_euclid(size) * size;
    let representative = EPOCH + chrono::Duration::days(bucket_start);
    BinKey::number(
        bucket_start as f64,
        representative.format("%Y-%m-%d").to_string(),
    )
}

/// Map an elapsed-day count to a discrete assessment-week label.
///
/// Day 0 is "Baseline"; other days round to the nearest week. Equal week
/// numbers collapse into one bin.
pub fn bin_assessment_week(days: Option<i64>) -> BinKey {
    let Some(days) = days else {
        return BinKey::missing();
    };
    if days == 0 {
        return BinKey::number(0.0, "Baseline");
    }
    let week = (days as f64 / 7.0).round() as i64;
    BinKey::number(week as f64, format!("Week {week}"))
}

/// Pass a categorical (or already-discrete) value through as a bin.
///
/// Absent/blank values map to the missing bucket; a literal "(Empty)"
/// category code stays a text bin and remains distinguishable from it.
/// Numeric and date values keep a numeric rank so axes discovered from the
/// data still order correctly.
pub fn bin_categorical(value: &RawValue) -> BinKey {
    match value {
        RawValue::Empty => BinKey::missing(),
        RawValue::Str(s) if s.trim().is_empty() => BinKey::missing(),
        RawValue::Str(s) => BinKey::text(s.clone()),
        RawValue::Int(v) => BinKey::number(*v as f64, v.to_string()),
        RawValue::Float(v) if v.is_finite() => BinKey::number(*v, format_number(*v)),
        RawValue::Float(_) => BinKey::missing(),
        RawValue::Date(d) => BinKey::number(
            (*d - EPOCH).num_days() as f64,
            d.format("%Y-%m-%d").to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_size_five_buckets() {
        for (value, lo, label) in [
            (31.0, 30.0, "30 - 34"),
            (60.0, 60.0, "60 - 64"),
            (91.0, 90.0, "90 - 94"),
        ] {
            let bin = bin_numeric(Some(value), 5.0);
            assert_eq!(bin.numeric_rank(), Some(lo));
            assert_eq!(bin.label(), label);
        }
    }

    #[test]
    fn bin_size_one_labels_plain_value() {
        let bin = bin_numeric(Some(31.0), 1.0);
        assert_eq!(bin.label(), "31");
        assert_eq!(bin.numeric_rank(), Some(31.0));
    }

    #[test]
    fn negative_values_floor_downward() {
        let bin = bin_numeric(Some(-3.0), 5.0);
        assert_eq!(bin.numeric_rank(), Some(-5.0));
        assert_eq!(bin.label(), "-5 - -1");
    }

    #[test]
    fn missing_and_bad_sizes() {
        assert!(bin_numeric(None, 5.0).is_missing());
        assert!(bin_numeric(Some(f64::NAN), 5.0).is_missing());
        // Untrusted size falls back to 1 instead of faulting.
        assert_eq!(bin_numeric(Some(7.0), 0.0).label(), "7");
        assert_eq!(bin_numeric(Some(7.0), -4.0).label(), "7");
    }

    #[test]
    fn zero_is_a_legitimate_bucket() {
        let zero = bin_numeric(Some(0.0), 5.0);
        assert!(!zero.is_missing());
        assert_eq!(zero.label(), "0 - 4");
        assert!(zero < BinKey::missing());
    }

    #[test]
    fn calendar_truncation_uses_bucket_start_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        let bin = bin_calendar_date(Some(date), 7.0);
        // Representative date is the start of the 7-day bucket.
        let rank = bin.numeric_rank().unwrap() as i64;
        assert_eq!(rank % 7, 0);
        let representative = EPOCH + chrono::Duration::days(rank);
        assert!(representative <= date);
        assert!(date - representative < chrono::Duration::days(7));
        assert_eq!(bin.label(), representative.format("%Y-%m-%d").to_string());
    }

    #[test]
    fn assessment_weeks_with_baseline() {
        assert_eq!(bin_assessment_week(Some(0)).label(), "Baseline");
        assert_eq!(bin_assessment_week(Some(28)).label(), "Week 4");
        assert_eq!(bin_assessment_week(Some(27)).label(), "Week 4");
        assert_eq!(bin_assessment_week(Some(29)).label(), "Week 4");
        assert!(bin_assessment_week(None).is_missing());
        // Equal week numbers collapse to one bin.
        assert_eq!(
            bin_assessment_week(Some(27)),
            bin_assessment_week(Some(29))
        );
    }

    #[test]
    fn categorical_passthrough() {
        assert_eq!(
            bin_categorical(&RawValue::Str("MILD".to_string())).label(),
            "MILD"
        );
        assert!(bin_categorical(&RawValue::Empty).is_missing());
        assert!(bin_categorical(&RawValue::Str("  ".to_string())).is_missing());
        // Literal "(Empty)" code is a real category, not the missing bucket.
        let literal = bin_categorical(&RawValue::Str("(Empty)".to_string()));
        assert!(!literal.is_missing());
        assert_eq!(literal.label(), "(Empty)");
    }

    #[test]
    fn categorical_numbers_rank_numerically() {
        let two = bin_categorical(&RawValue::Float(2.0));
        let ten = bin_categorical(&RawValue::Float(10.0));
        assert!(two < ten, "numeric categories must not sort as text");
    }
}
