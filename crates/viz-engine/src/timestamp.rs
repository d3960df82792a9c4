//! Elapsed-time transforms for temporal axes.
//!
//! A date attribute is converted to a whole-day count relative to one of the
//! subject's anchor dates before numeric binning. A subject without the
//! required anchor yields `None`, which bins to the missing bucket: the
//! event drops out of that axis's series but stays counted in totals.

use chrono::NaiveDate;
use viz_model::{GroupByParams, Subject, TimestampType};

/// Whole days between the event date and the transform's anchor date.
///
/// Returns `None` when the date itself or the anchor is missing. The `Date`
/// transform has no anchor and is handled by calendar binning, not here.
pub fn elapsed_days(
    date: Option<NaiveDate>,
    subject: &Subject,
    timestamp_type: TimestampType,
    params: &GroupByParams,
) -> Option<i64> {
    let date = date?;
    let anchor = anchor_date(subject, timestamp_type, params)?;
    Some((date - anchor).num_days())
}

fn anchor_date(
    subject: &Subject,
    timestamp_type: TimestampType,
    params: &GroupByParams,
) -> Option<NaiveDate> {
    match timestamp_type {
        TimestampType::Date => None,
        TimestampType::DaysSinceFirstDose | TimestampType::AssessmentWeekWithBaseline => {
            subject.first_treatment_date
        }
        TimestampType::DaysSinceRandomisation => subject.randomisation_date,
        TimestampType::DaysSinceFirstDoseOfDrug => params
            .drug_name
            .as_deref()
            .and_then(|drug| subject.first_dose_of(drug)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_since_first_dose() {
        let subject = Subject::new("S1", "C1", "ST").with_first_treatment_date(date(2024, 1, 1));
        let days = elapsed_days(
            Some(date(2024, 2, 1)),
            &subject,
            TimestampType::DaysSinceFirstDose,
            &GroupByParams::default(),
        );
        assert_eq!(days, Some(31));
    }

    #[test]
    fn missing_anchor_yields_none() {
        let subject = Subject::new("S1", "C1", "ST");
        let days = elapsed_days(
            Some(date(2024, 2, 1)),
            &subject,
            TimestampType::DaysSinceRandomisation,
            &GroupByParams::default(),
        );
        assert_eq!(days, None);
    }

    #[test]
    fn per_drug_anchor_resolved_from_params() {
        let subject =
            Subject::new("S1", "C1", "ST").with_drug_first_dose("DrugA", date(2024, 1, 10));
        let params = GroupByParams::new().with_drug_name("DrugA");
        assert_eq!(
            elapsed_days(
                Some(date(2024, 1, 15)),
                &subject,
                TimestampType::DaysSinceFirstDoseOfDrug,
                &params,
            ),
            Some(5)
        );
        let other = GroupByParams::new().with_drug_name("DrugB");
        assert_eq!(
            elapsed_days(
                Some(date(2024, 1, 15)),
                &subject,
                TimestampType::DaysSinceFirstDoseOfDrug,
                &other,
            ),
            None
        );
    }

    #[test]
    fn dates_before_anchor_are_negative() {
        let subject = Subject::new("S1", "C1", "ST").with_first_treatment_date(date(2024, 1, 10));
        assert_eq!(
            elapsed_days(
                Some(date(2024, 1, 8)),
                &subject,
                TimestampType::DaysSinceFirstDose,
                &GroupByParams::default(),
            ),
            Some(-2)
        );
    }
}
