//! Population (subject-level) filter factories shared by every domain.

use chrono::NaiveDate;
use std::sync::Arc;
use viz_model::{DataFilter, DateRangeFilter, Filters, Subject, ValueSetFilter};

/// The population filter set that accepts every subject.
pub fn filters() -> Filters<Subject> {
    Filters::empty()
}

pub fn subject_code_filter<I, S>(codes: I) -> Box<dyn DataFilter<Subject>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Box::new(
        ValueSetFilter::empty(
            "subject_code",
            Arc::new(|subject: &Subject| Some(subject.subject_code.clone())),
        )
        .with_values(codes),
    )
}

pub fn study_part_filter<I, S>(parts: I) -> Box<dyn DataFilter<Subject>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Box::new(
        ValueSetFilter::empty(
            "study_part",
            Arc::new(|subject: &Subject| subject.study_part.clone()),
        )
        .with_values(parts),
    )
}

pub fn first_treatment_filter(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Box<dyn DataFilter<Subject>> {
    Box::new(
        DateRangeFilter::empty(
            "first_treatment_date",
            Arc::new(|subject: &Subject| subject.first_treatment_date),
        )
        .with_range(from, to),
    )
}
