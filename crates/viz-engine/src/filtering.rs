//! Filter application and available-filter recomputation.

use tracing::debug;
use viz_model::{Event, FilterResult, Filters, Subject};

/// Narrow an event collection: an event passes iff it passes every event
/// filter and its subject passes every population filter.
pub fn apply_events<'a, T>(
    events: &'a [Event<T>],
    event_filters: &Filters<Event<T>>,
    population_filters: &Filters<Subject>,
) -> FilterResult<'a, Event<T>> {
    let filtered: Vec<&Event<T>> = events
        .iter()
        .filter(|event| {
            event_filters.matches(event) && population_filters.matches(event.subject())
        })
        .collect();
    debug!(
        source = events.len(),
        filtered = filtered.len(),
        "applied event filters"
    );
    FilterResult::new(filtered, events.len())
}

/// Narrow a subject population.
pub fn apply_subjects<'a>(
    subjects: &'a [Subject],
    population_filters: &Filters<Subject>,
) -> FilterResult<'a, Subject> {
    let filtered: Vec<&Subject> = subjects
        .iter()
        .filter(|subject| population_filters.matches(subject))
        .collect();
    debug!(
        source = subjects.len(),
        filtered = filtered.len(),
        "applied population filters"
    );
    FilterResult::new(filtered, subjects.len())
}

/// Recompute every filter's available bounds/values.
///
/// Filter *i*'s reported range is derived from the items passing all
/// filters except *i* itself, so narrowing one filter never hides data from
/// its own widget that it alone excluded.
pub fn available_filters<E>(items: &[E], filters: &Filters<E>) -> Filters<E> {
    let mut available = Filters::empty();
    for (index, filter) in filters.iter().enumerate() {
        let surviving: Vec<&E> = items
            .iter()
            .filter(|item| filters.matches_except(item, index))
            .collect();
        available.push(filter.narrowed_to(&surviving));
    }
    available
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use viz_model::NumericRangeFilter;

    fn numeric_filter(from: f64, to: f64) -> Box<dyn viz_model::DataFilter<f64>> {
        Box::new(
            NumericRangeFilter::empty("value", Arc::new(|v: &f64| Some(*v)))
                .with_range(Some(from), Some(to)),
        )
    }

    #[test]
    fn leave_one_out_recomputation() {
        // Filter A keeps [0, 5]; filter B keeps [3, 10].
        let filters: Filters<f64> = Filters::empty()
            .with(numeric_filter(0.0, 5.0))
            .with(numeric_filter(3.0, 10.0));
        let items = [1.0, 2.0, 4.0, 6.0, 9.0, 12.0];

        let available = available_filters(&items, &filters);
        let recomputed: Vec<&dyn viz_model::DataFilter<f64>> = available.iter().collect();

        // Filter A's range is recomputed over items passing only B: {4, 6, 9}.
        assert!(recomputed[0].matches(&6.0));
        assert!(!recomputed[0].matches(&12.0));
        // Filter B's range is recomputed over items passing only A: {1, 2, 4}.
        assert!(recomputed[1].matches(&1.0));
        assert!(!recomputed[1].matches(&9.0));
    }
}
