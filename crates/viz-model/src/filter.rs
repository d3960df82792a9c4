//! Filter value objects.
//!
//! Filters are pure predicates over events or subjects. Two capability
//! shapes exist: ranges (numeric/date, narrowed by min/max of surviving
//! values) and sets (explicit accepted values, narrowed by the surviving
//! distinct values). An empty filter accepts everything. Ranges coming from
//! a UI are untrusted: `from > to` matches nothing rather than faulting.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;

pub type NumericExtractor<E> = Arc<dyn Fn(&E) -> Option<f64> + Send + Sync>;
pub type DateExtractor<E> = Arc<dyn Fn(&E) -> Option<NaiveDate> + Send + Sync>;
pub type TextExtractor<E> = Arc<dyn Fn(&E) -> Option<String> + Send + Sync>;

/// One filter over items of type `E`.
///
/// `narrowed_to` recomputes the filter's *available* bounds/values from the
/// items that survive the other filters, so a filter widget can display its
/// own remaining valid range.
pub trait DataFilter<E>: Send + Sync {
    fn name(&self) -> &str;
    /// True when the filter accepts everything.
    fn is_empty(&self) -> bool;
    fn matches(&self, item: &E) -> bool;
    fn narrowed_to(&self, items: &[&E]) -> Box<dyn DataFilter<E>>;
}

/// Closed numeric range `[from, to]` over an extracted value.
pub struct NumericRangeFilter<E> {
    name: String,
    from: Option<f64>,
    to: Option<f64>,
    extract: NumericExtractor<E>,
}

impl<E> NumericRangeFilter<E> {
    pub fn empty(name: impl Into<String>, extract: NumericExtractor<E>) -> Self {
        Self {
            name: name.into(),
            from: None,
            to: None,
            extract,
        }
    }

    #[must_use]
    pub fn with_range(mut self, from: Option<f64>, to: Option<f64>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn from(&self) -> Option<f64> {
        self.from
    }

    pub fn to(&self) -> Option<f64> {
        self.to
    }
}

impl<E: 'static> DataFilter<E> for NumericRangeFilter<E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    fn matches(&self, item: &E) -> bool {
        if self.is_empty() {
            return true;
        }
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return false;
        }
        let Some(value) = (self.extract)(item) else {
            return false;
        };
        self.from.is_none_or(|from| value >= from) && self.to.is_none_or(|to| value <= to)
    }

    fn narrowed_to(&self, items: &[&E]) -> Box<dyn DataFilter<E>> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut seen = false;
        for item in items {
            if let Some(value) = (self.extract)(item) {
                min = min.min(value);
                max = max.max(value);
                seen = true;
            }
        }
        let narrowed = if seen {
            Self::empty(self.name.clone(), Arc::clone(&self.extract))
                .with_range(Some(min), Some(max))
        } else {
            Self::empty(self.name.clone(), Arc::clone(&self.extract))
        };
        Box::new(narrowed)
    }
}

/// Closed date range `[from, to]` over an extracted date.
pub struct DateRangeFilter<E> {
    name: String,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    extract: DateExtractor<E>,
}

impl<E> DateRangeFilter<E> {
    pub fn empty(name: impl Into<String>, extract: DateExtractor<E>) -> Self {
        Self {
            name: name.into(),
            from: None,
            to: None,
            extract,
        }
    }

    #[must_use]
    pub fn with_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }
}

impl<E: 'static> DataFilter<E> for DateRangeFilter<E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    fn matches(&self, item: &E) -> bool {
        if self.is_empty() {
            return true;
        }
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return false;
        }
        let Some(value) = (self.extract)(item) else {
            return false;
        };
        self.from.is_none_or(|from| value >= from) && self.to.is_none_or(|to| value <= to)
    }

    fn narrowed_to(&self, items: &[&E]) -> Box<dyn DataFilter<E>> {
        let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
        for item in items {
            if let Some(value) = (self.extract)(item) {
                bounds = Some(match bounds {
                    None => (value, value),
                    Some((min, max)) => (min.min(value), max.max(value)),
                });
            }
        }
        let narrowed = match bounds {
            Some((min, max)) => Self::empty(self.name.clone(), Arc::clone(&self.extract))
                .with_range(Some(min), Some(max)),
            None => Self::empty(self.name.clone(), Arc::clone(&self.extract)),
        };
        Box::new(narrowed)
    }
}

/// Explicit accepted-value set over an extracted display value.
pub struct ValueSetFilter<E> {
    name: String,
    /// `None` accepts every value; `Some` restricts to the listed values.
    values: Option<BTreeSet<String>>,
    extract: TextExtractor<E>,
}

impl<E> ValueSetFilter<E> {
    pub fn empty(name: impl Into<String>, extract: TextExtractor<E>) -> Self {
        Self {
            name: name.into(),
            values: None,
            extract,
        }
    }

    #[must_use]
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn values(&self) -> Option<&BTreeSet<String>> {
        self.values.as_ref()
    }
}

impl<E: 'static> DataFilter<E> for ValueSetFilter<E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_empty(&self) -> bool {
        self.values.is_none()
    }

    fn matches(&self, item: &E) -> bool {
        let Some(accepted) = &self.values else {
            return true;
        };
        match (self.extract)(item) {
            Some(value) => accepted.contains(&value),
            None => false,
        }
    }

    fn narrowed_to(&self, items: &[&E]) -> Box<dyn DataFilter<E>> {
        let surviving: BTreeSet<String> = items
            .iter()
            .filter_map(|item| (self.extract)(item))
            .collect();
        Box::new(
            Self::empty(self.name.clone(), Arc::clone(&self.extract)).with_values(surviving),
        )
    }
}

/// An ordered collection of filters applied conjunctively.
pub struct Filters<E> {
    filters: Vec<Box<dyn DataFilter<E>>>,
}

impl<E> Filters<E> {
    /// The filter set that accepts everything.
    pub fn empty() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, filter: Box<dyn DataFilter<E>>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn push(&mut self, filter: Box<dyn DataFilter<E>>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.iter().all(|f| f.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn DataFilter<E>> {
        self.filters.iter().map(|filter| filter.as_ref())
    }

    /// True iff the item passes every filter.
    pub fn matches(&self, item: &E) -> bool {
        self.filters.iter().all(|f| f.matches(item))
    }

    /// True iff the item passes every filter except the one at `skip`.
    pub fn matches_except(&self, item: &E, skip: usize) -> bool {
        self.filters
            .iter()
            .enumerate()
            .all(|(idx, f)| idx == skip || f.matches(item))
    }
}

impl<E> Default for Filters<E> {
    fn default() -> Self {
        Self::empty()
    }
}

/// The filtered subset paired with the size of the pre-filter set.
pub struct FilterResult<'a, E> {
    items: Vec<&'a E>,
    source_count: usize,
}

impl<'a, E> FilterResult<'a, E> {
    pub fn new(items: Vec<&'a E>, source_count: usize) -> Self {
        Self {
            items,
            source_count,
        }
    }

    pub fn items(&self) -> &[&'a E] {
        &self.items
    }

    pub fn filtered_count(&self) -> usize {
        self.items.len()
    }

    pub fn source_count(&self) -> usize {
        self.source_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_filter() -> NumericRangeFilter<f64> {
        NumericRangeFilter::empty("value", Arc::new(|v: &f64| Some(*v)))
    }

    #[test]
    fn empty_range_accepts_everything() {
        let filter = value_filter();
        assert!(filter.is_empty());
        assert!(filter.matches(&1.5));
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let filter = value_filter().with_range(Some(10.0), Some(5.0));
        assert!(!filter.matches(&7.0));
        assert!(!filter.matches(&10.0));
    }

    #[test]
    fn range_bounds_are_closed() {
        let filter = value_filter().with_range(Some(5.0), Some(10.0));
        assert!(filter.matches(&5.0));
        assert!(filter.matches(&10.0));
        assert!(!filter.matches(&10.5));
    }

    #[test]
    fn narrowing_recomputes_bounds() {
        let filter = value_filter().with_range(Some(0.0), Some(100.0));
        let values = [3.0, 9.0, 6.0];
        let refs: Vec<&f64> = values.iter().collect();
        let narrowed = filter.narrowed_to(&refs);
        assert!(narrowed.matches(&3.0));
        assert!(narrowed.matches(&9.0));
        assert!(!narrowed.matches(&2.9));
    }

    #[test]
    fn set_filter_narrow_and_match() {
        let filter: ValueSetFilter<String> =
            ValueSetFilter::empty("code", Arc::new(|s: &String| Some(s.clone())));
        assert!(filter.matches(&"A".to_string()));

        let restricted = ValueSetFilter::empty("code", Arc::new(|s: &String| Some(s.clone())))
            .with_values(["A", "B"]);
        assert!(restricted.matches(&"A".to_string()));
        assert!(!restricted.matches(&"C".to_string()));
    }

    #[test]
    fn filters_conjunction() {
        let filters: Filters<f64> = Filters::empty()
            .with(Box::new(value_filter().with_range(Some(0.0), Some(10.0))))
            .with(Box::new(value_filter().with_range(Some(5.0), None)));

        assert!(filters.matches(&7.0));
        assert!(!filters.matches(&3.0));
        assert!(filters.matches_except(&3.0, 1));
    }
}
