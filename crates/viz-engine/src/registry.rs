//! Per-domain registry of selectable group-by dimensions.

use viz_model::{EngineError, Event, GroupByOption, RawValue, Result};

/// The dimensions one clinical event type declares.
///
/// Lookup is case-insensitive. Asking for an option the domain never
/// declared is a caller bug and surfaces immediately as an error; it is
/// never silently recovered.
pub struct GroupByRegistry<T> {
    domain: &'static str,
    options: Vec<GroupByOption<T>>,
}

impl<T> GroupByRegistry<T> {
    pub fn new(domain: &'static str) -> Self {
        Self {
            domain,
            options: Vec::new(),
        }
    }

    pub fn domain(&self) -> &'static str {
        self.domain
    }

    /// Register an option. A later registration with the same name replaces
    /// the earlier one.
    #[must_use]
    pub fn register(mut self, option: GroupByOption<T>) -> Self {
        if let Some(existing) = self
            .options
            .iter_mut()
            .find(|o| o.name.eq_ignore_ascii_case(option.name))
        {
            *existing = option;
        } else {
            self.options.push(option);
        }
        self
    }

    pub fn get(&self, name: &str) -> Result<&GroupByOption<T>> {
        self.options
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| EngineError::UnknownOption {
                option: name.to_string(),
                domain: self.domain.to_string(),
            })
    }

    /// Extract a raw value by option name.
    pub fn extract(&self, name: &str, event: &Event<T>) -> Result<RawValue> {
        Ok(self.get(name)?.extract(event))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.options.iter().map(|o| o.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupByOption<T>> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use viz_model::{GroupByKind, Subject};

    fn identity(event: &Event<i64>) -> RawValue {
        RawValue::Int(*event.record())
    }

    fn registry() -> GroupByRegistry<i64> {
        GroupByRegistry::new("test").register(GroupByOption::new(
            "VALUE",
            GroupByKind::Numeric,
            identity,
        ))
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = registry();
        assert!(registry.get("value").is_ok());
        assert!(registry.get("VALUE").is_ok());
    }

    #[test]
    fn unknown_option_is_an_error() {
        let registry = registry();
        let err = registry.get("NOPE").unwrap_err();
        assert!(matches!(err, EngineError::UnknownOption { .. }));
        assert!(err.to_string().contains("NOPE"));
    }

    #[test]
    fn reregistration_replaces() {
        fn negate(event: &Event<i64>) -> RawValue {
            RawValue::Int(-*event.record())
        }
        let registry = registry().register(GroupByOption::new(
            "value",
            GroupByKind::Numeric,
            negate,
        ));
        assert_eq!(registry.len(), 1);

        let subject = Arc::new(Subject::new("S1", "C1", "ST"));
        let event = Event::new("e1", subject, 5i64);
        assert_eq!(registry.extract("VALUE", &event).unwrap(), RawValue::Int(-5));
    }
}
