use crate::subject::Subject;
use std::sync::Arc;

/// A typed clinical event: one raw domain record paired with its owning
/// subject.
///
/// Identity is the event id, unique within a dataset. Events are created at
/// load time and never mutated; the subject is shared, not owned.
#[derive(Debug, Clone)]
pub struct Event<T> {
    id: String,
    subject: Arc<Subject>,
    record: T,
}

impl<T> Event<T> {
    pub fn new(id: impl Into<String>, subject: Arc<Subject>, record: T) -> Self {
        Self {
            id: id.into(),
            subject,
            record,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn subject_id(&self) -> &str {
        &self.subject.subject_id
    }

    pub fn record(&self) -> &T {
        &self.record
    }
}
