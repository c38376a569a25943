use crate::RecordKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// Records returned by a query. Id lookups yield `Single`, filtered or full
/// listings yield `Many`; callers branch on the shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultSet<R> {
    Single(R),
    Many(Vec<R>),
}

impl<R> ResultSet<R> {
    pub fn len(&self) -> usize {
        match self {
            ResultSet::Single(_) => 1,
            ResultSet::Many(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[R] {
        match self {
            ResultSet::Single(record) => std::slice::from_ref(record),
            ResultSet::Many(records) => records,
        }
    }

    pub fn into_vec(self) -> Vec<R> {
        match self {
            ResultSet::Single(record) => vec![record],
            ResultSet::Many(records) => records,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Outcome<R> {
    Facts(BTreeMap<&'static str, ResultSet<R>>),
    Failed { failed: bool, error: String },
}

/// Caller-visible result of one query. `changed` is always false: queries
/// never mutate the inventory.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<R> {
    pub changed: bool,
    #[serde(flatten)]
    pub outcome: Outcome<R>,
}

impl<R> Envelope<R> {
    pub fn success(kind: RecordKind, result: ResultSet<R>) -> Self {
        let mut facts = BTreeMap::new();
        facts.insert(kind.facts_key(), result);
        Self {
            changed: false,
            outcome: Outcome::Facts(facts),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            changed: false,
            outcome: Outcome::Failed {
                failed: true,
                error: message.into(),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failed { error, .. } => Some(error),
            Outcome::Facts(_) => None,
        }
    }

    pub fn result(&self) -> Option<&ResultSet<R>> {
        match &self.outcome {
            Outcome::Facts(facts) => facts.values().next(),
            Outcome::Failed { .. } => None,
        }
    }
}
