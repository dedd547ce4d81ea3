//! Observer hook receiving one event per call-site decision.
//!
//! Events are advisory: the pass produces the same program whichever sink is
//! installed, including [`NoopSink`].

use ember_base::Name;
use serde::Serialize;

use crate::arity::Arity;

/// What the inliner did at a call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// The reference was replaced by the candidate's stored body.
    Inlined { arity: Arity },
    /// The name is not in the candidate database.
    NotCandidate,
    /// A candidate exists but the call site does not qualify.
    Rejected {
        #[serde(flatten)]
        reason: RejectReason,
    },
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Inlined { .. } => "inlined",
            Decision::NotCandidate => "not_candidate",
            Decision::Rejected { .. } => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    Recursive,
    UnderSaturated { required: Arity },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineEvent {
    pub name: Name,
    /// Enclosing definitions, outermost first.
    pub current_def: Vec<Name>,
    /// Type and value arguments the call site supplies.
    pub available: Arity,
    #[serde(flatten)]
    pub decision: Decision,
    pub message: String,
}

impl InlineEvent {
    pub fn current_def_path(&self) -> String {
        self.current_def
            .iter()
            .map(Name::as_str)
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

pub trait InlineObserver {
    /// Whether events should be built at all. Returning `false` lets the pass
    /// skip message rendering.
    fn enabled(&self) -> bool {
        true
    }

    fn observe(&mut self, event: InlineEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl InlineObserver for NoopSink {
    fn enabled(&self) -> bool {
        false
    }

    fn observe(&mut self, _event: InlineEvent) {}
}

/// Forwards events to `tracing` at debug level under the `ember::inline` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl InlineObserver for TracingSink {
    fn observe(&mut self, event: InlineEvent) {
        tracing::debug!(
            target: "ember::inline",
            decision = event.decision.label(),
            name = %event.name,
            current_def = %event.current_def_path(),
            type_args = event.available.types,
            value_args = event.available.values,
            "{}",
            event.message
        );
    }
}

/// Keeps every event in order; used by tests and `--trace` style dumps.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<InlineEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inlined(&self) -> impl Iterator<Item = &InlineEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e.decision, Decision::Inlined { .. }))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.events).unwrap_or(serde_json::Value::Null)
    }
}

impl InlineObserver for RecordingSink {
    fn observe(&mut self, event: InlineEvent) {
        self.events.push(event);
    }
}
