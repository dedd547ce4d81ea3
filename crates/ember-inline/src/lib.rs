//! Arity-gated call-site inlining for ember core programs.
//!
//! The pass consults a read-only [`Inlines`] database and replaces references
//! to non-recursive candidates whose call sites are saturated. See
//! [`inline_program`] for the entry point and [`trace`] for observing
//! decisions.

#![deny(clippy::unwrap_used)]

mod arity;
mod candidates;
mod freshen;
mod options;
mod pass;
pub mod trace;

pub use arity::{derive_arity, Arity};
pub use candidates::{InlineDef, Inlines};
pub use freshen::freshen_binders;
pub use options::{read_inline_options, InlineConfigError, InlineOptions, TRACE_ENV_VAR};
pub use pass::{inline_program, inline_program_observed};
pub use trace::{
    Decision, InlineEvent, InlineObserver, NoopSink, RecordingSink, RejectReason, TracingSink,
};
