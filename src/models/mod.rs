//! Domain models for the backlog document.
//!
//! # Core Concepts
//!
//! - [`Story`]: A backlog story. Stories form a tree (sub-stories) and own
//!   their tasks and logs.
//! - [`Task`]: A unit of work under a story. Tasks nest (sub-tasks) and own
//!   their logs.
//! - [`LogEntry`]: A timestamped record attached to a story or a task.
//!
//! Containment is strictly hierarchical: every child lives in exactly one
//! parent collection, expressed as plain owned `Vec` fields per type rather
//! than a shared container hierarchy.
//!
//! Each story and task carries a load sequence number stamped at
//! construction; the deferred identifier pass runs in that creation order and
//! the registry records it as the entity handle.

mod log;
mod story;
mod task;

pub use log::*;
pub use story::*;
pub use task::*;

/// Sentinel labels that count as "nothing there" when deciding emptiness.
/// Compared case-insensitively, on top of true absence.
const BLANK_LABELS: &[&str] = &["NA", "N/A", "NEW", "-"];

pub(crate) fn is_blank_label(value: &Option<String>) -> bool {
    match value {
        None => true,
        Some(label) => BLANK_LABELS
            .iter()
            .any(|blank| label.eq_ignore_ascii_case(blank)),
    }
}
