//! Hierarchical product backlog kept in a hand-editable YAML document.
//!
//! Stories contain sub-stories, tasks, and logs; tasks contain sub-tasks and
//! logs. Entities that lack an explicit identifier get a content-addressed
//! one, derived deterministically from a signature of their own fields. The
//! whole document is read, mutated, and rewritten within one invocation.
//!
//! - [`models`]: the Story / Task / LogEntry record types.
//! - [`coerce`]: lossy coercion of hand-edited fields into typed values.
//! - [`ident`]: deterministic identifier allocation with collision retry.
//! - [`doc`]: recursive load of heterogeneous input and the symmetric dump.
//! - [`project`]: the document root, the deferred identifier pass, and the
//!   command-facing mutations.
//! - [`config`] / [`backup`]: runtime configuration and backup rotation.

pub mod backup;
pub mod coerce;
pub mod config;
pub mod doc;
pub mod ident;
pub mod models;
pub mod project;
