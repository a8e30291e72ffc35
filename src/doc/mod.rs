//! Loading and dumping of the backlog document tree.
//!
//! [`loader`] normalizes heterogeneous YAML input (bare text, mappings,
//! sequences) into entity trees; [`dumper`] renders entities back into YAML
//! values, eliding empty ones; [`emit`] writes the value tree as text with
//! literal block style for multi-line scalars.

pub mod dumper;
pub mod emit;
pub mod loader;

pub use dumper::{dump_log, dump_logs, dump_stories, dump_story, dump_task, dump_tasks};
pub use loader::{load_logs, load_stories, load_tasks, LoadContext};
