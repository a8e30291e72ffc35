use crate::coerce;
use crate::ident::Identifiable;
use crate::models::{is_blank_label, LogEntry};

/// A unit of work under a story.
///
/// Tasks nest via sub-tasks and own their logs. Status is free text; the
/// literal `"new"` is a normalization sentinel and never survives loading
/// (see [`normalize_status`]), while a `DONE ...` prefix marks completion.
#[derive(Debug, Clone, Default)]
pub struct Task {
    pub task_id: Option<String>,
    /// The task title text, also the defining field for identifier
    /// signatures.
    pub task: Option<String>,
    pub note: Option<String>,
    /// Estimated effort, e.g. hours.
    pub estimated_time: Option<i64>,
    pub point: Option<i64>,
    pub status: Option<String>,
    pub test_method: Option<String>,
    pub subtasks: Vec<Task>,
    pub logs: Vec<LogEntry>,
    pub(crate) seq: u64,
}

impl Task {
    pub fn new(seq: u64) -> Self {
        Self {
            seq,
            ..Self::default()
        }
    }

    pub fn is_done(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| coerce::has_prefix_word(status, "DONE"))
    }

    /// True when the task carries no persistable information.
    pub fn is_empty(&self) -> bool {
        self.task_id.is_none()
            && self.task.is_none()
            && self.note.is_none()
            && self.test_method.is_none()
            && self.estimated_time.is_none()
            && self.point.is_none()
            && is_blank_label(&self.status)
            && self.subtasks.is_empty()
            && self.logs.is_empty()
    }
}

/// The literal status `"new"` (exact, case-sensitive) means "no status yet"
/// and normalizes to absent.
pub fn normalize_status(status: Option<String>) -> Option<String> {
    status.filter(|s| s != "new")
}

impl Identifiable for Task {
    fn object_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    fn set_object_id(&mut self, id: String) {
        self.task_id = Some(id);
    }

    // Children are deliberately excluded, matching the story signature rule.
    fn signature(&self) -> Option<String> {
        let task = self.task.as_deref()?;
        Some(format!(
            "t:{task}|note:{:?}|estimated-time:{:?}|point:{:?}|status:{:?}|test-method:{:?}",
            self.note, self.estimated_time, self.point, self.status, self.test_method
        ))
    }

    fn handle(&self) -> u64 {
        self.seq
    }
}
