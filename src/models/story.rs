use crate::ident::Identifiable;
use crate::models::{is_blank_label, LogEntry, Task};

/// A backlog story.
///
/// Stories are the unit of product planning. Any story can hold sub-stories,
/// tasks, and logs; the tree is strictly hierarchical with no shared
/// ownership.
///
/// Every scalar field is optional because documents are hand-edited and load
/// partially-specified entries without complaint. A story whose fields are
/// all absent (see [`Story::is_empty`]) collapses to nothing on dump instead
/// of reappearing as a blank record.
#[derive(Debug, Clone, Default)]
pub struct Story {
    pub story_id: Option<String>,
    /// The story title text, also the defining field for identifier
    /// signatures.
    pub story: Option<String>,
    pub note: Option<String>,
    /// Priority-order label, preserved verbatim. The derived sort key comes
    /// only from this label, never from input.
    imp_order: Option<String>,
    pub imp_value: Option<String>,
    pub point: Option<i64>,
    pub demo_method: Option<String>,
    sort_key: Option<i64>,
    pub substories: Vec<Story>,
    pub tasks: Vec<Task>,
    pub logs: Vec<LogEntry>,
    pub(crate) seq: u64,
}

impl Story {
    pub fn new(seq: u64) -> Self {
        Self {
            seq,
            ..Self::default()
        }
    }

    pub fn imp_order(&self) -> Option<&str> {
        self.imp_order.as_deref()
    }

    /// Set the priority-order label and re-derive the sort key from it.
    pub fn set_imp_order(&mut self, label: Option<String>) {
        self.sort_key = label.as_deref().and_then(order_sort_key);
        self.imp_order = label;
    }

    /// Numeric sort key derived solely from the order label:
    /// `HIGH` 9, `NORMAL` 5, `LOG` 1, anything else absent.
    pub fn sort_key(&self) -> Option<i64> {
        self.sort_key
    }

    /// True when the story carries no persistable information: no identity,
    /// no text, sentinel-or-absent labels, and no children.
    pub fn is_empty(&self) -> bool {
        self.story_id.is_none()
            && self.story.is_none()
            && self.note.is_none()
            && self.demo_method.is_none()
            && self.point.is_none()
            && is_blank_label(&self.imp_order)
            && is_blank_label(&self.imp_value)
            && self.substories.is_empty()
            && self.tasks.is_empty()
            && self.logs.is_empty()
    }
}

fn order_sort_key(label: &str) -> Option<i64> {
    match label.to_ascii_uppercase().as_str() {
        "HIGH" => Some(9),
        "NORMAL" => Some(5),
        "LOG" => Some(1),
        _ => None,
    }
}

impl Identifiable for Story {
    fn object_id(&self) -> Option<&str> {
        self.story_id.as_deref()
    }

    fn set_object_id(&mut self, id: String) {
        self.story_id = Some(id);
    }

    // Children are deliberately excluded so a story's identifier does not
    // shift when sub-items are added.
    fn signature(&self) -> Option<String> {
        let story = self.story.as_deref()?;
        Some(format!(
            "story:{story}|note:{:?}|order:{:?}|value:{:?}|point:{:?}|demo-method:{:?}",
            self.note, self.imp_order, self.imp_value, self.point, self.demo_method
        ))
    }

    fn handle(&self) -> u64 {
        self.seq
    }
}
