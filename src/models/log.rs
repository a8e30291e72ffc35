use chrono::NaiveDateTime;

/// A timestamped record attached to a story or a task.
///
/// Logs are never assigned identifiers by the allocator; `log_id` survives
/// only when the document already carried one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogEntry {
    pub log_id: Option<String>,
    /// The log message text.
    pub log: Option<String>,
    pub record_time: Option<NaiveDateTime>,
    pub author: Option<String>,
    pub action: Option<String>,
}

impl LogEntry {
    /// The canonical empty log: no identifier, message, author, or action.
    /// A bare timestamp does not count as content.
    pub fn is_empty(&self) -> bool {
        self.log_id.is_none()
            && self.log.is_none()
            && self.author.is_none()
            && self.action.is_none()
    }
}
