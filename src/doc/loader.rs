//! Recursive normalization of raw document nodes into entity trees.
//!
//! All three loaders follow one contract, polymorphic over input shape:
//! a sequence loads each element and concatenates in order; non-blank bare
//! text wraps itself as `{primary-field: text}` and re-enters the mapping
//! branch; a mapping is accepted when any recognized key is present, even if
//! its value coerces to absent. Unrecognized keys are ignored and anything
//! else is noise yielding an empty result.

use serde_yaml::{Mapping, Value};

use crate::coerce;
use crate::ident::IdRegistry;
use crate::models::{normalize_status, LogEntry, Story, Task};

/// Scoped state for one load-to-dump cycle: the shared identifier registry
/// plus the sequence counter that stamps creation order onto entities.
///
/// Never reuse a context across loads of unrelated documents, or collision
/// checks will see stale entries from the prior tree.
#[derive(Debug, Default)]
pub struct LoadContext {
    pub registry: IdRegistry,
    next_seq: u64,
}

impl LoadContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// Load stories from a node of any shape.
pub fn load_stories(ctx: &mut LoadContext, node: &Value) -> Vec<Story> {
    match node {
        Value::Sequence(items) => items
            .iter()
            .flat_map(|item| load_stories(ctx, item))
            .collect(),
        Value::String(text) => match wrap_bare_text(text, "story") {
            Some(wrapped) => load_stories(ctx, &wrapped),
            None => Vec::new(),
        },
        Value::Mapping(_) => load_story_mapping(ctx, node),
        _ => Vec::new(),
    }
}

/// Load tasks from a node of any shape.
pub fn load_tasks(ctx: &mut LoadContext, node: &Value) -> Vec<Task> {
    match node {
        Value::Sequence(items) => items
            .iter()
            .flat_map(|item| load_tasks(ctx, item))
            .collect(),
        Value::String(text) => match wrap_bare_text(text, "t") {
            Some(wrapped) => load_tasks(ctx, &wrapped),
            None => Vec::new(),
        },
        Value::Mapping(_) => load_task_mapping(ctx, node),
        _ => Vec::new(),
    }
}

/// Load logs from a node of any shape.
pub fn load_logs(ctx: &mut LoadContext, node: &Value) -> Vec<LogEntry> {
    match node {
        Value::Sequence(items) => items.iter().flat_map(|item| load_logs(ctx, item)).collect(),
        Value::String(text) => match wrap_bare_text(text, "l") {
            Some(wrapped) => load_logs(ctx, &wrapped),
            None => Vec::new(),
        },
        Value::Mapping(_) => load_log_mapping(node),
        _ => Vec::new(),
    }
}

fn wrap_bare_text(text: &str, primary_key: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut wrapped = Mapping::new();
    wrapped.insert(Value::from(primary_key), Value::from(trimmed));
    Some(Value::Mapping(wrapped))
}

fn load_story_mapping(ctx: &mut LoadContext, node: &Value) -> Vec<Story> {
    let mut accepted = false;
    let mut recognize = |key: &str| {
        let value = node.get(key);
        accepted |= value.is_some();
        value
    };

    let story_id = recognize("story-id").and_then(coerce::as_text);
    let story = recognize("story").and_then(coerce::as_text);
    let note = recognize("note").and_then(coerce::as_text);
    let imp_order = recognize("order").and_then(coerce::as_text);
    let imp_value = recognize("value").and_then(coerce::as_text);
    let point = recognize("point").and_then(coerce::as_integer);
    let demo_method = recognize("demo-method").and_then(coerce::as_text);
    let substories = recognize("sub-story").cloned();
    let tasks = recognize("task").cloned();
    let logs = recognize("log").cloned();

    if !accepted {
        return Vec::new();
    }

    let mut entity = Story::new(ctx.next_seq());
    entity.story_id = story_id;
    entity.story = story;
    entity.note = note;
    entity.set_imp_order(imp_order);
    entity.imp_value = imp_value;
    entity.point = point;
    entity.demo_method = demo_method;
    // Tasks before sub-stories keeps creation order equal to the pre-order
    // walk used by the deferred identifier pass.
    if let Some(node) = tasks {
        entity.tasks = load_tasks(ctx, &node);
    }
    if let Some(node) = substories {
        entity.substories = load_stories(ctx, &node);
    }
    if let Some(node) = logs {
        entity.logs = load_logs(ctx, &node);
    }
    vec![entity]
}

fn load_task_mapping(ctx: &mut LoadContext, node: &Value) -> Vec<Task> {
    let mut accepted = false;
    let mut recognize = |key: &str| {
        let value = node.get(key);
        accepted |= value.is_some();
        value
    };

    let task_id = recognize("t-id").and_then(coerce::as_text);
    let task = recognize("t").and_then(coerce::as_text);
    let note = recognize("note").and_then(coerce::as_text);
    let estimated_time = recognize("estimated-time").and_then(coerce::as_integer);
    let point = recognize("point").and_then(coerce::as_integer);
    let status = recognize("status").and_then(coerce::as_text);
    let test_method = recognize("test-method").and_then(coerce::as_text);
    let subtasks = recognize("sub-task").cloned();
    let logs = recognize("log").cloned();

    if !accepted {
        return Vec::new();
    }

    let mut entity = Task::new(ctx.next_seq());
    entity.task_id = task_id;
    entity.task = task;
    entity.note = note;
    entity.estimated_time = estimated_time;
    entity.point = point;
    entity.status = normalize_status(status);
    entity.test_method = test_method;
    if let Some(node) = subtasks {
        entity.subtasks = load_tasks(ctx, &node);
    }
    if let Some(node) = logs {
        entity.logs = load_logs(ctx, &node);
    }
    vec![entity]
}

fn load_log_mapping(node: &Value) -> Vec<LogEntry> {
    let mut accepted = false;
    let mut recognize = |key: &str| {
        let value = node.get(key);
        accepted |= value.is_some();
        value
    };

    let log_id = recognize("l-id").and_then(coerce::as_text);
    let log = recognize("l").and_then(coerce::as_text);
    let record_time = recognize("record-time").and_then(coerce::as_datetime);
    let author = recognize("author").and_then(coerce::as_text);
    let action = recognize("action").and_then(coerce::as_text);

    if !accepted {
        return Vec::new();
    }

    vec![LogEntry {
        log_id,
        log,
        record_time,
        author,
        action,
    }]
}
