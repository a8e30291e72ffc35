//! Rendering entity trees back into YAML values.
//!
//! Empty entities are placeholders from partially-specified input and vanish
//! on round-trip: sequence dumps filter them out. When an empty entity is
//! dumped directly anyway, its fields attach in "always" mode with explicit
//! nulls so the block stays symmetric instead of partial.

use chrono::NaiveDateTime;
use serde_yaml::{Mapping, Value};

use crate::models::{LogEntry, Story, Task};

const RECORD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn dump_story(story: &Story) -> Value {
    let always = story.is_empty();
    let mut map = Mapping::new();
    put_text(&mut map, "story-id", story.story_id.as_deref(), always);
    put_text(&mut map, "story", story.story.as_deref(), always);
    put_text(&mut map, "note", story.note.as_deref(), always);
    put_text(&mut map, "order", story.imp_order(), always);
    put_text(&mut map, "value", story.imp_value.as_deref(), always);
    put_integer(&mut map, "point", story.point, always);
    put_text(&mut map, "demo-method", story.demo_method.as_deref(), always);
    put_children(&mut map, "sub-story", dump_stories(&story.substories), always);
    put_children(&mut map, "task", dump_tasks(&story.tasks), always);
    put_children(&mut map, "log", dump_logs(&story.logs), always);
    Value::Mapping(map)
}

pub fn dump_task(task: &Task) -> Value {
    let always = task.is_empty();
    let mut map = Mapping::new();
    put_text(&mut map, "t-id", task.task_id.as_deref(), always);
    put_text(&mut map, "t", task.task.as_deref(), always);
    put_text(&mut map, "note", task.note.as_deref(), always);
    put_integer(&mut map, "estimated-time", task.estimated_time, always);
    put_integer(&mut map, "point", task.point, always);
    put_text(&mut map, "status", task.status.as_deref(), always);
    put_text(&mut map, "test-method", task.test_method.as_deref(), always);
    put_children(&mut map, "sub-task", dump_tasks(&task.subtasks), always);
    put_children(&mut map, "log", dump_logs(&task.logs), always);
    Value::Mapping(map)
}

pub fn dump_log(log: &LogEntry) -> Value {
    let always = log.is_empty();
    let mut map = Mapping::new();
    put_text(&mut map, "l-id", log.log_id.as_deref(), always);
    put_text(&mut map, "l", log.log.as_deref(), always);
    put_record_time(&mut map, log.record_time, always);
    put_text(&mut map, "author", log.author.as_deref(), always);
    put_text(&mut map, "action", log.action.as_deref(), always);
    Value::Mapping(map)
}

/// Dump every non-empty story, in order. Empty stories are elided.
pub fn dump_stories(stories: &[Story]) -> Vec<Value> {
    stories
        .iter()
        .filter(|story| !story.is_empty())
        .map(dump_story)
        .collect()
}

/// Dump every non-empty task, in order. Empty tasks are elided.
pub fn dump_tasks(tasks: &[Task]) -> Vec<Value> {
    tasks
        .iter()
        .filter(|task| !task.is_empty())
        .map(dump_task)
        .collect()
}

/// Dump every non-empty log, in order. Empty logs are elided.
pub fn dump_logs(logs: &[LogEntry]) -> Vec<Value> {
    logs.iter()
        .filter(|log| !log.is_empty())
        .map(dump_log)
        .collect()
}

fn put_text(map: &mut Mapping, key: &str, value: Option<&str>, always: bool) {
    match value {
        Some(text) => {
            map.insert(Value::from(key), Value::from(text));
        }
        None if always => {
            map.insert(Value::from(key), Value::Null);
        }
        None => {}
    }
}

fn put_integer(map: &mut Mapping, key: &str, value: Option<i64>, always: bool) {
    match value {
        Some(number) => {
            map.insert(Value::from(key), Value::from(number));
        }
        None if always => {
            map.insert(Value::from(key), Value::Null);
        }
        None => {}
    }
}

fn put_record_time(map: &mut Mapping, value: Option<NaiveDateTime>, always: bool) {
    match value {
        Some(stamp) => {
            map.insert(
                Value::from("record-time"),
                Value::from(stamp.format(RECORD_TIME_FORMAT).to_string()),
            );
        }
        None if always => {
            map.insert(Value::from("record-time"), Value::Null);
        }
        None => {}
    }
}

fn put_children(map: &mut Mapping, key: &str, children: Vec<Value>, always: bool) {
    if !children.is_empty() {
        map.insert(Value::from(key), Value::Sequence(children));
    } else if always {
        map.insert(Value::from(key), Value::Null);
    }
}
