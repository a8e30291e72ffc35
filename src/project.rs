//! The persisted document root and the command-facing operations over it.
//!
//! A backlog document is read and rewritten wholesale within one invocation:
//! parse → [`load_backlog`] → mutate → [`assign_ids`] → [`dump_backlog`] →
//! emit. Each cycle gets its own [`LoadContext`].

use chrono::NaiveDateTime;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::doc::dumper::dump_stories;
use crate::doc::loader::{load_stories, LoadContext};
use crate::ident::allocate_object_id;
use crate::models::{LogEntry, Story, Task};

/// Top-level key wrapping the story sequence in the persisted document.
pub const ROOT_KEY: &str = "product-backlog";

#[derive(Debug, Error)]
pub enum BacklogError {
    /// A command referenced an identifier that is not in the document. The
    /// document must not be mutated or persisted after this.
    #[error("no story or task with identifier {0:?}")]
    UnknownIdentifier(String),
}

/// The loaded document root: the top-level story collection.
#[derive(Debug, Default)]
pub struct Backlog {
    pub stories: Vec<Story>,
}

/// Load the document root. A `product-backlog` key is unwrapped when
/// present; otherwise the whole root is treated as a story collection.
/// A null root (fresh or blank file) is an empty backlog; a scalar-noise
/// root is fatal so the rewrite cycle can never wipe a document it could
/// not actually read.
pub fn load_backlog(ctx: &mut LoadContext, doc: &Value) -> anyhow::Result<Backlog> {
    let root = doc.get(ROOT_KEY).unwrap_or(doc);
    let stories = load_stories(ctx, root);
    if stories.is_empty() && !matches!(root, Value::Null | Value::Sequence(_) | Value::Mapping(_)) {
        anyhow::bail!("document root is not a story collection");
    }
    Ok(Backlog { stories })
}

/// Deferred identifier assignment: one pass over every story created during
/// the load, then one over every task, each in creation order. The loader
/// constructs parents before children, so creation order is the pre-order
/// walk taken here.
pub fn assign_ids(ctx: &mut LoadContext, backlog: &mut Backlog) -> anyhow::Result<()> {
    for story in &mut backlog.stories {
        assign_story_ids(story, ctx)?;
    }
    for story in &mut backlog.stories {
        assign_task_ids_in_story(story, ctx)?;
    }
    Ok(())
}

fn assign_story_ids(story: &mut Story, ctx: &mut LoadContext) -> anyhow::Result<()> {
    allocate_object_id(story, 'C', &mut ctx.registry)?;
    for child in &mut story.substories {
        assign_story_ids(child, ctx)?;
    }
    Ok(())
}

fn assign_task_ids_in_story(story: &mut Story, ctx: &mut LoadContext) -> anyhow::Result<()> {
    for task in &mut story.tasks {
        assign_task_ids(task, ctx)?;
    }
    for child in &mut story.substories {
        assign_task_ids_in_story(child, ctx)?;
    }
    Ok(())
}

fn assign_task_ids(task: &mut Task, ctx: &mut LoadContext) -> anyhow::Result<()> {
    allocate_object_id(task, 'T', &mut ctx.registry)?;
    for child in &mut task.subtasks {
        assign_task_ids(child, ctx)?;
    }
    Ok(())
}

/// Render the backlog as the persisted document root, eliding empty stories.
pub fn dump_backlog(backlog: &Backlog) -> Value {
    let mut root = Mapping::new();
    root.insert(
        Value::from(ROOT_KEY),
        Value::Sequence(dump_stories(&backlog.stories)),
    );
    Value::Mapping(root)
}

impl Backlog {
    pub fn find_story_mut(&mut self, id: &str) -> Option<&mut Story> {
        fn walk<'a>(stories: &'a mut [Story], id: &str) -> Option<&'a mut Story> {
            for story in stories {
                if story.story_id.as_deref() == Some(id) {
                    return Some(story);
                }
                if let Some(found) = walk(&mut story.substories, id) {
                    return Some(found);
                }
            }
            None
        }
        walk(&mut self.stories, id)
    }

    pub fn find_task_mut(&mut self, id: &str) -> Option<&mut Task> {
        fn walk_tasks<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
            for task in tasks {
                if task.task_id.as_deref() == Some(id) {
                    return Some(task);
                }
                if let Some(found) = walk_tasks(&mut task.subtasks, id) {
                    return Some(found);
                }
            }
            None
        }
        fn walk_stories<'a>(stories: &'a mut [Story], id: &str) -> Option<&'a mut Task> {
            for story in stories {
                if let Some(found) = walk_tasks(&mut story.tasks, id) {
                    return Some(found);
                }
                if let Some(found) = walk_stories(&mut story.substories, id) {
                    return Some(found);
                }
            }
            None
        }
        walk_stories(&mut self.stories, id)
    }

    /// Append a new story, top-level or under the given parent story.
    pub fn add_story(
        &mut self,
        ctx: &mut LoadContext,
        title: &str,
        parent: Option<&str>,
    ) -> Result<(), BacklogError> {
        let mut story = Story::new(ctx.next_seq());
        story.story = Some(title.trim().to_string());
        match parent {
            Some(id) => {
                let parent = self
                    .find_story_mut(id)
                    .ok_or_else(|| BacklogError::UnknownIdentifier(id.to_string()))?;
                parent.substories.push(story);
            }
            None => self.stories.push(story),
        }
        Ok(())
    }

    /// Append a new task under the story or task carrying `target`.
    pub fn add_task(
        &mut self,
        ctx: &mut LoadContext,
        title: &str,
        target: &str,
    ) -> Result<(), BacklogError> {
        let mut task = Task::new(ctx.next_seq());
        task.task = Some(title.trim().to_string());
        if let Some(story) = self.find_story_mut(target) {
            story.tasks.push(task);
            return Ok(());
        }
        if let Some(parent) = self.find_task_mut(target) {
            parent.subtasks.push(task);
            return Ok(());
        }
        Err(BacklogError::UnknownIdentifier(target.to_string()))
    }

    /// Mark a task complete: status becomes `DONE (<date>)` and a log entry
    /// is appended. A story target only gets the completion log, since
    /// stories carry no status of their own.
    pub fn mark_done(
        &mut self,
        id: &str,
        author: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<(), BacklogError> {
        let entry = LogEntry {
            log_id: None,
            log: Some(format!("completed {id}")),
            record_time: Some(now),
            author: author.map(str::to_string),
            action: Some("done".to_string()),
        };
        if let Some(task) = self.find_task_mut(id) {
            task.status = Some(format!("DONE ({})", now.format("%Y-%m-%d")));
            task.logs.push(entry);
            return Ok(());
        }
        if let Some(story) = self.find_story_mut(id) {
            story.logs.push(entry);
            return Ok(());
        }
        Err(BacklogError::UnknownIdentifier(id.to_string()))
    }
}
