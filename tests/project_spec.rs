use backlog::backup::rotate_backups;
use backlog::doc::{emit, LoadContext};
use backlog::project::{assign_ids, dump_backlog, load_backlog, BacklogError};
use serde_yaml::Value;
use speculate2::speculate;

fn yaml(raw: &str) -> Value {
    serde_yaml::from_str(raw).expect("valid test yaml")
}

speculate! {
    before {
        let mut ctx = LoadContext::new();
    }

    describe "assign_ids" {
        it "fills in missing story and task identifiers" {
            let mut backlog = load_backlog(&mut ctx, &yaml(
                "- story: a story\n  task:\n  - t: a task\n",
            )).expect("load failed");

            assign_ids(&mut ctx, &mut backlog).expect("assignment failed");

            let story_id = backlog.stories[0].story_id.as_deref().expect("no story id");
            let task_id = backlog.stories[0].tasks[0].task_id.as_deref().expect("no task id");
            assert!(story_id.starts_with('C'));
            assert_eq!(story_id.len(), 23);
            assert!(task_id.starts_with('T'));
            assert_eq!(task_id.len(), 23);
        }

        it "never assigns an identifier to an entity without a title" {
            let mut backlog = load_backlog(&mut ctx, &yaml("- point: 6\n")).expect("load failed");

            assign_ids(&mut ctx, &mut backlog).expect("assignment failed");

            assert_eq!(backlog.stories[0].story_id, None);
            assert!(ctx.registry.is_empty());
        }

        it "keeps identifiers already present in the document" {
            let mut backlog = load_backlog(&mut ctx, &yaml(
                "- story-id: Cexisting\n  story: a story\n",
            )).expect("load failed");

            assign_ids(&mut ctx, &mut backlog).expect("assignment failed");

            assert_eq!(backlog.stories[0].story_id.as_deref(), Some("Cexisting"));
        }

        it "registers every allocated identifier in one shared registry" {
            let mut backlog = load_backlog(&mut ctx, &yaml(
                "- story: a\n  sub-story:\n  - story: b\n  task:\n  - t: c\n    sub-task:\n    - t: d\n",
            )).expect("load failed");

            assign_ids(&mut ctx, &mut backlog).expect("assignment failed");

            assert_eq!(ctx.registry.len(), 4);
        }

        it "is stable across repeated load-dump cycles" {
            let mut backlog = load_backlog(&mut ctx, &yaml("- story: stable story\n")).expect("load failed");
            assign_ids(&mut ctx, &mut backlog).expect("assignment failed");
            let first = backlog.stories[0].story_id.clone().expect("no id");

            let text = emit::to_yaml_string(&dump_backlog(&backlog));
            let mut second_ctx = LoadContext::new();
            let mut reloaded =
                load_backlog(&mut second_ctx, &serde_yaml::from_str(&text).expect("re-parse"))
                    .expect("load failed");
            assign_ids(&mut second_ctx, &mut reloaded).expect("assignment failed");

            assert_eq!(reloaded.stories[0].story_id.as_deref(), Some(first.as_str()));
        }
    }

    describe "mutations" {
        before {
            let mut backlog = load_backlog(&mut ctx, &yaml(
                "- story: parent story\n  task:\n  - t: existing task\n",
            )).expect("load failed");
            assign_ids(&mut ctx, &mut backlog).expect("assignment failed");
        }

        it "appends a top-level story" {
            backlog.add_story(&mut ctx, "another story", None).expect("add failed");

            assert_eq!(backlog.stories.len(), 2);
            assert_eq!(backlog.stories[1].story.as_deref(), Some("another story"));
        }

        it "appends a sub-story under a parent" {
            let parent_id = backlog.stories[0].story_id.clone().expect("no id");

            backlog
                .add_story(&mut ctx, "child story", Some(&parent_id))
                .expect("add failed");

            assert_eq!(backlog.stories[0].substories.len(), 1);
        }

        it "appends a task under a story" {
            let parent_id = backlog.stories[0].story_id.clone().expect("no id");

            backlog.add_task(&mut ctx, "new task", &parent_id).expect("add failed");

            assert_eq!(backlog.stories[0].tasks.len(), 2);
        }

        it "appends a sub-task under a task" {
            let task_id = backlog.stories[0].tasks[0].task_id.clone().expect("no id");

            backlog.add_task(&mut ctx, "nested task", &task_id).expect("add failed");

            assert_eq!(backlog.stories[0].tasks[0].subtasks.len(), 1);
        }

        it "rejects an unknown target identifier without mutating" {
            let result = backlog.add_task(&mut ctx, "orphan", "Tdoes-not-exist");

            assert!(matches!(result, Err(BacklogError::UnknownIdentifier(_))));
            assert_eq!(backlog.stories[0].tasks.len(), 1);
            assert!(backlog.stories[0].substories.is_empty());
        }

        it "marks a task done with a dated status and a log entry" {
            let task_id = backlog.stories[0].tasks[0].task_id.clone().expect("no id");
            let now = chrono::Local::now().naive_local();

            backlog.mark_done(&task_id, Some("Test User"), now).expect("done failed");

            let task = &backlog.stories[0].tasks[0];
            assert!(task.is_done());
            assert!(task.status.as_deref().unwrap().starts_with("DONE ("));
            assert_eq!(task.logs.len(), 1);
            assert_eq!(task.logs[0].author.as_deref(), Some("Test User"));
            assert_eq!(task.logs[0].action.as_deref(), Some("done"));
        }

        it "gives a story target only the completion log" {
            let story_id = backlog.stories[0].story_id.clone().expect("no id");
            let now = chrono::Local::now().naive_local();

            backlog.mark_done(&story_id, None, now).expect("done failed");

            assert_eq!(backlog.stories[0].logs.len(), 1);
            assert_eq!(backlog.stories[0].logs[0].action.as_deref(), Some("done"));
        }

        it "reports an unknown identifier for done" {
            let result = backlog.mark_done("Cnope", None, chrono::Local::now().naive_local());
            assert!(matches!(result, Err(BacklogError::UnknownIdentifier(_))));
        }
    }

    describe "backup rotation" {
        it "keeps numbered backups, newest first" {
            let dir = tempfile::tempdir().expect("tempdir failed");
            let path = dir.path().join("backlog.yaml");

            std::fs::write(&path, "first\n").unwrap();
            rotate_backups(&path, 3).expect("rotate failed");
            std::fs::write(&path, "second\n").unwrap();
            rotate_backups(&path, 3).expect("rotate failed");

            let backup_1 = std::fs::read_to_string(dir.path().join("backlog.yaml.1")).unwrap();
            let backup_2 = std::fs::read_to_string(dir.path().join("backlog.yaml.2")).unwrap();
            assert_eq!(backup_1, "second\n");
            assert_eq!(backup_2, "first\n");
        }

        it "drops the oldest backup beyond the cap" {
            let dir = tempfile::tempdir().expect("tempdir failed");
            let path = dir.path().join("backlog.yaml");

            for round in 0..4 {
                std::fs::write(&path, format!("round {round}\n")).unwrap();
                rotate_backups(&path, 2).expect("rotate failed");
            }

            assert!(dir.path().join("backlog.yaml.1").exists());
            assert!(dir.path().join("backlog.yaml.2").exists());
            assert!(!dir.path().join("backlog.yaml.3").exists());
        }

        it "does nothing for a missing file" {
            let dir = tempfile::tempdir().expect("tempdir failed");
            let path = dir.path().join("absent.yaml");

            rotate_backups(&path, 3).expect("rotate failed");

            assert!(!dir.path().join("absent.yaml.1").exists());
        }
    }
}
