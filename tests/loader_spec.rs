use backlog::doc::{load_logs, load_stories, load_tasks, LoadContext};
use chrono::NaiveDate;
use serde_yaml::Value;
use speculate2::speculate;

fn yaml(raw: &str) -> Value {
    serde_yaml::from_str(raw).expect("valid test yaml")
}

speculate! {
    before {
        let mut ctx = LoadContext::new();
    }

    describe "load_stories" {
        it "wraps bare text as a story" {
            let stories = load_stories(&mut ctx, &Value::from("This is a story"));

            assert_eq!(stories.len(), 1);
            assert_eq!(stories[0].story.as_deref(), Some("This is a story"));
        }

        it "trims bare text" {
            let stories = load_stories(&mut ctx, &Value::from("  padded  "));
            assert_eq!(stories[0].story.as_deref(), Some("padded"));
        }

        it "yields nothing for blank text" {
            assert!(load_stories(&mut ctx, &Value::from("   \n ")).is_empty());
        }

        it "loads a keyed mapping" {
            let stories = load_stories(&mut ctx, &yaml(r#"{story: "This is a story"}"#));
            assert_eq!(stories[0].story.as_deref(), Some("This is a story"));
        }

        it "accepts a mapping on any recognized key" {
            let stories = load_stories(&mut ctx, &yaml("{point: 6}"));

            assert_eq!(stories.len(), 1);
            assert_eq!(stories[0].story, None);
            assert_eq!(stories[0].point, Some(6));
        }

        it "treats a mapping with no recognized key as noise" {
            assert!(load_stories(&mut ctx, &yaml("{}")).is_empty());
            assert!(load_stories(&mut ctx, &yaml("{bogus: 1}")).is_empty());
        }

        it "concatenates sequence elements in order" {
            let stories = load_stories(&mut ctx, &yaml(r#"["this is story 1", "this is story 2"]"#));

            assert_eq!(stories.len(), 2);
            assert_eq!(stories[0].story.as_deref(), Some("this is story 1"));
            assert_eq!(stories[1].story.as_deref(), Some("this is story 2"));
        }

        it "loads all scalar fields" {
            let stories = load_stories(&mut ctx, &yaml(
                "story: a story of development.\n\
                 note: |-\n  * multiple line\n  * notes and notes\n\
                 order: normal\n\
                 value: ''\n\
                 point: 7\n\
                 demo-method: use demo system to demo.\n",
            ));
            let story = &stories[0];

            assert_eq!(story.story.as_deref(), Some("a story of development."));
            assert_eq!(story.note.as_deref(), Some("* multiple line\n* notes and notes"));
            assert_eq!(story.imp_order(), Some("normal"));
            assert_eq!(story.imp_value, None);
            assert_eq!(story.point, Some(7));
            assert_eq!(story.demo_method.as_deref(), Some("use demo system to demo."));
        }

        it "ignores unrecognized keys" {
            let stories = load_stories(&mut ctx, &yaml(r#"{story: "x", bogus: 1}"#));

            assert_eq!(stories.len(), 1);
            assert_eq!(stories[0].story.as_deref(), Some("x"));
        }

        it "ignores non-text scalar nodes" {
            assert!(load_stories(&mut ctx, &Value::from(7)).is_empty());
            assert!(load_stories(&mut ctx, &Value::Null).is_empty());
        }

        describe "order label" {
            it "derives sort key 5 from normal" {
                let stories = load_stories(&mut ctx, &yaml(r#"{story: s, order: normal}"#));
                assert_eq!(stories[0].sort_key(), Some(5));
                assert_eq!(stories[0].imp_order(), Some("normal"));
            }

            it "derives sort key 9 from HIGH" {
                let stories = load_stories(&mut ctx, &yaml(r#"{story: s, order: HIGH}"#));
                assert_eq!(stories[0].sort_key(), Some(9));
            }

            it "derives sort key 1 from log" {
                let stories = load_stories(&mut ctx, &yaml(r#"{story: s, order: log}"#));
                assert_eq!(stories[0].sort_key(), Some(1));
            }

            it "keeps an unmapped label verbatim with no sort key" {
                let stories = load_stories(&mut ctx, &yaml(r#"{story: s, order: urgent}"#));
                assert_eq!(stories[0].sort_key(), None);
                assert_eq!(stories[0].imp_order(), Some("urgent"));
            }
        }

        describe "children" {
            it "loads a bare-text sub-story as one child" {
                let stories = load_stories(&mut ctx, &yaml(
                    "- story: S2\n  sub-story: \"line1\\nline2\"\n",
                ));

                assert_eq!(stories.len(), 1);
                assert_eq!(stories[0].substories.len(), 1);
                assert_eq!(stories[0].substories[0].story.as_deref(), Some("line1\nline2"));
            }

            it "loads nested tasks and logs" {
                let stories = load_stories(&mut ctx, &yaml(
                    "story: parent\n\
                     task:\n  - t: child task\n\
                     log:\n  - worked on it\n",
                ));
                let story = &stories[0];

                assert_eq!(story.tasks.len(), 1);
                assert_eq!(story.tasks[0].task.as_deref(), Some("child task"));
                assert_eq!(story.logs.len(), 1);
                assert_eq!(story.logs[0].log.as_deref(), Some("worked on it"));
            }
        }
    }

    describe "load_tasks" {
        it "wraps bare text as a task" {
            let tasks = load_tasks(&mut ctx, &Value::from("This is a task"));
            assert_eq!(tasks[0].task.as_deref(), Some("This is a task"));
        }

        it "accepts a mapping on any recognized key" {
            let tasks = load_tasks(&mut ctx, &yaml("{point: 6}"));

            assert_eq!(tasks.len(), 1);
            assert_eq!(tasks[0].task, None);
            assert_eq!(tasks[0].point, Some(6));
        }

        it "loads all scalar fields" {
            let tasks = load_tasks(&mut ctx, &yaml(
                "t: a task of development.\n\
                 note: some note\n\
                 point: 7\n\
                 estimated-time: 3\n\
                 status: new\n\
                 test-method: use demo system to demo.\n",
            ));
            let task = &tasks[0];

            assert_eq!(task.task.as_deref(), Some("a task of development."));
            assert_eq!(task.note.as_deref(), Some("some note"));
            assert_eq!(task.point, Some(7));
            assert_eq!(task.estimated_time, Some(3));
            assert_eq!(task.status, None);
            assert_eq!(task.test_method.as_deref(), Some("use demo system to demo."));
        }

        it "normalizes only the exact literal new" {
            let tasks = load_tasks(&mut ctx, &yaml(r#"{t: x, status: New}"#));
            assert_eq!(tasks[0].status.as_deref(), Some("New"));
        }

        it "loads nested sub-tasks" {
            let tasks = load_tasks(&mut ctx, &yaml(
                "t: parent\nsub-task:\n  - t: child\n",
            ));

            assert_eq!(tasks[0].subtasks.len(), 1);
            assert_eq!(tasks[0].subtasks[0].task.as_deref(), Some("child"));
        }
    }

    describe "load_logs" {
        it "wraps bare text as a log" {
            let logs = load_logs(&mut ctx, &Value::from("This is a log"));
            assert_eq!(logs[0].log.as_deref(), Some("This is a log"));
        }

        it "loads a keyed mapping" {
            let logs = load_logs(&mut ctx, &yaml(r#"{l: "This is a log"}"#));
            assert_eq!(logs[0].log.as_deref(), Some("This is a log"));
        }

        it "treats an unrecognized mapping as noise" {
            assert!(load_logs(&mut ctx, &yaml("{}")).is_empty());
        }

        it "concatenates sequence elements in order" {
            let logs = load_logs(&mut ctx, &yaml(r#"["this is log 1", "this is log 2"]"#));

            assert_eq!(logs.len(), 2);
            assert_eq!(logs[0].log.as_deref(), Some("this is log 1"));
            assert_eq!(logs[1].log.as_deref(), Some("this is log 2"));
        }

        it "loads message, timestamp, and author" {
            let logs = load_logs(&mut ctx, &yaml(
                "l: a log of development.\nrecord-time: 2012-07-20 03:12:59\nauthor: Test User\n",
            ));
            let log = &logs[0];

            assert_eq!(log.log.as_deref(), Some("a log of development."));
            assert_eq!(
                log.record_time,
                NaiveDate::from_ymd_opt(2012, 7, 20)
                    .unwrap()
                    .and_hms_opt(3, 12, 59)
            );
            assert_eq!(log.author.as_deref(), Some("Test User"));
        }
    }
}
