use std::sync::Arc;

use c2e::autosave::{run_tick, TickOutcome};
use c2e::config::StudioConfig;
use c2e::error::Error;
use c2e::models::*;
use c2e::storage::{MemoryStore, Store};
use c2e::Studio;
use speculate2::speculate;
use tokio::sync::broadcast;

fn studio(store: &MemoryStore) -> Studio {
    Studio::with_store(Arc::new(store.clone()), &StudioConfig::default())
}

fn drain(events: &mut broadcast::Receiver<StudioEvent>) -> Vec<&'static str> {
    let mut names = Vec::new();
    while let Ok(event) = events.try_recv() {
        names.push(event.name());
    }
    names
}

speculate! {
    before {
        let store = MemoryStore::new();
        let mut studio = studio(&store);
        let mut events = studio.subscribe();
    }

    describe "launch campaign scenario" {
        it "creates, edits, autosaves and deletes" {
            let project = studio.create_project(Some("My Launch Campaign")).expect("create failed");
            assert_eq!(project.name, "My Launch Campaign");
            assert!(project.data.content.is_empty());
            assert_eq!(project.data.settings.default_platform, Platform::Website);
            assert_eq!(studio.state(), SessionState::Clean);

            let quiz = studio.add_element("quiz").expect("add failed");
            assert!(studio.is_dirty());
            assert_eq!(studio.elements().len(), 1);
            assert_eq!(studio.selected_element().map(|e| e.id.clone()), Some(quiz.id.clone()));

            let saved_before = studio.last_saved();
            assert_eq!(run_tick(&mut studio), TickOutcome::Saved(project.id.clone()));
            assert!(!studio.is_dirty());
            assert!(studio.last_saved() >= saved_before);

            let stored = studio.repository().load(&project.id).expect("load failed");
            assert_eq!(stored.data.content, vec![quiz]);

            studio.delete_project(&project.id).expect("delete failed");
            assert!(studio.projects().unwrap().iter().all(|p| p.id != project.id));
            assert!(!studio.repository().recent_ids().unwrap().contains(&project.id));
            assert_eq!(studio.state(), SessionState::NoActiveProject);
            assert!(studio.elements().is_empty());

            assert_eq!(
                drain(&mut events),
                vec![
                    "project:created",
                    "content:changed",
                    "project:saved",
                    "project:deleted",
                ]
            );
        }
    }

    describe "session transitions" {
        it "starts with no active project" {
            assert_eq!(studio.state(), SessionState::NoActiveProject);
            assert!(studio.current_project().is_none());
        }

        it "refuses element edits without a project" {
            assert!(matches!(studio.add_element("quiz"), Err(Error::Validation(_))));
            assert_eq!(studio.state(), SessionState::NoActiveProject);
        }

        it "loading is clean and does not mark dirty" {
            let created = studio.create_project(Some("Stored")).unwrap();
            studio.add_element("header").unwrap();
            studio.save_current_project().unwrap();
            studio.close_project();
            drain(&mut events);

            let loaded = studio.load_project(&created.id).expect("load failed");
            assert_eq!(loaded.data.content.len(), 1);
            assert_eq!(studio.state(), SessionState::Clean);
            assert_eq!(studio.elements().len(), 1);
            assert!(studio.selected_element().is_none());
            assert_eq!(drain(&mut events), vec!["project:loaded"]);
        }

        it "keeps the session on a failed load" {
            let active = studio.create_project(Some("Active")).unwrap();
            studio.add_element("quiz").unwrap();

            assert!(matches!(studio.load_project("proj_missing"), Err(Error::NotFound(_))));
            assert_eq!(studio.current_project().map(|p| p.id.clone()), Some(active.id));
            assert_eq!(studio.state(), SessionState::Dirty);
        }

        it "explicit save returns to clean" {
            studio.create_project(Some("Draft")).unwrap();
            studio.add_element("poll").unwrap();

            let saved = studio.save_current_project().unwrap().expect("nothing saved");
            assert_eq!(saved.data.content.len(), 1);
            assert_eq!(studio.state(), SessionState::Clean);
        }

        it "save without a project is a no-op" {
            assert!(studio.save_current_project().unwrap().is_none());
        }

        it "a failed save keeps the session dirty" {
            studio.create_project(Some("Offline")).unwrap();
            studio.add_element("quiz").unwrap();

            store.set_disabled(true);
            assert!(matches!(
                studio.save_current_project(),
                Err(Error::PersistenceUnavailable(_))
            ));
            assert_eq!(studio.state(), SessionState::Dirty);
        }

        it "deleting another project leaves the session alone" {
            let other = studio.create_project(Some("Other")).unwrap();
            let active = studio.create_project(Some("Active")).unwrap();

            studio.delete_project(&other.id).unwrap();
            assert_eq!(studio.current_project().map(|p| p.id.clone()), Some(active.id));
            assert_eq!(studio.state(), SessionState::Clean);
        }

        it "close drops to no active project" {
            studio.create_project(Some("Closing")).unwrap();
            studio.add_element("quiz").unwrap();

            let closed = studio.close_project();
            assert!(closed.is_some());
            assert_eq!(studio.state(), SessionState::NoActiveProject);
            assert!(studio.elements().is_empty());
        }
    }

    describe "elements" {
        before {
            studio.create_project(Some("Elements")).unwrap();
            drain(&mut events);
        }

        it "removing the selected element clears selection" {
            let quiz = studio.add_element("quiz").unwrap();
            assert!(studio.remove_element(&quiz.id));
            assert!(studio.selected_element().is_none());
            assert_eq!(drain(&mut events), vec!["content:changed", "content:changed"]);
        }

        it "removing an unknown element changes nothing" {
            assert!(!studio.remove_element("el_missing"));
            assert_eq!(studio.state(), SessionState::Clean);
            assert!(drain(&mut events).is_empty());
        }

        it "selecting does not mark dirty" {
            let header = studio.add_element("header").unwrap();
            studio.add_element("quiz").unwrap();
            studio.save_current_project().unwrap();

            studio.select_element(&header.id);
            assert_eq!(studio.selected_element().map(|e| e.id.clone()), Some(header.id));
            assert_eq!(studio.state(), SessionState::Clean);

            studio.select_element("el_missing");
            assert!(studio.selected_element().is_none());
        }

        it "saves elements in insertion order" {
            studio.add_element("header").unwrap();
            studio.add_element("quiz").unwrap();
            studio.add_element("poll").unwrap();

            let saved = studio.save_current_project().unwrap().unwrap();
            let kinds: Vec<&str> = saved.data.content.iter().map(|e| e.kind.as_str()).collect();
            let positions: Vec<u32> = saved.data.content.iter().map(|e| e.position).collect();
            assert_eq!(kinds, vec!["header", "quiz", "poll"]);
            assert_eq!(positions, vec![0, 1, 2]);
        }
    }

    describe "stored positions" {
        it "adds after an element stored at the last possible position" {
            let mut project = studio.create_project(Some("Imported")).unwrap();
            project.data.content.push(Element::new("quiz", u32::MAX));
            studio.repository().save(&mut project).unwrap();
            studio.load_project(&project.id).unwrap();

            let header = studio.add_element("header").expect("add failed");
            let saved = studio.save_current_project().unwrap().unwrap();

            let positions: Vec<u32> = saved.data.content.iter().map(|e| e.position).collect();
            assert_eq!(positions, vec![0, 1]);
            assert_eq!(saved.data.content[1].id, header.id);
        }
    }

    describe "restore_last_project" {
        it "reopens the head of the recent list" {
            studio.create_project(Some("Older")).unwrap();
            let newest = studio.create_project(Some("Newest")).unwrap();

            let mut fresh = Studio::with_store(Arc::new(store.clone()), &StudioConfig::default());
            let restored = fresh.restore_last_project().unwrap().expect("nothing restored");
            assert_eq!(restored.id, newest.id);
            assert_eq!(fresh.state(), SessionState::Clean);
        }

        it "skips stale recent entries" {
            let real = studio.create_project(Some("Real")).unwrap();
            store
                .set("c2e_recent", serde_json::json!(["proj_gone", &real.id]).to_string())
                .unwrap();

            let restored = studio.restore_last_project().unwrap().expect("nothing restored");
            assert_eq!(restored.id, real.id);
        }

        it "returns None with no history" {
            assert!(studio.restore_last_project().unwrap().is_none());
        }
    }

    describe "preview and settings" {
        it "starts on the default platform and ignores unsupported ones" {
            assert!(!studio.set_preview_platform(Platform::Email));

            studio.create_project(Some("Preview")).unwrap();
            assert_eq!(studio.preview().platform(), Platform::Website);
            assert!(studio.set_preview_platform(Platform::Linkedin));
            assert_eq!(studio.preview().platform(), Platform::Linkedin);

            studio.set_preview_mode(PreviewMode::Tablet);
            assert_eq!(studio.preview().mode(), PreviewMode::Tablet);
        }

        it "keeps project platform settings across saves" {
            let project = studio.create_project(Some("Platforms")).unwrap();
            studio.add_element("quiz").unwrap();
            let saved = studio.save_current_project().unwrap().unwrap();
            assert_eq!(saved.data.settings, project.data.settings);
        }

        it "stores the opaque settings record" {
            let mut settings = serde_json::Map::new();
            settings.insert("lastExport".to_string(), serde_json::json!("pdf"));
            studio.update_settings(&settings).unwrap();
            assert_eq!(studio.settings().unwrap(), settings);
        }
    }

    describe "save over a full store" {
        it "keeps records, timestamps and the dirty flag when the write is refused" {
            let store = MemoryStore::with_quota(4_000);
            let mut studio = Studio::with_store(Arc::new(store.clone()), &StudioConfig::default());
            let created = studio.create_project(Some("Quota")).expect("create failed");
            let recent_before = studio.repository().recent_ids().unwrap();

            studio.add_element(&"x".repeat(5_000)).unwrap();
            assert!(matches!(
                studio.save_current_project(),
                Err(Error::PersistenceUnavailable(_))
            ));

            assert_eq!(studio.state(), SessionState::Dirty);
            assert_eq!(
                studio.current_project().map(|p| p.last_modified),
                Some(created.last_modified)
            );
            assert_eq!(studio.projects().unwrap(), vec![created]);
            assert_eq!(studio.repository().recent_ids().unwrap(), recent_before);
        }
    }
}
