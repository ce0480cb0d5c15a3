//! End-to-end flow: background fetches feeding the view reducer

use pdfcatalog::{
    Action, AppConfig, CatalogError, CsvSource, DataLocation, Loader, ViewState, ALL_DATA_PATH,
    INITIAL_DATA_PATH,
};
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// In-memory source where each path answers after its own delay
struct DelayedSource {
    bodies: HashMap<&'static str, (Duration, Option<String>)>,
}

impl CsvSource for DelayedSource {
    fn locate(&self, path: &str) -> String {
        format!("mem:{}", path)
    }

    fn fetch(&self, path: &str) -> pdfcatalog::Result<String> {
        let (delay, body) = self
            .bodies
            .get(path)
            .cloned()
            .unwrap_or((Duration::ZERO, None));
        thread::sleep(delay);
        body.ok_or_else(|| CatalogError::HttpStatus {
            url: self.locate(path),
            status: 404,
        })
    }
}

fn csv(titles: &[&str]) -> String {
    let mut out = String::from("title,path,keywords,updateAt,createAt\n");
    for title in titles {
        out.push_str(&format!(
            "{t},/pdf/{t}.pdf,{t} kw,2024-02-01,2024-01-01\n",
            t = title
        ));
    }
    out
}

fn doc_titles(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Doc{}", i)).collect()
}

fn drain(loader: Loader) -> ViewState {
    let handle = loader.spawn().unwrap();
    let mut view = ViewState::default();
    while let Some(action) = handle.next_action() {
        view = view.reduce(action);
    }
    view
}

#[test]
fn full_data_arriving_last_replaces_initial() {
    let all = doc_titles(12);
    let all: Vec<&str> = all.iter().map(String::as_str).collect();
    let source = DelayedSource {
        bodies: HashMap::from([
            (INITIAL_DATA_PATH, (Duration::ZERO, Some(csv(&["Doc1", "Doc2"])))),
            (ALL_DATA_PATH, (Duration::from_millis(150), Some(csv(&all)))),
        ]),
    };

    let view = drain(Loader::new(Arc::new(source)));
    assert!(!view.is_loading());
    assert_eq!(view.dataset.len(), 12);

    let page = view.page();
    assert_eq!(page.rows.len(), 10);
    assert!(page.has_next());
    assert!(!page.has_previous());

    let view = view.reduce(Action::NextPage);
    let page = view.page();
    let titles: Vec<&str> = page.rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Doc11", "Doc12"]);
    assert!(!page.has_next());

    let view = view.reduce(Action::SetQuery("doc5".to_string()));
    let page = view.page();
    assert_eq!(view.current_page, 1);
    assert_eq!(page.total, 1);
    assert_eq!(page.rows[0].path, "/pdf/Doc5.pdf");
}

#[test]
fn initial_data_arriving_last_wins() {
    let all = doc_titles(12);
    let all: Vec<&str> = all.iter().map(String::as_str).collect();
    let source = DelayedSource {
        bodies: HashMap::from([
            (INITIAL_DATA_PATH, (Duration::from_millis(150), Some(csv(&["Doc1", "Doc2"])))),
            (ALL_DATA_PATH, (Duration::ZERO, Some(csv(&all)))),
        ]),
    };

    let view = drain(Loader::new(Arc::new(source)));
    assert!(!view.is_loading());
    assert_eq!(view.dataset.len(), 2);
}

#[test]
fn both_failures_leave_an_empty_idle_view() {
    let source = DelayedSource {
        bodies: HashMap::new(),
    };

    let view = drain(Loader::new(Arc::new(source)));
    assert!(!view.loading);
    assert!(!view.loading_all_data);
    assert_eq!(view.page().total, 0);
    assert_eq!(view.page().max_page(), 1);
}

#[test]
fn cancelling_discards_in_flight_results() {
    let source = DelayedSource {
        bodies: HashMap::from([
            (INITIAL_DATA_PATH, (Duration::from_millis(100), Some(csv(&["A"])))),
            (ALL_DATA_PATH, (Duration::from_millis(100), Some(csv(&["A", "B"])))),
        ]),
    };

    let handle = Loader::new(Arc::new(source)).spawn().unwrap();
    handle.cancel();
    thread::sleep(Duration::from_millis(200));

    assert!(handle.try_actions().is_empty());
    assert!(handle.next_action().is_none());
    handle.join();
}

#[test]
fn directory_location_loads_both_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("initial-data.csv"), csv(&["Guide"])).unwrap();
    fs::write(
        dir.path().join("all-data.csv"),
        csv(&["Guide", "Manual", "Report"]),
    )
    .unwrap();

    let config = AppConfig {
        location: DataLocation::Dir(dir.path().to_path_buf()),
        ..Default::default()
    };
    let handle = config.loader().unwrap().spawn().unwrap();

    let mut sizes = Vec::new();
    let mut view = ViewState::default();
    while let Some(action) = handle.next_action() {
        if let Action::DatasetLoaded { records, .. } = &action {
            sizes.push(records.len());
        }
        view = view.reduce(action);
    }

    sizes.sort_unstable();
    assert_eq!(sizes, [1, 3]);
    assert!(!view.is_loading());

    let view = view.reduce(Action::SetQuery("MANUAL KW".to_string()));
    if view.dataset.len() == 3 {
        assert_eq!(view.page().total, 1);
    } else {
        assert_eq!(view.page().total, 0);
    }
}
