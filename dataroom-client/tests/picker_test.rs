mod common;

use common::{dataroom_file, drive_file, Backend, RecordingDialogs};
use dataroom_client::FilePicker;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};

async fn mount_first_page(backend: &Backend, next: Option<&str>, expected_calls: u64) {
    let mut body = json!({
        "files": [
            drive_file("f1", "deck.pdf", "application/pdf"),
            drive_file("doc1", "Plan", "application/vnd.google-apps.document"),
            drive_file("dir1", "Contracts", "application/vnd.google-apps.folder")
        ]
    });
    if let Some(next) = next {
        body["nextPageToken"] = json!(next);
    }
    Mock::given(method("GET"))
        .and(path("/api/drive/files"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(&backend.server)
        .await;
}

async fn mount_second_page(backend: &Backend, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/drive/files"))
        .and(query_param("pageToken", "t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [drive_file("f2", "page two.pdf", "application/pdf")]
        })))
        .expect(expected_calls)
        .mount(&backend.server)
        .await;
}

fn import_ok(file_id: &str, id: i64) -> Mock {
    Mock::given(method("POST"))
        .and(path("/api/drive/import"))
        .and(body_partial_json(json!({"file_id": file_id})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "file": dataroom_file(id, file_id)
        })))
        .expect(1)
}

#[tokio::test]
async fn folders_are_hidden_and_docs_labelled() {
    let backend = Backend::start().await;
    mount_first_page(&backend, None, 1).await;

    let mut picker = FilePicker::new();
    picker.open(&backend.api).await;

    let view = picker.render();
    let names: Vec<&str> = view.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["deck.pdf", "Plan"]);
    assert_eq!(view.rows[0].size, "1 KB");
    assert_eq!(view.rows[1].size, "Google Doc");
    assert!(view.next_button.disabled);
    assert!(view.previous_button.disabled);
    assert!(view.import_button.disabled);
}

#[tokio::test]
async fn previous_after_next_returns_to_first_page() {
    let backend = Backend::start().await;
    mount_first_page(&backend, Some("t2"), 2).await;
    mount_second_page(&backend, 1).await;

    let mut picker = FilePicker::new();
    picker.open(&backend.api).await;

    picker.next_page(&backend.api).await;
    assert_eq!(picker.visible_files().next().unwrap().id, "f2");
    assert!(picker.has_previous_page());
    assert!(!picker.has_next_page());

    picker.previous_page(&backend.api).await;
    assert_eq!(picker.visible_files().next().unwrap().id, "f1");
    assert!(!picker.has_previous_page());
    assert!(picker.has_next_page());
}

#[tokio::test]
async fn paging_past_the_edges_is_a_no_op() {
    let backend = Backend::start().await;
    mount_first_page(&backend, None, 1).await;

    let mut picker = FilePicker::new();
    picker.open(&backend.api).await;

    picker.next_page(&backend.api).await;
    picker.previous_page(&backend.api).await;

    assert_eq!(picker.visible_files().count(), 2);
}

#[tokio::test]
async fn search_resets_history_and_sends_query() {
    let backend = Backend::start().await;
    mount_first_page(&backend, Some("t2"), 1).await;
    mount_second_page(&backend, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/drive/files"))
        .and(query_param("query", "deck"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [drive_file("f1", "deck.pdf", "application/pdf")]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&backend.server)
        .await;

    let mut picker = FilePicker::new();
    picker.open(&backend.api).await;
    picker.next_page(&backend.api).await;
    picker.search(&backend.api, "deck").await;

    assert_eq!(picker.query(), "deck");
    assert!(!picker.has_previous_page());
    assert_eq!(picker.visible_files().count(), 1);
}

#[tokio::test]
async fn selection_survives_paging() {
    let backend = Backend::start().await;
    mount_first_page(&backend, Some("t2"), 1).await;
    mount_second_page(&backend, 1).await;

    let mut picker = FilePicker::new();
    picker.open(&backend.api).await;
    assert!(picker.toggle_id("f1"));
    picker.next_page(&backend.api).await;
    assert!(picker.toggle_id("f2"));
    assert!(!picker.toggle_id("f1"));

    let ids: Vec<&str> = picker.selected().iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["f1", "f2"]);
    assert_eq!(picker.render().import_button.label, "Import 2 file(s)");
}

#[tokio::test]
async fn partial_failure_reports_both_counts() {
    let backend = Backend::start().await;
    mount_first_page(&backend, None, 1).await;
    import_ok("f1", 10).mount(&backend.server).await;
    Mock::given(method("POST"))
        .and(path("/api/drive/import"))
        .and(body_partial_json(json!({"file_id": "doc1"})))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"error": "File already imported"})))
        .expect(1)
        .mount(&backend.server)
        .await;
    let dialogs = RecordingDialogs::default();

    let mut picker = FilePicker::new();
    picker.open(&backend.api).await;
    picker.toggle_id("f1");
    picker.toggle_id("doc1");
    let summary = picker.import_selected(&backend.api, &dialogs).await.unwrap();

    assert_eq!((summary.imported, summary.failed), (1, 1));
    assert_eq!(
        dialogs.alerts(),
        vec!["Imported 1 file(s). 1 file(s) failed or already exist."]
    );
    assert_eq!(picker.progress().done, 2);
    assert_eq!(picker.progress().total, 2);
    assert!(!picker.is_importing());
}

#[tokio::test]
async fn all_imports_succeeding_reports_count() {
    let backend = Backend::start().await;
    mount_first_page(&backend, None, 1).await;
    import_ok("f1", 10).mount(&backend.server).await;
    import_ok("doc1", 11).mount(&backend.server).await;
    let dialogs = RecordingDialogs::default();

    let mut picker = FilePicker::new();
    picker.open(&backend.api).await;
    picker.toggle_id("f1");
    picker.toggle_id("doc1");
    picker.import_selected(&backend.api, &dialogs).await;

    assert_eq!(dialogs.alerts(), vec!["Imported 2 file(s)."]);
}

#[tokio::test]
async fn importing_nothing_is_a_no_op() {
    let backend = Backend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/drive/import"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.server)
        .await;
    let dialogs = RecordingDialogs::default();

    let mut picker = FilePicker::new();
    let summary = picker.import_selected(&backend.api, &dialogs).await;

    assert!(summary.is_none());
    assert!(dialogs.alerts().is_empty());
}

#[tokio::test]
async fn reset_clears_everything() {
    let backend = Backend::start().await;
    mount_first_page(&backend, Some("t2"), 1).await;
    mount_second_page(&backend, 1).await;

    let mut picker = FilePicker::new();
    picker.open(&backend.api).await;
    picker.toggle_id("f1");
    picker.next_page(&backend.api).await;
    picker.reset();

    assert_eq!(picker.visible_files().count(), 0);
    assert!(picker.selected().is_empty());
    assert!(!picker.has_previous_page());
    assert!(!picker.has_next_page());
    assert_eq!(picker.query(), "");
}

#[tokio::test]
async fn failed_listing_keeps_current_page() {
    let backend = Backend::start().await;
    mount_first_page(&backend, Some("t2"), 1).await;
    Mock::given(method("GET"))
        .and(path("/api/drive/files"))
        .and(query_param("pageToken", "t2"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({"error": "Bad Gateway"})))
        .mount(&backend.server)
        .await;

    let mut picker = FilePicker::new();
    picker.open(&backend.api).await;
    picker.next_page(&backend.api).await;

    assert_eq!(picker.visible_files().next().unwrap().id, "f1");
    assert!(!picker.has_previous_page());
    assert!(picker.has_next_page());
}
