/// Integration tests for the client flows against a mocked backend:
/// upload batches, translation launches and artifact deletion.

#[cfg(test)]
mod tests {
    use crate::api::ApiClient;
    use crate::config::ServiceConfig;
    use crate::deletion;
    use crate::i18n::Locale;
    use crate::selection::SelectedFile;
    use crate::translator::{self, HeadlineTone, JobState};
    use crate::uploader::{self, UploadProgressEvent};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&ServiceConfig {
            base_url: server.uri(),
            csrf_token: Some("test-token".to_string()),
        })
        .unwrap()
    }

    fn write_files(dir: &tempfile::TempDir, names: &[&str]) -> Vec<SelectedFile> {
        names
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                std::fs::write(&path, format!("body of {name}")).unwrap();
                SelectedFile::from_path(&path).unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn upload_batch_settles_every_file_and_keeps_dispatch_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/upload/"))
            .and(body_string_contains("c.txt"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "too large" })),
            )
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/upload/"))
            .and(body_string_contains("user@example.com"))
            .and(body_string_contains("csrfmiddlewaretoken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "File uploaded successfully",
                "previous_documents_deleted": { "count": 2 }
            })))
            .expect(2)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let files = write_files(&dir, &["a.txt", "b.txt", "c.txt"]);

        let mut events: Vec<UploadProgressEvent> = Vec::new();
        let summary = uploader::upload_batch(
            &client(&server),
            Locale::En,
            "user@example.com",
            files,
            |event| events.push(event),
        )
        .await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.successful + summary.failed, summary.total);
        assert_eq!(summary.previous_documents_deleted, 4);

        // Results stay in dispatch order even though completions can settle
        // in any order.
        let names: Vec<&str> = summary
            .results
            .iter()
            .map(|result| result.file_name.as_str())
            .collect();
        assert_eq!(names, ["a.txt", "b.txt", "c.txt"]);
        assert_eq!(summary.results[2].message, "too large");
        assert!(!summary.results[2].success);

        let last = events.last().unwrap();
        assert_eq!(last.status, "complete");
        assert_eq!(last.settled, 3);
        assert_eq!(last.message.as_deref(), Some("Successful: 2, Failed: 1"));
        assert_eq!(
            events.iter().filter(|event| event.status == "settled").count(),
            3
        );
    }

    #[tokio::test]
    async fn translation_success_builds_full_report() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate/"))
            .and(body_string_contains("\"target_language\":\"fr\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "status": "Succeeded",
                    "total_documents": 1,
                    "succeeded_documents": 1,
                    "failed_documents": 0,
                    "documents": [{
                        "id": "d1",
                        "source_filename": "a.pdf",
                        "translated_filename": "a.fr.pdf",
                        "status": "Succeeded",
                        "translated_to": "fr"
                    }],
                    "source_cleanup": {
                        "cleanup_attempted": true,
                        "cleaned_files": 1,
                        "failed_cleanups": 0
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut events = Vec::new();
        let outcome = translator::run_translation(
            &client(&server),
            Locale::En,
            "user@example.com",
            "fr",
            Some("auto"),
            |event| events.push(event),
        )
        .await;

        assert_eq!(outcome.state, JobState::Succeeded);
        assert_eq!(outcome.tone, HeadlineTone::Success);
        assert_eq!(outcome.headline, "Translation completed successfully!");
        assert_eq!(outcome.control_caption, "Launch Translation Process");

        let details = outcome.details.unwrap();
        assert_eq!(details.summary_lines[0], "Status: Succeeded");
        assert!(details
            .summary_lines
            .contains(&"Automatically removed 1 source files.".to_string()));
        assert_eq!(details.artifact_filenames(), ["a.fr.pdf"]);
        assert_eq!(details.documents[0].mark, "✓");

        // The ticker's first tick fires immediately, so at least one
        // in-flight stage event was observed.
        let first = &events[0];
        assert_eq!(first.state, JobState::Requesting);
        assert_eq!(first.stage, "Starting translation process");
        assert!(!first.control_enabled);
    }

    #[tokio::test]
    async fn translation_conflict_shows_guidance_without_details() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate/"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({ "error": "Target files already exist" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let outcome = translator::run_translation(
            &client(&server),
            Locale::En,
            "user@example.com",
            "fr",
            None,
            |_| {},
        )
        .await;

        assert_eq!(outcome.state, JobState::Conflict);
        assert_eq!(outcome.tone, HeadlineTone::Warning);
        assert!(outcome.details.is_none());
        assert_eq!(
            outcome.headline,
            "Previous translation files were found and cleared automatically. Please try the translation again."
        );
    }

    #[tokio::test]
    async fn translation_rejected_payload_surfaces_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "quota exhausted"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = translator::run_translation(
            &client(&server),
            Locale::En,
            "user@example.com",
            "fr",
            None,
            |_| {},
        )
        .await;

        assert_eq!(outcome.state, JobState::Failed);
        assert_eq!(outcome.headline, "Translation failed: quota exhausted");
    }

    #[tokio::test]
    async fn missing_target_language_never_reaches_the_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = translator::run_translation(
            &client(&server),
            Locale::En,
            "user@example.com",
            "",
            None,
            |_| {},
        )
        .await;

        assert_eq!(outcome.state, JobState::Idle);
        assert_eq!(outcome.headline, "Please select a target language.");
        server.verify().await;
    }

    #[tokio::test]
    async fn delete_all_reports_a_transient_notice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/delete-translated/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "deleted_count": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let notice = deletion::delete_all(&client(&server), Locale::En).await;
        assert!(!notice.is_error);
        assert_eq!(notice.clear_after_ms, Some(3_000));
        assert_eq!(notice.text, "Deleted 2 translated document(s).");
    }

    #[tokio::test]
    async fn delete_one_rejects_non_json_responses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/delete-individual/a.fr.pdf/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html>please log in</html>", "text/html"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let notice = deletion::delete_one(&client(&server), Locale::En, "a.fr.pdf").await;
        assert!(notice.is_error);
        assert!(notice.clear_after_ms.is_none());
        assert!(notice.text.contains("unexpected content type 'text/html'"));
        assert!(notice.text.contains("please log in"));
    }

    #[tokio::test]
    async fn delete_one_success_names_the_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/delete-individual/b.fr.docx/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let notice = deletion::delete_one(&client(&server), Locale::En, "b.fr.docx").await;
        assert!(!notice.is_error);
        assert_eq!(notice.clear_after_ms, Some(2_000));
        assert_eq!(notice.text, "Deleted b.fr.docx.");
    }
}
