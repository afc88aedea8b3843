use std::{error::Error, iter};

use async_trait::async_trait;
use itertools::Itertools;
use octocrab::{service::middleware::retry::RetryConfig, Octocrab};
use serde_derive::Deserialize;

use crate::{
    error::RecordCreationError,
    models::{CollectionRef, CreatedRecord, Credential, RecordPayload},
};

/// Something that can open an issue in a repository.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn create_issue(
        &self,
        collection: &CollectionRef,
        payload: &RecordPayload,
    ) -> Result<CreatedRecord, RecordCreationError>;
}

/// GitHub REST API client bound to one token. Every call is a single attempt.
pub struct GithubTracker {
    octo: Octocrab,
}

impl GithubTracker {
    pub fn new(credential: &Credential, api_base: &str) -> octocrab::Result<Self> {
        let octo = octocrab::OctocrabBuilder::default()
            .personal_token(credential.expose().to_string())
            .base_uri(api_base)?
            .add_retry_config(RetryConfig::None)
            .build()?;

        Ok(Self { octo })
    }
}

#[async_trait]
impl IssueTracker for GithubTracker {
    async fn create_issue(
        &self,
        collection: &CollectionRef,
        payload: &RecordPayload,
    ) -> Result<CreatedRecord, RecordCreationError> {
        // Raw response: only 201 counts, and error bodies are kept as sent.
        let response = self
            .octo
            ._post(collection.issues_route(), Some(payload))
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = self
            .octo
            .body_to_string(response)
            .await
            .map_err(transport_error)?;

        if status != CREATED {
            return Err(RecordCreationError::Rejected {
                status,
                message: rejection_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| RecordCreationError::Rejected {
            status,
            message: format!("unreadable issue in response ({e}): {}", body.trim()),
        })
    }
}

const CREATED: u16 = 201;

#[derive(Debug, Deserialize)]
struct GithubErrorBody {
    message: String,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

/// GitHub's `message` (plus `errors` detail) when the body is GitHub JSON,
/// the raw body otherwise.
fn rejection_message(body: &str) -> String {
    match serde_json::from_str::<GithubErrorBody>(body) {
        Ok(err) if err.errors.is_empty() => err.message,
        Ok(err) => format!("{} [{}]", err.message, err.errors.iter().join(", ")),
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// Built from the source chain; octocrab's own `Display` can carry a backtrace.
fn transport_error(err: octocrab::Error) -> RecordCreationError {
    let message = iter::successors(err.source(), |e| (*e).source())
        .map(ToString::to_string)
        .join(": ");

    RecordCreationError::Transport {
        message: if message.is_empty() {
            "request failed".to_string()
        } else {
            message
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn payload() -> RecordPayload {
        RecordPayload {
            title: "📦 Update 3 Outdated Dependencies".to_string(),
            body: "## Objective".to_string(),
            labels: vec!["dependencies".to_string(), "type:chore".to_string()],
        }
    }

    fn tracker(server: &MockServer) -> GithubTracker {
        let credential = Credential::new("test-token").unwrap();
        GithubTracker::new(&credential, &server.uri()).unwrap()
    }

    #[tokio::test]
    async fn posts_payload_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/Hack23/game/issues"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_json(json!({
                "title": "📦 Update 3 Outdated Dependencies",
                "body": "## Objective",
                "labels": ["dependencies", "type:chore"],
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 1,
                "number": 103,
                "html_url": "https://github.com/Hack23/game/issues/103",
                "title": "📦 Update 3 Outdated Dependencies",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let collection: CollectionRef = "Hack23/game".parse().unwrap();
        let record = tracker(&server)
            .create_issue(&collection, &payload())
            .await
            .unwrap();

        assert_eq!(record.number, 103);
        assert_eq!(record.url, "https://github.com/Hack23/game/issues/103");
    }

    #[tokio::test]
    async fn validation_failure_keeps_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/Hack23/game/issues"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Validation Failed",
                "errors": [{"resource": "Issue", "code": "invalid", "field": "labels"}],
                "documentation_url": "https://docs.github.com/rest/issues/issues#create-an-issue",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let collection: CollectionRef = "Hack23/game".parse().unwrap();
        let err = tracker(&server)
            .create_issue(&collection, &payload())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert!(err.message().starts_with("Validation Failed"));
        assert!(err.message().contains("labels"));
    }

    #[tokio::test]
    async fn bad_credentials_are_a_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Bad credentials",
                "documentation_url": "https://docs.github.com/rest",
            })))
            .mount(&server)
            .await;

        let collection: CollectionRef = "Hack23/game".parse().unwrap();
        let err = tracker(&server)
            .create_issue(&collection, &payload())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RecordCreationError::Rejected {
                status: 401,
                message: "Bad credentials".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let uri = format!("http://127.0.0.1:{port}");

        let credential = Credential::new("test-token").unwrap();
        let tracker = GithubTracker::new(&credential, &uri).unwrap();
        let collection: CollectionRef = "Hack23/game".parse().unwrap();
        let err = tracker.create_issue(&collection, &payload()).await.unwrap_err();

        assert_eq!(err.status(), None);
        assert!(!err.message().is_empty());
        assert!(!err.message().contains("Found at"));
    }

    #[tokio::test]
    async fn non_json_error_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/Hack23/game/issues"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let collection: CollectionRef = "Hack23/game".parse().unwrap();
        let err = tracker(&server)
            .create_issue(&collection, &payload())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RecordCreationError::Rejected {
                status: 502,
                message: "<html>Bad Gateway</html>".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn ok_without_created_is_not_a_creation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "number": 5,
                "html_url": "https://github.com/Hack23/game/issues/5",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let collection: CollectionRef = "Hack23/game".parse().unwrap();
        let err = tracker(&server)
            .create_issue(&collection, &payload())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(200));
    }

    #[tokio::test]
    async fn created_without_issue_fields_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let collection: CollectionRef = "Hack23/game".parse().unwrap();
        let err = tracker(&server)
            .create_issue(&collection, &payload())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(201));
        assert!(err.message().contains(r#"{"id":1}"#));
    }

    #[test]
    fn rejection_message_prefers_github_message() {
        assert_eq!(
            rejection_message(r#"{"message": "Not Found", "documentation_url": "x"}"#),
            "Not Found"
        );
        assert_eq!(rejection_message("  \n"), "empty response body");
        assert_eq!(rejection_message("upstream timeout\n"), "upstream timeout");
    }
}
