//! Wire types for the `/create` exchange and classification of its outcome.

use serde::Deserialize;

/// Fixed endpoint the form is submitted to.
pub const CREATE_ENDPOINT: &str = "/create";

/// Shown in the error banner when the server reports failure without a
/// message.
pub const UNKNOWN_ERROR_TEXT: &str = "An unknown error occurred.";

/// Fixed error-banner text for transport failures. The underlying detail is
/// logged, never shown.
pub const CONNECT_ERROR_TEXT: &str =
    "Failed to connect to the server. Please check your connection and try again.";

/// Result-area note for a server-reported failure.
pub const FAILED_RESULT_TEXT: &str = "Generation failed. Check the error message above.";

/// Result-area note for a transport failure.
pub const OFFLINE_RESULT_TEXT: &str = "Could not connect to the server.";

/// Result-area notice while the request is outstanding.
pub const LOADING_TEXT: &str = "Generating... please wait. This may take a few seconds.";

/// Response body of `POST /create`.
///
/// Unknown fields are ignored; absent fields decode to their falsy defaults,
/// so a bare `{}` classifies as a server failure rather than a decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateResponse {
    #[serde(default)]
    pub success: bool,
    /// Paths of the generated images, one per requested style, in order.
    #[serde(default)]
    pub qr_paths: Vec<String>,
    /// Human-readable failure reason supplied by the server.
    #[serde(default)]
    pub message: Option<String>,
}

/// Classification of one completed submission cycle. Transient; lives for a
/// single request/response only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// `success: true`: one generated image per entry, in render order.
    Success { qr_paths: Vec<String> },
    /// Well-formed response with falsy or absent `success`.
    ServerFailure { message: Option<String> },
    /// The request failed or the body did not parse as JSON.
    TransportFailure { detail: String },
}

impl SubmitOutcome {
    pub fn transport(detail: impl Into<String>) -> Self {
        SubmitOutcome::TransportFailure {
            detail: detail.into(),
        }
    }

    /// Text for the error banner; `None` on success.
    ///
    /// An empty server message falls back to the generic text the same way an
    /// absent one does.
    pub fn banner_text(&self) -> Option<&str> {
        match self {
            SubmitOutcome::Success { .. } => None,
            SubmitOutcome::ServerFailure { message } => Some(
                message
                    .as_deref()
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .unwrap_or(UNKNOWN_ERROR_TEXT),
            ),
            SubmitOutcome::TransportFailure { .. } => Some(CONNECT_ERROR_TEXT),
        }
    }

    /// Note rendered into the result container on failure; `None` on success.
    pub fn result_note(&self) -> Option<&'static str> {
        match self {
            SubmitOutcome::Success { .. } => None,
            SubmitOutcome::ServerFailure { .. } => Some(FAILED_RESULT_TEXT),
            SubmitOutcome::TransportFailure { .. } => Some(OFFLINE_RESULT_TEXT),
        }
    }
}

/// Classifies a response body. A body that is not valid JSON takes the same
/// recovery path as a failed request.
pub fn classify_response(body: &str) -> SubmitOutcome {
    match serde_json::from_str::<CreateResponse>(body) {
        Ok(resp) if resp.success => SubmitOutcome::Success {
            qr_paths: resp.qr_paths,
        },
        Ok(resp) => SubmitOutcome::ServerFailure {
            message: resp.message,
        },
        Err(err) => SubmitOutcome::transport(format!("response body is not valid JSON: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_carries_paths_in_order() {
        let outcome = classify_response(
            r#"{"success": true, "qr_paths": ["static/qr/circle_abc.png", "static/qr/logo_abc.png"]}"#,
        );
        assert_eq!(
            outcome,
            SubmitOutcome::Success {
                qr_paths: vec![
                    "static/qr/circle_abc.png".to_string(),
                    "static/qr/logo_abc.png".to_string(),
                ],
            }
        );
        assert_eq!(outcome.banner_text(), None);
        assert_eq!(outcome.result_note(), None);
    }

    #[test]
    fn server_failure_surfaces_its_message() {
        let outcome = classify_response(r#"{"success": false, "message": "Bad URL"}"#);
        assert_eq!(outcome.banner_text(), Some("Bad URL"));
        assert_eq!(outcome.result_note(), Some(FAILED_RESULT_TEXT));
        match outcome {
            SubmitOutcome::ServerFailure { .. } => {}
            other => panic!("expected server failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_message_falls_back_to_generic_text() {
        let outcome = classify_response(r#"{"success": false}"#);
        assert_eq!(outcome.banner_text(), Some(UNKNOWN_ERROR_TEXT));
    }

    #[test]
    fn empty_message_falls_back_to_generic_text() {
        let outcome = classify_response(r#"{"success": false, "message": ""}"#);
        assert_eq!(outcome.banner_text(), Some(UNKNOWN_ERROR_TEXT));
    }

    #[test]
    fn absent_success_field_is_a_server_failure() {
        let outcome = classify_response("{}");
        assert_eq!(outcome.result_note(), Some(FAILED_RESULT_TEXT));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let outcome =
            classify_response(r#"{"success": true, "qr_paths": [], "elapsed_ms": 1200}"#);
        assert_eq!(outcome, SubmitOutcome::Success { qr_paths: vec![] });
    }

    #[test]
    fn malformed_body_is_a_transport_failure() {
        let outcome = classify_response("<html>502 Bad Gateway</html>");
        assert_eq!(outcome.banner_text(), Some(CONNECT_ERROR_TEXT));
        assert_eq!(outcome.result_note(), Some(OFFLINE_RESULT_TEXT));
    }

    #[test]
    fn transport_detail_is_kept_for_logging_only() {
        let outcome = SubmitOutcome::transport("connection refused");
        match &outcome {
            SubmitOutcome::TransportFailure { detail } => {
                assert_eq!(detail, "connection refused")
            }
            other => panic!("expected transport failure, got {other:?}"),
        }
        // The user-facing text never includes the detail.
        assert_eq!(outcome.banner_text(), Some(CONNECT_ERROR_TEXT));
    }
}
