//! Request/response mapping for the HTTP lock endpoints.
//!
//! The HTTP router itself lives elsewhere; this module fixes the contract it
//! serves. Each handler takes the decoded JSON request body plus the session
//! resolved by the auth layer, and returns a status code and JSON body:
//!
//! | Endpoint            | Success                                   | Other                         |
//! |---------------------|-------------------------------------------|-------------------------------|
//! | `GET /locks`        | 200 `["file-id", ...]`                    | 500                           |
//! | `POST /check_lock`  | 200 `{"is_locked": bool}`                 | 400, 500                      |
//! | `POST /acquire_lock`| 200 `"OK"`                                | 409 conflict, 400, 500        |
//! | `POST /release_lock`| 200 `{"action": "released" \| "already_released", "message"}` | 409 `not_owner`, 400, 500 |

use crate::error::LeaseError;
use crate::ids::{FileId, SessionId};
use crate::locks::{AcquireOutcome, LockManager, ReleaseOutcome};
use crate::store::LockStore;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_CONFLICT: u16 = 409;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Body of the per-file lock endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileRequest {
    #[serde(default)]
    pub file_id: Option<String>,
}

impl FileRequest {
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: Some(file_id.into()),
        }
    }
}

/// A status code and JSON body ready to be written by the router.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self {
            status: STATUS_OK,
            body,
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

impl From<LeaseError> for ApiResponse {
    fn from(err: LeaseError) -> Self {
        match err {
            LeaseError::Validation(_) => ApiResponse::error(STATUS_BAD_REQUEST, err.to_string()),
            LeaseError::Conflict(_) => ApiResponse::error(STATUS_CONFLICT, err.to_string()),
            LeaseError::StoreUnavailable(_)
            | LeaseError::Resource(_)
            | LeaseError::UserError(_) => {
                error!(error = %err, "lock operation failed");
                ApiResponse::error(STATUS_INTERNAL_ERROR, err.to_string())
            }
        }
    }
}

fn require_file_id(request: &FileRequest) -> Result<FileId, ApiResponse> {
    match request.file_id.as_deref() {
        None => Err(ApiResponse::error(
            STATUS_BAD_REQUEST,
            "missing required field 'file_id'",
        )),
        Some(raw) => FileId::new(raw).map_err(ApiResponse::from),
    }
}

/// `GET /locks`
pub fn list_locks<S: LockStore + ?Sized>(manager: &LockManager<S>) -> ApiResponse {
    match manager.list_locked() {
        Ok(ids) => ApiResponse::ok(json!(ids)),
        Err(e) => e.into(),
    }
}

/// `POST /check_lock`
pub fn check_lock<S: LockStore + ?Sized>(
    manager: &LockManager<S>,
    session: &SessionId,
    request: &FileRequest,
) -> ApiResponse {
    let file_id = match require_file_id(request) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match manager.check_lock(&file_id, session) {
        Ok(status) => ApiResponse::ok(json!(status)),
        Err(e) => e.into(),
    }
}

/// `POST /acquire_lock`
pub fn acquire_lock<S: LockStore + ?Sized>(
    manager: &LockManager<S>,
    session: &SessionId,
    request: &FileRequest,
) -> ApiResponse {
    let file_id = match require_file_id(request) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match manager.acquire(&file_id, session) {
        Ok(AcquireOutcome::Acquired(_)) => ApiResponse::ok(json!("OK")),
        Ok(AcquireOutcome::Conflict { owner }) => ApiResponse {
            status: STATUS_CONFLICT,
            body: json!({
                "error": format!("file '{}' is locked by another session", file_id),
                "owner": owner,
            }),
        },
        Err(e) => e.into(),
    }
}

/// `POST /release_lock`
pub fn release_lock<S: LockStore + ?Sized>(
    manager: &LockManager<S>,
    session: &SessionId,
    request: &FileRequest,
) -> ApiResponse {
    let file_id = match require_file_id(request) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let outcome = match manager.release(&file_id, session) {
        Ok(outcome) => outcome,
        Err(e) => return e.into(),
    };

    let (status, message) = match &outcome {
        ReleaseOutcome::Released => (STATUS_OK, format!("lock on '{}' released", file_id)),
        ReleaseOutcome::AlreadyReleased => {
            (STATUS_OK, format!("no active lock on '{}' to release", file_id))
        }
        ReleaseOutcome::NotOwner { owner } => (
            STATUS_CONFLICT,
            format!("lock on '{}' is held by session '{}'", file_id, owner),
        ),
    };

    ApiResponse {
        status,
        body: json!({ "action": outcome.action(), "message": message }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TEST_TTL_SECS, memory_manager, session};

    #[test]
    fn test_acquire_then_conflict() {
        let (manager, _clock) = memory_manager();
        let request = FileRequest::new("doc-1");

        let response = acquire_lock(&manager, &session("alice"), &request);
        assert_eq!(response.status, STATUS_OK);
        assert_eq!(response.body, json!("OK"));

        let response = acquire_lock(&manager, &session("bob"), &request);
        assert_eq!(response.status, STATUS_CONFLICT);
        assert_eq!(response.body["owner"], json!("alice"));
    }

    #[test]
    fn test_missing_file_id_is_bad_request() {
        let (manager, _clock) = memory_manager();
        let request: FileRequest = serde_json::from_str("{}").unwrap();

        for response in [
            check_lock(&manager, &session("alice"), &request),
            acquire_lock(&manager, &session("alice"), &request),
            release_lock(&manager, &session("alice"), &request),
        ] {
            assert_eq!(response.status, STATUS_BAD_REQUEST);
            assert!(
                response.body["error"]
                    .as_str()
                    .unwrap()
                    .contains("file_id")
            );
        }
    }

    #[test]
    fn test_empty_file_id_is_bad_request() {
        let (manager, _clock) = memory_manager();
        let response = acquire_lock(&manager, &session("alice"), &FileRequest::new(""));
        assert_eq!(response.status, STATUS_BAD_REQUEST);
    }

    #[test]
    fn test_check_lock_body() {
        let (manager, _clock) = memory_manager();
        let request = FileRequest::new("doc-1");
        acquire_lock(&manager, &session("alice"), &request);

        let response = check_lock(&manager, &session("bob"), &request);
        assert_eq!(response.body, json!({ "is_locked": true }));

        let response = check_lock(&manager, &session("alice"), &request);
        assert_eq!(response.body, json!({ "is_locked": false }));
    }

    #[test]
    fn test_release_actions() {
        let (manager, _clock) = memory_manager();
        let request = FileRequest::new("doc-1");
        acquire_lock(&manager, &session("alice"), &request);

        let response = release_lock(&manager, &session("bob"), &request);
        assert_eq!(response.status, STATUS_CONFLICT);
        assert_eq!(response.body["action"], json!("not_owner"));

        let response = release_lock(&manager, &session("alice"), &request);
        assert_eq!(response.status, STATUS_OK);
        assert_eq!(response.body["action"], json!("released"));

        let response = release_lock(&manager, &session("alice"), &request);
        assert_eq!(response.status, STATUS_OK);
        assert_eq!(response.body["action"], json!("already_released"));
        assert!(response.body["message"].is_string());
    }

    #[test]
    fn test_list_locks_body() {
        let (manager, clock) = memory_manager();
        acquire_lock(&manager, &session("alice"), &FileRequest::new("b.pdf"));
        acquire_lock(&manager, &session("bob"), &FileRequest::new("a.pdf"));

        let response = list_locks(&manager);
        assert!(response.is_success());
        assert_eq!(response.body, json!(["a.pdf", "b.pdf"]));

        clock.advance(chrono::Duration::seconds(TEST_TTL_SECS));
        assert_eq!(list_locks(&manager).body, json!([]));
    }

    #[test]
    fn test_store_failure_is_internal_error() {
        let response: ApiResponse =
            LeaseError::StoreUnavailable("disk unplugged".to_string()).into();
        assert_eq!(response.status, STATUS_INTERNAL_ERROR);
        assert!(
            response.body["error"]
                .as_str()
                .unwrap()
                .contains("disk unplugged")
        );
    }
}
