//! Wire types for the line-delimited JSON command protocol.
//!
//! One JSON object per line in each direction. Requests form a closed set
//! tagged by `cmd`; anything else is a parse error that the server turns
//! into an error response instead of dying.

use recall_index::{DirectorySummary, FileReport, IndexOutcome, SearchHit, SkipReason};
use serde::{Deserialize, Serialize};

/// A command from the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Request {
    /// Open the store and load the model. Must come first.
    Init {
        #[serde(default)]
        db_path: Option<String>,
    },
    IndexFile {
        path: String,
        #[serde(default)]
        force: bool,
    },
    IndexDir {
        path: String,
        #[serde(default)]
        extensions: Option<Vec<String>>,
        #[serde(default)]
        force: bool,
    },
    Search {
        query: String,
        #[serde(default)]
        limit: Option<usize>,
    },
    Stats,
    Clear,
    Quit,
}

/// A reply to the client, tagged by `status`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    /// Startup handshake, emitted once before any request is read.
    Ready,
    Ok {
        #[serde(flatten)]
        body: OkBody,
    },
    Indexed {
        path: String,
        chunks: usize,
    },
    Skipped {
        path: String,
        reason: SkipReason,
    },
    Error {
        error: String,
    },
    Bye,
}

/// Payloads sharing the plain `ok` status.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OkBody {
    Init {
        db_path: String,
        count: u64,
    },
    Search {
        results: Vec<SearchHit>,
    },
    Summary {
        indexed: usize,
        skipped: usize,
        errors: usize,
        files: Vec<FileReport>,
    },
    Count {
        count: u64,
    },
    Empty {},
}

impl Response {
    pub fn ok() -> Self {
        Response::Ok {
            body: OkBody::Empty {},
        }
    }

    pub fn init(db_path: String, count: u64) -> Self {
        Response::Ok {
            body: OkBody::Init { db_path, count },
        }
    }

    pub fn search(results: Vec<SearchHit>) -> Self {
        Response::Ok {
            body: OkBody::Search { results },
        }
    }

    pub fn summary(summary: DirectorySummary) -> Self {
        Response::Ok {
            body: OkBody::Summary {
                indexed: summary.indexed,
                skipped: summary.skipped,
                errors: summary.errors,
                files: summary.files,
            },
        }
    }

    pub fn count(count: u64) -> Self {
        Response::Ok {
            body: OkBody::Count { count },
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            error: message.into(),
        }
    }
}

impl From<IndexOutcome> for Response {
    fn from(outcome: IndexOutcome) -> Self {
        match outcome {
            IndexOutcome::Indexed { path, chunks } => Response::Indexed { path, chunks },
            IndexOutcome::Skipped { path, reason } => Response::Skipped { path, reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_parse_from_tagged_json() {
        let req: Request = serde_json::from_str(r#"{"cmd": "init"}"#).unwrap();
        assert_eq!(req, Request::Init { db_path: None });

        let req: Request =
            serde_json::from_str(r#"{"cmd": "index_file", "path": "/w/a.md"}"#).unwrap();
        assert_eq!(
            req,
            Request::IndexFile {
                path: "/w/a.md".to_string(),
                force: false
            }
        );

        let req: Request =
            serde_json::from_str(r#"{"cmd": "search", "query": "milk", "limit": 3}"#).unwrap();
        assert_eq!(
            req,
            Request::Search {
                query: "milk".to_string(),
                limit: Some(3)
            }
        );
    }

    #[test]
    fn optional_fields_default() {
        let req: Request =
            serde_json::from_str(r#"{"cmd": "index_dir", "path": "/w"}"#).unwrap();
        assert_eq!(
            req,
            Request::IndexDir {
                path: "/w".to_string(),
                extensions: None,
                force: false
            }
        );
    }

    #[test]
    fn unknown_cmd_is_a_parse_error() {
        let result = serde_json::from_str::<Request>(r#"{"cmd": "explode"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn responses_carry_flat_status() {
        let value = serde_json::to_value(Response::Ready).unwrap();
        assert_eq!(value, serde_json::json!({"status": "ready"}));

        let value = serde_json::to_value(Response::ok()).unwrap();
        assert_eq!(value, serde_json::json!({"status": "ok"}));

        let value = serde_json::to_value(Response::count(7)).unwrap();
        assert_eq!(value, serde_json::json!({"status": "ok", "count": 7}));

        let value = serde_json::to_value(Response::init("/tmp/db".to_string(), 0)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"status": "ok", "db_path": "/tmp/db", "count": 0})
        );
    }

    #[test]
    fn index_outcome_converts_to_wire_shape() {
        let outcome = IndexOutcome::Indexed {
            path: "/w/a.md".to_string(),
            chunks: 4,
        };
        let value = serde_json::to_value(Response::from(outcome)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"status": "indexed", "path": "/w/a.md", "chunks": 4})
        );

        let outcome = IndexOutcome::Skipped {
            path: "/w/a.md".to_string(),
            reason: SkipReason::Unchanged,
        };
        let value = serde_json::to_value(Response::from(outcome)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"status": "skipped", "path": "/w/a.md", "reason": "unchanged"})
        );
    }
}
