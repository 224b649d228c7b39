//! Request source detection
//!
//! A live transport hit arrives with two parallel parameter sets: submitted
//! form data and query-string data. Detection picks the first source that
//! declares a request type; form data is trusted over query parameters and
//! the losing source is ignored entirely, even if it also carries request
//! data. Neither source declaring a type is a normal outcome (static-asset
//! hits), not an error.

use crate::payload::{REQUEST_TYPE_FIELD, RequestPayload};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// How a request was obtained
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    /// Supplied programmatically, bypassing detection
    Direct,
    /// Taken from submitted form data
    Post,
    /// Taken from query-string data
    Get,
}

impl SourceTag {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Direct => "direct",
            SourceTag::Post => "post",
            SourceTag::Get => "get",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two candidate parameter sources of one transport hit
#[derive(Clone, Debug, Default)]
pub struct TransportParams {
    /// Submitted form data (checked first)
    pub form: RequestPayload,
    /// Query-string data (checked second)
    pub query: RequestPayload,
}

// Irreversible once detection has run; there is no reset path within the
// process. See detect_once.
static DETECTION_RAN: AtomicBool = AtomicBool::new(false);

fn carries_request_type(payload: &RequestPayload) -> bool {
    payload
        .get(REQUEST_TYPE_FIELD)
        .is_some_and(|value| !value.scalar().trim().is_empty())
}

/// Inspects both candidate sources and returns the winning payload with its
/// source tag, or `None` when neither declares a request type.
pub fn detect(params: &TransportParams) -> Option<(RequestPayload, SourceTag)> {
    if carries_request_type(&params.form) {
        return Some((params.form.clone(), SourceTag::Post));
    }
    if carries_request_type(&params.query) {
        return Some((params.query.clone(), SourceTag::Get));
    }
    None
}

/// Process-wide, run-at-most-once variant of [`detect`].
///
/// The first call in a process performs detection and flips a process-wide
/// flag; every later call is a no-op returning `None` regardless of input.
/// This is an idempotency guarantee, not memoization: callers must not rely
/// on a second call producing a result. Long-lived servers that want
/// per-request scoping should call [`detect`] directly.
pub fn detect_once(params: &TransportParams) -> Option<(RequestPayload, SourceTag)> {
    if DETECTION_RAN.swap(true, Ordering::SeqCst) {
        debug!("request detection already ran in this process; skipping");
        return None;
    }
    detect(params)
}
