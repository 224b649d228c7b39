//! The dispatch protocol
//!
//! A [`FrontController`] moves through `Idle → RequestReceived → Resolving`
//! and terminates in either `Dispatched` (a plant produced a response) or
//! `NoOp` (the request was absent, malformed, or unroutable). The no-op
//! paths are deliberate policy: unroutable and malformed requests are
//! absorbed silently, never raised as errors. Only a deployment defect — a
//! plant installed on disk with no compiled-in factory — propagates.

use crate::daemon::HousekeepingTrigger;
use crate::detect::{self, SourceTag, TransportParams};
use crate::errors::{ControllerError, Result};
use crate::metrics_defs::{DISPATCH_NOOPS, DISPATCHES};
use crate::payload::RequestPayload;
use crate::plant::{DispatchResult, PlantContext};
use crate::registry::{self, PlantRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why a dispatch produced no response
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoOpReason {
    /// No request was supplied or detected
    NoRequest,
    /// The request-type field was missing, or empty after trimming
    EmptyRequestType,
    /// The request type came with no accompanying data
    EmptyPayload,
    /// The request type resolved to no installed plant
    Unroutable(String),
    /// The discovery location could not be read
    RegistryUnavailable,
}

/// Terminal outcome of one dispatch
#[derive(Debug)]
pub enum DispatchOutcome {
    /// A plant was constructed, invoked, and produced this result
    Dispatched(DispatchResult),
    /// No response was produced; see the reason
    NoOp(NoOpReason),
}

impl DispatchOutcome {
    pub fn response(&self) -> Option<&DispatchResult> {
        match self {
            DispatchOutcome::Dispatched(result) => Some(result),
            DispatchOutcome::NoOp(_) => None,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, DispatchOutcome::NoOp(_))
    }
}

/// Front controller: resolves a declared request type to a plant and
/// dispatches the request to it
///
/// One controller handles one logical request at a time, but is re-entrant:
/// `process_request` may be called repeatedly with different payloads, each
/// call re-deriving the request type, rebuilding the plant array, and
/// overwriting the stored response. Controllers must not be shared mutably
/// across concurrent requests; construct one per request instead.
pub struct FrontController {
    registry: Arc<PlantRegistry>,
    discovery_root: Option<PathBuf>,
    method: SourceTag,
    user: String,
    api_mode: bool,
    http_method: Option<String>,
    response: Option<DispatchResult>,
}

impl FrontController {
    /// Protocol version reported to callers
    pub const VERSION: u32 = 9;

    pub fn new(registry: Arc<PlantRegistry>) -> Self {
        Self {
            registry,
            discovery_root: None,
            method: SourceTag::Direct,
            user: "none".to_string(),
            api_mode: false,
            http_method: None,
            response: None,
        }
    }

    /// Directory whose entries gate which request types are routable.
    /// When set, the plant array is rebuilt from it on every dispatch.
    pub fn with_discovery_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.discovery_root = Some(root.into());
        self
    }

    /// Marks this controller as servicing an API-mode caller
    pub fn with_api_mode(mut self, api_mode: bool) -> Self {
        self.api_mode = api_mode;
        self
    }

    /// Default transport-method hint forwarded to plants when a dispatch
    /// call does not supply one
    pub fn with_http_method(mut self, http_method: impl Into<String>) -> Self {
        self.http_method = Some(http_method.into());
        self
    }

    /// Attaches the background trigger; it rolls its dice immediately, once
    /// per controller construction, independent of any dispatch outcome.
    ///
    /// Must be called within a Tokio runtime.
    pub fn with_housekeeping(self, trigger: &HousekeepingTrigger) -> Self {
        trigger.maybe_spawn();
        self
    }

    pub fn version(&self) -> u32 {
        Self::VERSION
    }

    pub fn method(&self) -> SourceTag {
        self.method
    }

    /// Stores the opaque authorized-user token and returns it
    pub fn set_authorized_user(&mut self, user: impl Into<String>) -> &str {
        self.user = user.into();
        &self.user
    }

    /// Response held from the most recent dispatch, if it produced one
    pub fn response(&self) -> Option<&DispatchResult> {
        self.response.as_ref()
    }

    /// Direct-invocation entry point: dispatches an explicitly supplied
    /// payload, bypassing source detection entirely
    pub async fn dispatch_direct(&mut self, payload: RequestPayload) -> Result<DispatchOutcome> {
        self.process_request(payload, SourceTag::Direct, None).await
    }

    /// Transport entry point: runs source detection (at most once per
    /// process) and dispatches whatever it finds
    pub async fn dispatch_detected(
        &mut self,
        params: &TransportParams,
    ) -> Result<DispatchOutcome> {
        match detect::detect_once(params) {
            Some((payload, tag)) => self.process_request(payload, tag, None).await,
            None => Ok(self.noop(NoOpReason::NoRequest)),
        }
    }

    /// Resolves and dispatches one request
    ///
    /// `http_method` is a per-call transport hint; when `None`, the
    /// controller's configured default (if any) is forwarded instead.
    pub async fn process_request(
        &mut self,
        mut payload: RequestPayload,
        method: SourceTag,
        http_method: Option<&str>,
    ) -> Result<DispatchOutcome> {
        self.method = method;

        let requested = match payload.extract_request_type() {
            Some(key) if !key.is_empty() => key,
            _ => {
                debug!("no usable request type in payload");
                return Ok(self.noop(NoOpReason::EmptyRequestType));
            }
        };
        // A request type with no accompanying data is not actionable
        if payload.is_empty() {
            debug!(request_type = %requested, "request type carried no data");
            return Ok(self.noop(NoOpReason::EmptyPayload));
        }

        // With a discovery root configured, the plant array gates
        // routability and is rebuilt fresh on every dispatch.
        let discovered = match &self.discovery_root {
            Some(root) => match registry::build_plant_array(root) {
                Ok(plant_array) => match plant_array.get(&requested) {
                    Some(identifier) => Some(identifier.clone()),
                    None => {
                        info!(request_type = %requested, "no plant installed for request type");
                        return Ok(self.noop(NoOpReason::Unroutable(requested)));
                    }
                },
                Err(error) => {
                    warn!(%error, "plant discovery unavailable; ignoring request");
                    return Ok(self.noop(NoOpReason::RegistryUnavailable));
                }
            },
            None => None,
        };

        let ctx = PlantContext {
            method,
            payload,
            user: self.user.clone(),
        };
        let Some(mut plant) = self.registry.construct(&requested, ctx) else {
            if let Some(identifier) = discovered {
                // Installed on disk but absent from the compiled-in set:
                // a deployment defect, not a user input problem
                return Err(ControllerError::PlantConstruction { identifier });
            }
            info!(request_type = %requested, "no plant registered for request type");
            return Ok(self.noop(NoOpReason::Unroutable(requested)));
        };

        info!(
            request_type = %requested,
            plant = plant.name(),
            method = %method,
            api_mode = self.api_mode,
            "dispatching request"
        );
        let hint = http_method.or(self.http_method.as_deref());
        let result = plant.process_request(self.api_mode, hint).await;

        metrics::counter!(DISPATCHES.name).increment(1);
        self.response = Some(result.clone());
        Ok(DispatchOutcome::Dispatched(result))
    }

    fn noop(&mut self, reason: NoOpReason) -> DispatchOutcome {
        metrics::counter!(DISPATCH_NOOPS.name).increment(1);
        self.response = None;
        DispatchOutcome::NoOp(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::REQUEST_TYPE_FIELD;
    use crate::testutils::echo_registry;

    fn payload(fields: &[(&str, &str)]) -> RequestPayload {
        fields.iter().copied().collect()
    }

    #[tokio::test]
    async fn missing_request_type_is_a_noop() {
        let mut controller = FrontController::new(echo_registry(&["fan"]));
        let outcome = controller
            .dispatch_direct(payload(&[("email", "a@b.com")]))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            DispatchOutcome::NoOp(NoOpReason::EmptyRequestType)
        ));
        assert!(controller.response().is_none());
    }

    #[tokio::test]
    async fn request_type_without_data_is_a_noop() {
        let mut controller = FrontController::new(echo_registry(&["fan"]));
        let outcome = controller
            .dispatch_direct(payload(&[(REQUEST_TYPE_FIELD, "fan")]))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            DispatchOutcome::NoOp(NoOpReason::EmptyPayload)
        ));
    }

    #[tokio::test]
    async fn unregistered_request_type_is_absorbed_silently() {
        let mut controller = FrontController::new(echo_registry(&["fan"]));
        let outcome = controller
            .dispatch_direct(payload(&[
                (REQUEST_TYPE_FIELD, "commerce"),
                ("email", "a@b.com"),
            ]))
            .await
            .unwrap();

        match outcome {
            DispatchOutcome::NoOp(NoOpReason::Unroutable(key)) => assert_eq!(key, "commerce"),
            other => panic!("expected unroutable noop, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn mixed_case_request_type_resolves() {
        let mut controller = FrontController::new(echo_registry(&["fan"]));
        for spelling in [" Fan ", "fan", "FAN"] {
            let outcome = controller
                .dispatch_direct(payload(&[(REQUEST_TYPE_FIELD, spelling), ("email", "a@b.com")]))
                .await
                .unwrap();
            let response = outcome.response().expect("dispatched");
            assert_eq!(response["plant"], "EchoPlant");
        }
    }

    #[tokio::test]
    async fn dispatched_response_excludes_request_type_field() {
        let mut controller = FrontController::new(echo_registry(&["fan"]));
        let outcome = controller
            .dispatch_direct(payload(&[(REQUEST_TYPE_FIELD, "fan"), ("email", "a@b.com")]))
            .await
            .unwrap();

        let response = outcome.response().expect("dispatched");
        assert_eq!(response["fields"]["email"], "a@b.com");
        assert!(response["fields"].get(REQUEST_TYPE_FIELD).is_none());
        assert_eq!(response["method"], "direct");
        assert_eq!(controller.response(), Some(response));
    }

    #[tokio::test]
    async fn redispatch_overwrites_the_held_response() {
        let mut controller = FrontController::new(echo_registry(&["fan", "signup"]));

        controller
            .dispatch_direct(payload(&[(REQUEST_TYPE_FIELD, "fan"), ("email", "a@b.com")]))
            .await
            .unwrap();
        let first = controller.response().cloned().unwrap();

        controller
            .dispatch_direct(payload(&[(REQUEST_TYPE_FIELD, "signup"), ("email", "c@d.com")]))
            .await
            .unwrap();
        let second = controller.response().cloned().unwrap();

        assert_ne!(first, second);
        assert_eq!(second["fields"]["email"], "c@d.com");

        // A later no-op clears the held response
        controller
            .dispatch_direct(payload(&[("email", "a@b.com")]))
            .await
            .unwrap();
        assert!(controller.response().is_none());
    }

    #[tokio::test]
    async fn authorized_user_is_forwarded_unchanged() {
        let mut controller = FrontController::new(echo_registry(&["fan"]));
        assert_eq!(controller.set_authorized_user("token-123"), "token-123");

        let outcome = controller
            .dispatch_direct(payload(&[(REQUEST_TYPE_FIELD, "fan"), ("email", "a@b.com")]))
            .await
            .unwrap();
        assert_eq!(outcome.response().unwrap()["user"], "token-123");
    }

    #[tokio::test]
    async fn api_mode_and_http_hint_are_forwarded() {
        let mut controller = FrontController::new(echo_registry(&["fan"]))
            .with_api_mode(true)
            .with_http_method("PUT");

        let outcome = controller
            .process_request(
                payload(&[(REQUEST_TYPE_FIELD, "fan"), ("email", "a@b.com")]),
                SourceTag::Direct,
                None,
            )
            .await
            .unwrap();
        let response = outcome.response().unwrap();
        assert_eq!(response["api_mode"], true);
        assert_eq!(response["http_method"], "PUT");

        // A per-call hint wins over the configured default
        let outcome = controller
            .process_request(
                payload(&[(REQUEST_TYPE_FIELD, "fan"), ("email", "a@b.com")]),
                SourceTag::Direct,
                Some("DELETE"),
            )
            .await
            .unwrap();
        assert_eq!(outcome.response().unwrap()["http_method"], "DELETE");
    }

    #[test]
    fn version_is_a_static_constant() {
        let controller = FrontController::new(echo_registry(&[]));
        assert_eq!(controller.version(), FrontController::VERSION);
        assert_eq!(FrontController::VERSION, 9);
    }
}
