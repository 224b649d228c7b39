use crate::detect::SourceTag;
use crate::payload::RequestPayload;
use async_trait::async_trait;

/// Whatever a plant returns; the controller stores it without inspection
pub type DispatchResult = serde_json::Value;

/// Everything a plant is constructed with
///
/// The payload no longer carries the request-type field at this point, and
/// the user token is forwarded unchanged; the controller never inspects it.
#[derive(Clone, Debug)]
pub struct PlantContext {
    /// How the request was obtained
    pub method: SourceTag,
    /// All remaining request fields
    pub payload: RequestPayload,
    /// Opaque authorized-user token ("none" when unset)
    pub user: String,
}

/// An installable unit of request-handling logic, selected by name
///
/// Plants may perform I/O, persist state, or emit further responses; the
/// controller delegates all of that and only forwards the api-mode flag and
/// the transport-method hint unchanged.
#[async_trait]
pub trait Plant: Send {
    fn name(&self) -> &'static str;

    /// Service the request this plant was constructed with
    async fn process_request(&mut self, api_mode: bool, http_method: Option<&str>)
    -> DispatchResult;
}
