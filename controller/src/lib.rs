//! Front controller for the greenhouse platform.
//!
//! An inbound request declares its type in a `cash_request_type` field. The
//! controller normalizes the request, resolves the type against the set of
//! installed handler implementations ("Plants"), constructs the matching
//! Plant with the remaining payload, invokes it, and stores its response.
//!
//! # Dispatch model
//!
//! ```text
//! TransportParams ──detect──▶ RequestPayload + SourceTag
//!                                     │
//!                            FrontController::process_request
//!                                     │
//!                    plant array (disk) + PlantRegistry (factories)
//!                                     │
//!               Dispatched(response)  or  NoOp(reason)
//! ```
//!
//! Absent, malformed, or unroutable requests degrade to a
//! [`DispatchOutcome::NoOp`]; only deployment defects (a plant installed on
//! disk with no compiled-in factory) surface as errors.

pub mod config;
pub mod daemon;
pub mod detect;
pub mod dispatcher;
pub mod errors;
pub mod metrics_defs;
pub mod payload;
pub mod plant;
pub mod registry;
pub mod testutils;

pub use detect::{SourceTag, TransportParams};
pub use dispatcher::{DispatchOutcome, FrontController, NoOpReason};
pub use errors::{ControllerError, RegistryError, Result};
pub use payload::{ParamValue, REQUEST_TYPE_FIELD, RequestPayload};
pub use plant::{DispatchResult, Plant, PlantContext};
pub use registry::{PlantRegistry, build_plant_array};
