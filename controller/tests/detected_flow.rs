//! Detection-path behavior. Lives in its own test binary (and therefore its
//! own process) because source detection flips a process-wide flag.

use controller::testutils::echo_registry;
use controller::{
    DispatchOutcome, FrontController, NoOpReason, REQUEST_TYPE_FIELD, RequestPayload,
    TransportParams,
};

fn payload(fields: &[(&str, &str)]) -> RequestPayload {
    fields.iter().copied().collect()
}

#[tokio::test]
async fn detection_acts_once_while_direct_invocation_stays_reusable() {
    let mut controller = FrontController::new(echo_registry(&["fan", "signup"]));
    let params = TransportParams {
        form: payload(&[(REQUEST_TYPE_FIELD, "fan"), ("email", "a@b.com")]),
        query: RequestPayload::new(),
    };

    // First transport hit dispatches, tagged with its source
    let outcome = controller.dispatch_detected(&params).await.unwrap();
    let response = outcome.response().expect("dispatched");
    assert_eq!(response["method"], "post");

    // A second transport hit in the same process is a no-op by contract
    let outcome = controller.dispatch_detected(&params).await.unwrap();
    assert!(matches!(
        outcome,
        DispatchOutcome::NoOp(NoOpReason::NoRequest)
    ));

    // The direct-invocation path keeps working, twice, independently
    let first = controller
        .dispatch_direct(payload(&[(REQUEST_TYPE_FIELD, "fan"), ("email", "a@b.com")]))
        .await
        .unwrap();
    assert!(first.response().is_some());

    let second = controller
        .dispatch_direct(payload(&[(REQUEST_TYPE_FIELD, "signup"), ("email", "c@d.com")]))
        .await
        .unwrap();
    assert_eq!(second.response().unwrap()["fields"]["email"], "c@d.com");
}
