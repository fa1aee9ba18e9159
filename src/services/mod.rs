//! Client-side services: session, validation, detection pipeline,
//! history ledger and the workflow controller that wires them together

pub mod controller;
pub mod detection;
pub mod history;
pub mod session;
pub mod validator;

use crate::models::ErrorBody;

/// Extract the user-facing message from a failure response.
///
/// All endpoints report failures as `{"detail": "..."}` when they can;
/// an absent or unparseable body degrades to the stage default instead
/// of erroring.
pub(crate) async fn failure_message(response: reqwest::Response, default: &str) -> String {
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody { detail: Some(msg) }) => msg,
        _ => default.to_string(),
    }
}
