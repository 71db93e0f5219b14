//! The `/api/v1/calculate` endpoint.
//!
//! Maps the core's outcome onto three response classes: success,
//! client fault (malformed expression) and other faults (division by
//! zero, internal failures).

use arith_core::{EvalError, evaluate};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::http::{Request, Response, StatusCode};

pub const CALCULATE_PATH: &str = "/api/v1/calculate";

const MSG_INVALID_JSON: &str = "Invalid JSON";
const MSG_NOT_VALID: &str = "Expression is not valid";
const MSG_DIVISION_BY_ZERO: &str = "Division by zero";
const MSG_INTERNAL: &str = "Internal server error";

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub expression: String,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CalculateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// How a failed evaluation is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Client,
    Semantic,
    Internal,
}

impl Fault {
    pub fn of(err: &EvalError) -> Self {
        match err {
            EvalError::InvalidExpression | EvalError::MismatchedParentheses => Fault::Client,
            EvalError::DivisionByZero => Fault::Semantic,
            EvalError::Internal(_) => Fault::Internal,
        }
    }

    fn status(self) -> StatusCode {
        match self {
            Fault::Client => StatusCode::UnprocessableEntity,
            Fault::Semantic => StatusCode::BadRequest,
            Fault::Internal => StatusCode::InternalServerError,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Fault::Client => MSG_NOT_VALID,
            Fault::Semantic => MSG_DIVISION_BY_ZERO,
            Fault::Internal => MSG_INTERNAL,
        }
    }
}

/// Route a request and produce its response.
pub fn handle(request: &Request) -> Response {
    if request.path != CALCULATE_PATH {
        return Response::text(StatusCode::NotFound);
    }
    if request.method != "POST" {
        return Response::text(StatusCode::MethodNotAllowed);
    }

    let payload: CalculateRequest = match serde_json::from_slice(&request.body) {
        Ok(payload) => payload,
        Err(err) => {
            info!("rejected request body: {err}");
            return error_response(StatusCode::BadRequest, MSG_INVALID_JSON);
        }
    };

    calculate(&payload.expression)
}

/// Evaluate `expression` and build the JSON response for its outcome.
pub fn calculate(expression: &str) -> Response {
    match evaluate(expression) {
        Ok(value) if value.is_finite() => {
            info!("{expression:?} = {value}");
            body_response(
                StatusCode::Ok,
                &CalculateResponse {
                    result: Some(value),
                    error: None,
                },
            )
        }
        Ok(value) => {
            // JSON has no representation for infinities or NaN.
            warn!("{expression:?} produced non-finite result {value}");
            error_response(StatusCode::InternalServerError, MSG_INTERNAL)
        }
        Err(err) => {
            let fault = Fault::of(&err);
            match fault {
                Fault::Internal => warn!("{expression:?} failed: {err}"),
                _ => info!("{expression:?} failed: {err}"),
            }
            error_response(fault.status(), fault.message())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    body_response(
        status,
        &CalculateResponse {
            result: None,
            error: Some(message.to_string()),
        },
    )
}

fn body_response(status: StatusCode, body: &CalculateResponse) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => Response::json(status, bytes),
        Err(err) => {
            warn!("failed to encode response: {err}");
            Response::text(StatusCode::InternalServerError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(body: &str) -> Request {
        Request {
            method: "POST".to_string(),
            path: CALCULATE_PATH.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: body.as_bytes().to_vec(),
        }
    }

    fn decode(response: &Response) -> CalculateResponse {
        serde_json::from_slice(&response.body).expect("json body")
    }

    #[test]
    fn returns_result_on_success() {
        let response = handle(&post(r#"{"expression": "2+2*2"}"#));
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(response.content_type, "application/json");
        assert_eq!(response.body, br#"{"result":6.0}"#);
    }

    #[test]
    fn malformed_expressions_are_client_faults() {
        for expression in ["1+a", "(1+2", "1+", ""] {
            let body = serde_json::json!({ "expression": expression }).to_string();
            let response = handle(&post(&body));
            assert_eq!(response.status, StatusCode::UnprocessableEntity, "{expression:?}");
            assert_eq!(decode(&response).error.as_deref(), Some(MSG_NOT_VALID));
        }
    }

    #[test]
    fn division_by_zero_is_distinguishable() {
        let response = handle(&post(r#"{"expression": "1/0"}"#));
        assert_eq!(response.status, StatusCode::BadRequest);
        assert_eq!(
            decode(&response),
            CalculateResponse {
                result: None,
                error: Some(MSG_DIVISION_BY_ZERO.to_string()),
            }
        );
    }

    #[test]
    fn missing_expression_field_is_blank() {
        let response = handle(&post("{}"));
        assert_eq!(response.status, StatusCode::UnprocessableEntity);
    }

    #[test]
    fn rejects_bad_json() {
        for body in ["", "not json", r#"{"expression": 5}"#] {
            let response = handle(&post(body));
            assert_eq!(response.status, StatusCode::BadRequest, "{body:?}");
            assert_eq!(decode(&response).error.as_deref(), Some(MSG_INVALID_JSON));
        }
    }

    #[test]
    fn rejects_other_methods() {
        let mut request = post("");
        request.method = "GET".to_string();
        assert_eq!(handle(&request).status, StatusCode::MethodNotAllowed);
    }

    #[test]
    fn unknown_path_is_not_found() {
        let mut request = post(r#"{"expression": "1"}"#);
        request.path = "/api/v2/calculate".to_string();
        assert_eq!(handle(&request).status, StatusCode::NotFound);
    }

    #[test]
    fn overflow_to_infinity_is_internal() {
        let huge = "9".repeat(400);
        let response = calculate(&format!("{huge}*{huge}"));
        assert_eq!(response.status, StatusCode::InternalServerError);
        assert_eq!(decode(&response).error.as_deref(), Some(MSG_INTERNAL));
    }

    #[test]
    fn fault_classes() {
        assert_eq!(Fault::of(&EvalError::InvalidExpression), Fault::Client);
        assert_eq!(Fault::of(&EvalError::MismatchedParentheses), Fault::Client);
        assert_eq!(Fault::of(&EvalError::DivisionByZero), Fault::Semantic);
        assert_eq!(Fault::of(&EvalError::Internal("x".into())), Fault::Internal);
    }
}
