//! Translation of failed outcomes and pipeline faults into RFC 9457 problem
//! documents.
//!
//! Domain errors map by kind. Generic failures and unexpected faults are
//! reported with fixed text so internal details never reach the caller.

use std::collections::BTreeMap;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use recruitly_core::{Error, ErrorKind, Outcome};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::error;

use crate::pipeline::PipelineFault;

/// Content type for problem documents.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Type URIs identifying each problem category. Fixed per category.
pub mod problem_types {
    pub const BAD_REQUEST: &str = "https://datatracker.ietf.org/doc/html/rfc7231#section-6.5.1";
    pub const NOT_FOUND: &str = "https://datatracker.ietf.org/doc/html/rfc7231#section-6.5.4";
    pub const CONFLICT: &str = "https://datatracker.ietf.org/doc/html/rfc7231#section-6.5.8";
    pub const SERVER_ERROR: &str = "https://datatracker.ietf.org/doc/html/rfc7231#section-6.6.1";
}

pub const SERVER_FAILURE_TITLE: &str = "Server failure";
pub const SERVER_FAILURE_DETAIL: &str = "An unexpected error occurred";
pub const SERVER_ERROR_TITLE: &str = "Server Error";

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T
fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

fn deserialize_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<StatusCode, D::Error> {
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// External representation of a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    #[serde(serialize_with = "serialize_status", deserialize_with = "deserialize_status")]
    pub status: StatusCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Field-level messages of a validation failure, keyed by field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ProblemDetails {
    fn new(status: StatusCode, type_url: &str, title: impl Into<String>) -> Self {
        Self {
            type_url: type_url.to_owned(),
            title: title.into(),
            status,
            detail: None,
            errors: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Translates a domain error.
    ///
    /// # Panics
    ///
    /// Panics on `Error::none()`; there is no failure to translate.
    pub fn from_error(error: &Error) -> Self {
        assert!(!error.is_none(), "cannot translate Error::none() into a problem");

        match error.kind() {
            ErrorKind::Validation => {
                Self::new(StatusCode::BAD_REQUEST, problem_types::BAD_REQUEST, error.code())
                    .with_detail(error.description())
                    .with_errors(field_errors(error))
            }
            ErrorKind::Problem => {
                Self::new(StatusCode::BAD_REQUEST, problem_types::BAD_REQUEST, error.code())
                    .with_detail(error.description())
            }
            ErrorKind::NotFound => {
                Self::new(StatusCode::NOT_FOUND, problem_types::NOT_FOUND, error.code())
                    .with_detail(error.description())
            }
            ErrorKind::Conflict => {
                Self::new(StatusCode::CONFLICT, problem_types::CONFLICT, error.code())
                    .with_detail(error.description())
            }
            ErrorKind::Failure => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                problem_types::SERVER_ERROR,
                SERVER_FAILURE_TITLE,
            )
            .with_detail(SERVER_FAILURE_DETAIL),
        }
    }

    /// Translates a failed outcome.
    ///
    /// # Panics
    ///
    /// Panics if `outcome` is a success.
    pub fn from_outcome<T>(outcome: &Outcome<T>) -> Self {
        assert!(
            outcome.is_failure(),
            "cannot translate a successful outcome into a problem"
        );
        Self::from_error(outcome.error())
    }

    /// Translates a fault that escaped the pipeline.
    pub fn from_fault(fault: &PipelineFault) -> Self {
        match fault {
            PipelineFault::BusinessRule(violation) => Self::new(
                StatusCode::CONFLICT,
                problem_types::CONFLICT,
                violation.message(),
            ),
            PipelineFault::TenantNotResolved { message } => {
                Self::new(StatusCode::BAD_REQUEST, problem_types::BAD_REQUEST, message.as_str())
            }
            PipelineFault::HandlerNotRegistered { .. }
            | PipelineFault::Cancelled { .. }
            | PipelineFault::Internal(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                problem_types::SERVER_ERROR,
                SERVER_ERROR_TITLE,
            ),
        }
    }

    fn with_errors(mut self, errors: BTreeMap<String, Vec<String>>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Groups the component errors of a validation error by code. A validation
/// error without components reports itself.
fn field_errors(error: &Error) -> BTreeMap<String, Vec<String>> {
    let components = error.validation_errors();
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();

    if components.is_empty() {
        map.insert(error.code().to_owned(), vec![error.description().to_owned()]);
        return map;
    }

    for component in components {
        map.entry(component.code().to_owned())
            .or_default()
            .push(component.description().to_owned());
    }
    map
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = self.status;
        let mut resp = Json(self).into_response();
        *resp.status_mut() = status;
        resp.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_PROBLEM_JSON));
        resp
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Anything that ends a request unsuccessfully at the API boundary.
#[derive(Debug)]
pub enum ApiError {
    /// The handler returned a failed outcome.
    Failed(Error),
    /// The pipeline aborted with a fault.
    Fault(PipelineFault),
}

impl ApiError {
    /// # Panics
    ///
    /// Panics if `outcome` is a success.
    pub fn from_outcome<T>(outcome: Outcome<T>) -> Self {
        assert!(
            outcome.is_failure(),
            "cannot translate a successful outcome into a problem"
        );
        Self::Failed(outcome.error().clone())
    }

    pub fn problem(&self) -> ProblemDetails {
        match self {
            Self::Failed(error) => ProblemDetails::from_error(error),
            Self::Fault(fault) => ProblemDetails::from_fault(fault),
        }
    }
}

impl From<PipelineFault> for ApiError {
    fn from(fault: PipelineFault) -> Self {
        Self::Fault(fault)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Fault(fault) = &self {
            error!(fault = %fault, "An error occurred while processing the request.");
        }
        self.problem().into_response()
    }
}

/// Renders a dispatch result: the value of a success as JSON with 200,
/// anything else as a problem document.
pub fn into_api_response<T: Serialize>(result: Result<Outcome<T>, PipelineFault>) -> Response {
    match result {
        Ok(outcome) => match outcome.into_result() {
            Ok(value) => Json(value).into_response(),
            Err(error) => ApiError::Failed(error).into_response(),
        },
        Err(fault) => ApiError::Fault(fault).into_response(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use recruitly_core::{BusinessRuleViolation, ValidationError};
    use tracing::Level;

    use super::*;
    use crate::pipeline::behaviors::logging::tests::capture;

    const FAULT_LOGGED: &str = "An error occurred while processing the request.";

    #[test]
    fn fault_is_logged_once_at_the_boundary() {
        let (captured, _guard) = capture();

        let resp = into_api_response::<u8>(Err(PipelineFault::Internal(anyhow::anyhow!(
            "pool exhausted"
        ))));

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(captured.messages(), vec![FAULT_LOGGED]);
        assert_eq!(captured.level_of(FAULT_LOGGED), Some(Level::ERROR));
    }

    #[test]
    fn failed_outcome_is_not_logged_at_the_boundary() {
        let (captured, _guard) = capture();

        let resp = into_api_response(Ok(Outcome::<u8>::failure(Error::not_found(
            "Order.Missing",
            "Order 42 not found",
        ))));

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(captured.messages().is_empty());
    }

    #[test]
    fn validation_maps_to_400_with_field_errors() {
        let err: Error = ValidationError::new(vec![
            Error::validation("Email", "Email is required"),
            Error::validation("Email", "Email is malformed"),
            Error::validation("Name", "Name is required"),
        ])
        .into();

        let problem = ProblemDetails::from_error(&err);

        assert_eq!(problem.status, StatusCode::BAD_REQUEST);
        assert_eq!(problem.title, "General.Validation");
        assert_eq!(
            problem.detail.as_deref(),
            Some("One or more validation errors occurred")
        );
        assert_eq!(problem.type_url, problem_types::BAD_REQUEST);
        let errors = problem.errors.unwrap();
        assert_eq!(
            errors["Email"],
            vec!["Email is required", "Email is malformed"]
        );
        assert_eq!(errors["Name"], vec!["Name is required"]);
    }

    #[test]
    fn single_validation_error_reports_itself() {
        let problem = ProblemDetails::from_error(&Error::validation("Email", "Email is required"));
        let errors = problem.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["Email"], vec!["Email is required"]);
    }

    #[test]
    fn problem_maps_to_400() {
        let problem = ProblemDetails::from_error(&Error::problem("Vacancy.Closed", "Closed"));
        assert_eq!(problem.status, StatusCode::BAD_REQUEST);
        assert_eq!(problem.title, "Vacancy.Closed");
        assert_eq!(problem.detail.as_deref(), Some("Closed"));
        assert!(problem.errors.is_none());
    }

    #[test]
    fn not_found_maps_to_404() {
        let problem =
            ProblemDetails::from_error(&Error::not_found("Order.Missing", "Order 42 not found"));
        assert_eq!(problem.status, StatusCode::NOT_FOUND);
        assert_eq!(problem.title, "Order.Missing");
        assert_eq!(problem.detail.as_deref(), Some("Order 42 not found"));
        assert_eq!(problem.type_url, problem_types::NOT_FOUND);
    }

    #[test]
    fn conflict_maps_to_409() {
        let problem = ProblemDetails::from_error(&Error::conflict("Order.Locked", "Locked"));
        assert_eq!(problem.status, StatusCode::CONFLICT);
        assert_eq!(problem.type_url, problem_types::CONFLICT);
    }

    #[test]
    fn failure_hides_description() {
        let problem = ProblemDetails::from_error(&Error::failure(
            "Db.Timeout",
            "connection to 10.0.0.3 timed out",
        ));
        assert_eq!(problem.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(problem.title, SERVER_FAILURE_TITLE);
        assert_eq!(problem.detail.as_deref(), Some(SERVER_FAILURE_DETAIL));
        assert_eq!(problem.type_url, problem_types::SERVER_ERROR);
    }

    #[test]
    #[should_panic(expected = "cannot translate Error::none()")]
    fn none_is_rejected() {
        let _ = ProblemDetails::from_error(&Error::none());
    }

    #[test]
    #[should_panic(expected = "cannot translate a successful outcome")]
    fn success_is_rejected() {
        let _ = ProblemDetails::from_outcome(&Outcome::success(1));
    }

    #[test]
    fn business_rule_fault_maps_to_409() {
        let fault = PipelineFault::from(BusinessRuleViolation::new("Shipped orders cannot be cancelled"));
        let problem = ProblemDetails::from_fault(&fault);
        assert_eq!(problem.status, StatusCode::CONFLICT);
        assert_eq!(problem.title, "Shipped orders cannot be cancelled");
        assert!(problem.detail.is_none());
    }

    #[test]
    fn tenant_fault_maps_to_400() {
        let fault = PipelineFault::TenantNotResolved {
            message: "no tenant".to_string(),
        };
        let problem = ProblemDetails::from_fault(&fault);
        assert_eq!(problem.status, StatusCode::BAD_REQUEST);
        assert_eq!(problem.title, "no tenant");
        assert_eq!(problem.type_url, problem_types::BAD_REQUEST);
    }

    #[test]
    fn other_faults_map_to_opaque_500() {
        let fault = PipelineFault::Internal(anyhow::anyhow!("pool exhausted"));
        let problem = ProblemDetails::from_fault(&fault);
        assert_eq!(problem.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(problem.title, SERVER_ERROR_TITLE);
        assert!(problem.detail.is_none());

        let unwired = PipelineFault::HandlerNotRegistered { request: "GetOrder" };
        assert_eq!(ProblemDetails::from_fault(&unwired).title, SERVER_ERROR_TITLE);
    }

    #[test]
    fn serializes_as_problem_json() {
        let problem = ProblemDetails::from_error(&Error::validation("Email", "required"));
        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["type"], problem_types::BAD_REQUEST);
        assert_eq!(json["status"], 400);
        assert_eq!(json["errors"]["Email"][0], "required");

        let fault = ProblemDetails::from_fault(&PipelineFault::Internal(anyhow::anyhow!("x")));
        let json = serde_json::to_value(&fault).unwrap();
        assert!(json.get("detail").is_none());
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn response_carries_status_and_content_type() {
        let resp = ApiError::from_outcome(Outcome::<()>::failure(Error::conflict("C", "c")))
            .into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(resp.headers()[CONTENT_TYPE], APPLICATION_PROBLEM_JSON);
    }

    #[test]
    fn api_response_renders_success_as_json() {
        let resp = into_api_response(Ok(Outcome::success(5)));
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = into_api_response::<u8>(Err(PipelineFault::Cancelled { request: "X" }));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
