//! Logs failed responses
//!
//! Reads the [`ErrorReport`] that `IntoResponse for Error` attaches. Outside
//! production the internal detail is logged, at error level for 5xx and
//! debug level for 4xx. In production only the status and code of 5xx
//! responses are logged.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::config::Environment;
use crate::error::ErrorReport;

/// How much of a failure gets logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReportPolicy {
    /// 5xx with internal detail, error level
    FailureWithDetail,
    /// 4xx with internal detail, debug level
    RejectionWithDetail,
    /// 5xx status and code only, error level
    FailureStatusOnly,
}

/// Logging policy for a response status, `None` to stay silent
pub(crate) fn report_policy(environment: Environment, status: StatusCode) -> Option<ReportPolicy> {
    match (environment.is_production(), status) {
        (false, s) if s.is_server_error() => Some(ReportPolicy::FailureWithDetail),
        (false, s) if s.is_client_error() => Some(ReportPolicy::RejectionWithDetail),
        (true, s) if s.is_server_error() => Some(ReportPolicy::FailureStatusOnly),
        _ => None,
    }
}

/// Middleware function; install with `from_fn_with_state(environment, report_errors)`
pub async fn report_errors(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;
    let status = response.status();

    let Some(policy) = report_policy(environment, status) else {
        return response;
    };

    let report = response.extensions().get::<ErrorReport>();
    let code = report.map_or("UNKNOWN", |r| r.code);
    let detail = report.map_or("", |r| r.detail.as_str());

    match policy {
        ReportPolicy::FailureWithDetail => tracing::error!(
            status = status.as_u16(),
            code,
            %method,
            path,
            detail,
            "request failed"
        ),
        ReportPolicy::FailureStatusOnly => {
            tracing::error!(status = status.as_u16(), code, "request failed")
        }
        ReportPolicy::RejectionWithDetail => tracing::debug!(
            status = status.as_u16(),
            code,
            %method,
            path,
            detail,
            "request rejected"
        ),
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use axum::{body::Body, middleware, response::IntoResponse, routing::get, Router};
    use rstest::rstest;
    use tower::ServiceExt;

    #[rstest]
    #[case(Environment::Development, StatusCode::INTERNAL_SERVER_ERROR, Some(ReportPolicy::FailureWithDetail))]
    #[case(Environment::Staging, StatusCode::NOT_FOUND, Some(ReportPolicy::RejectionWithDetail))]
    #[case(Environment::Development, StatusCode::OK, None)]
    #[case(Environment::Production, StatusCode::INTERNAL_SERVER_ERROR, Some(ReportPolicy::FailureStatusOnly))]
    #[case(Environment::Production, StatusCode::BAD_REQUEST, None)]
    fn test_report_policy(
        #[case] environment: Environment,
        #[case] status: StatusCode,
        #[case] expected: Option<ReportPolicy>,
    ) {
        assert_eq!(report_policy(environment, status), expected);
    }

    #[tokio::test]
    async fn test_passes_response_through() {
        let app = Router::new()
            .route(
                "/boom",
                get(|| async { Error::Internal("disk on fire".to_string()).into_response() }),
            )
            .layer(middleware::from_fn_with_state(
                Environment::Production,
                report_errors,
            ));

        let response = app
            .oneshot(axum::http::Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<ErrorReport>().is_some());
    }
}
