//! HTTP middleware: request tracking and error reporting

pub mod error_reporting;
pub mod request_tracking;

pub use error_reporting::report_errors;
pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, request_span, sensitive_headers_layer,
    REQUEST_ID_HEADER, SENSITIVE_HEADERS,
};
