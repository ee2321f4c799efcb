// Intake API: POST /submit-application.
// Multipart decoding lives in handlers, persistence ordering in service.

pub mod handlers;
pub mod naming;
pub mod service;
