// Student, company and placement records over HTTP, plus the admin endpoints.
// Payloads are validated in `requests` before anything reaches the store.

pub mod admin;
pub mod handlers;
pub mod requests;
