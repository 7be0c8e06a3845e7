// Candidate–employer matching: per-company compatibility scores and the
// top-5 recommendation list for one student.

pub mod engine;
pub mod handlers;
