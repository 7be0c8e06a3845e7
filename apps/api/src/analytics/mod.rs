// Aggregation Engine and its HTTP surface.
// Every endpoint reads a fresh store snapshot; nothing is cached between calls.

pub mod aggregation;
pub mod handlers;
