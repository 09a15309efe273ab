// Library target exists for criterion benchmarks and integration tests.
// The binary entry point is main.rs; this file re-declares the module tree so
// harnesses can import types via `typedrill::engine::*` / `typedrill::generator::*`.
// Some code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: used directly by benchmarks and integration tests
pub mod engine;
pub mod generator;
pub mod history;
pub mod session;
pub mod store;

// Private: only the binary needs it
mod config;
