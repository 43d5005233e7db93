//! Purpose: Library crate behind `libudbridge` and the `udbridge` CLI.
//! Exports: `api` (stable Rust surface), `abi` (C surface), `core` (implementation).
//! Role: Marshalling boundary between a tokenize/tag/parse model and foreign callers.
//! Invariants: Everything handed to a caller is exclusively caller-owned.
//! Invariants: Concurrent use of one model is only as safe as the model itself.
pub mod abi;
pub mod api;
pub mod core;
