//! Integration tests for the Tether interpreter.
//!
//! These exercise the full pipeline: free-form text through classification
//! to entity creation against the in-memory store.

#[path = "integration/test_executor.rs"]
mod test_executor;

#[path = "integration/test_fallback.rs"]
mod test_fallback;

#[path = "integration/test_parser.rs"]
mod test_parser;
