//! Integration tests
//!
//! These tests use wiremock to create mock HTTP servers and run whole
//! reports end-to-end.

mod report_tests;
mod support;
