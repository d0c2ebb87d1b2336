//! Integration test suite for NeuroTask.
//!
//! These tests exercise the client against a real HTTP server and drive the
//! TEA loop end to end. They verify that the API client, the update function
//! and the command runtime work together correctly.
//!
//! # Test Categories
//!
//! - `api_client`: request shapes and error mapping against a mock server
//! - `task_flow`: key presses through `update` and `execute_command` to the
//!   service and back
//!
//! # CI Compatibility
//!
//! The service is either a local `wiremock` server or an in-memory fake, so
//! no external network access is needed.

mod fixtures;

mod api_client;
