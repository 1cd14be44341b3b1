//! Unit tests for teardown CLI
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod property_tests;
mod removal_service;
