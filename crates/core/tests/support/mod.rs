//! Shared test helpers for `truesign-core` integration tests.
//!
//! In-memory mocks for every port so the workflow tests can focus on
//! behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod gateway;
pub mod host;
