//! Test utilities shared by the use case tests.
//!
//! This module provides:
//! - Fixture factories for profiles and trial records
//! - An in-memory backend standing in for the session and entitlement endpoints

mod backend_mocks;
mod factories;

pub use backend_mocks::*;
pub use factories::*;
