//! Common test utilities for tbdeploy scenario and CLI tests.
//!
//! This module provides:
//! - `ProgramEnv`: a throwaway program tree (options, content, program spec)
//! - Fixtures: deployment descriptions and the fixed build clock
//! - Tree helpers for comparing staged output

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
