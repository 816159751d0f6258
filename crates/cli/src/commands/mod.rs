//! Command implementations.

pub mod queries;
pub mod run;
