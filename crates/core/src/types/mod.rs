//! Core types for the GA4 audit.
//!
//! This module provides the decoded report tables the engine consumes and the
//! result aggregate it produces.

pub mod export;
pub mod id;
pub mod insight;
pub mod money;
pub mod report;
pub mod result;

pub use export::{ExportRow, ExportSection, ExportValue};
pub use id::TransactionId;
pub use insight::{InsightFlag, InsightKind};
pub use money::{Revenue, group_thousands};
pub use report::*;
pub use result::*;
