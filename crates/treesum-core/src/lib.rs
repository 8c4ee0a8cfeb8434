//! Treesum Core Library
//!
//! Hierarchical summarization of a repository tree: ignore-rule pruning,
//! binary classification, a resumable path-keyed summary store, and the
//! bottom-up directory rollup that ends in one repository summary.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod ignore;
pub mod logging;
pub mod oracle;
pub mod scan;
pub mod store;
pub mod summarize;
pub mod walk;
