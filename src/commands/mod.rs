//! CLI commands for treesum

pub mod check_ignore;
pub mod dispatch;
pub mod helpers;
pub mod scan;
pub mod show;
