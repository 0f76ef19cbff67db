//! Report discovery beneath a project directory.

pub mod discovery;

pub use discovery::{find_matching, locate_reports, DiscoveredReports};
