//! tavily-tools library
//!
//! Normalization, quality analysis and console/JSON/HTML formatting of Tavily
//! search responses, plus the search client and history used by the binary.

pub mod cli;
pub mod config;
pub mod format;
pub mod history;
pub mod logging;
pub mod model;
pub mod quality;
pub mod search;
pub mod util;
