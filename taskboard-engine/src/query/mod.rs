//! Query language: parsing, matching and filtered board views
//!
//! ```text
//! "cliente" tag:compliance p:high due:week est:<60
//! ```
//!
//! Operators are `tag:`, `p:`/`priority:`, `due:` (`overdue`, `week`, `any`)
//! and `est:` with an optional comparison. Everything else is free text,
//! matched word by word, accent and case insensitive.

mod eval;
mod normalize;
mod parse;

pub use eval::{build_filtered_view, matches, QueryEnv};
pub use normalize::normalize;
pub use parse::{parse_query, DueFilter, EstOp, EstimationFilter, SearchQuery};
