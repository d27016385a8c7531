// similarity-checker: composite document similarity.
//
// This is the library root. Each module corresponds to one stage of the
// comparison: configuration and input, the three sub-scores (lexical and
// semantic), the composite formula, and the JSON report.

pub mod config;
pub mod input;
pub mod lexical;
pub mod output;
pub mod scoring;
pub mod semantic;
