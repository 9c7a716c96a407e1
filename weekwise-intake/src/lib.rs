//! weekwise-intake: deterministic natural-language task intake.
//!
//! Regex extraction covers the common cases (clock times, weekday names)
//! without any model call; analyzer replies are parsed tolerantly on top.

pub mod extract;
pub mod hints;

pub use extract::{extract_days, extract_time};
pub use hints::{hints_from_description, merge_hints, parse_hint_block};
