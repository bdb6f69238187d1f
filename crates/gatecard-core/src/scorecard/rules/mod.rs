//! Rule-based field extractors for GATE scorecards.

pub mod filename;
pub mod lines;
pub mod numeric;
pub mod positions;
pub mod roll_no;

pub use filename::sanitize_filename;
pub use lines::split_lines;
pub use numeric::{is_digits, parse_decimal, parse_integer};
pub use positions::{LineField, MIN_POSITIONAL_LINES};
pub use roll_no::recover_roll_no;

