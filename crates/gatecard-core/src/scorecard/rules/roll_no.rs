//! Roll number recovery from the trailing filename line.
//!
//! Scorecard downloads are named like `GATE2024_Scorecard-cs24s12345678.pdf`.
//! The roll number is the run of characters after the first `-`, upper-cased
//! and cut to ten characters.

/// Character that switches the scanner from seeking to collecting.
pub const DELIMITER: char = '-';

/// Scanning stops once this many characters have been collected.
pub const ACCUMULATOR_LIMIT: usize = 11;

/// Length of a roll number.
pub const ROLL_NO_LENGTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Seeking,
    Collecting,
}

/// Recover the roll number from `line`.
///
/// Only the first `-` acts as a delimiter. Once collecting, every character
/// is kept (later dashes included) and alphabetic ones are upper-cased. An
/// upper-case mapping that expands (`ß` to `SS`) counts each produced
/// character towards the limit. Returns an empty string when the line has no
/// `-`.
pub fn recover_roll_no(line: &str) -> String {
    let mut state = ScanState::Seeking;
    let mut token = String::new();
    let mut collected = 0;

    for c in line.trim().chars() {
        if collected >= ACCUMULATOR_LIMIT {
            break;
        }

        match state {
            ScanState::Seeking => {
                if c == DELIMITER {
                    state = ScanState::Collecting;
                }
            }
            ScanState::Collecting if c.is_alphabetic() => {
                for upper in c.to_uppercase() {
                    token.push(upper);
                    collected += 1;
                }
            }
            ScanState::Collecting => {
                token.push(c);
                collected += 1;
            }
        }
    }

    token.chars().take(ROLL_NO_LENGTH).collect()
}
