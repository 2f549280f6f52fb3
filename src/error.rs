/// Errors produced when converting dates to or from their external representations.
#[derive(thiserror::Error, Debug, PartialEq, Clone)]
pub enum DateError {
    /// A driver value of the wrong type was supplied for a date column.
    #[error("Expected a `{expected}` driver value for a date column, found `{found}`")]
    TypeMismatch {
        /// The driver value type(s) that would have been accepted.
        expected: &'static str,
        /// The type of the driver value actually supplied.
        found: &'static str,
    },

    /// Input bytes were not a JSON string (or `null`).
    #[error("Date JSON should be a string or null: {reason}")]
    Malformed {
        /// The JSON decoder's description of the problem.
        reason: String,
    },

    /// Text did not parse as a `YYYY-MM-DD` calendar date.
    #[error("`{input}` is not a date in format `YYYY-MM-DD`: {reason}")]
    InvalidDate {
        /// The rejected text. Bytes that are not UTF-8 are shown as U+FFFD.
        input: String,
        /// Why the text was rejected.
        reason: String,
    },

    /// Year, month and day do not name a real day (e.g. February 31st after adding months).
    #[error("Year ({year}), month ({month}), and day ({day}) cannot be made into a valid date")]
    NotACalendarDate {
        /// Year of the payload.
        year: i32,
        /// Month of the payload.
        month: u32,
        /// Day of the payload.
        day: u32,
    },
}

impl DateError {
    pub(crate) fn invalid_date(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
