//! # pqdate
//!
//! A calendar date (year, month, day; no time of day, no time zone) that can be null, with three
//! independent ways in and out:
//!
//! - **Database columns**: read from and written to a [DriverValue] through the [Scan] and
//!   [ToDriverValue] traits.
//! - **JSON and plain text**: `"YYYY-MM-DD"` or `null` in JSON, `YYYY-MM-DD` or the empty string
//!   in text. Available as explicit methods and through `serde`.
//! - **Month arithmetic**: add or subtract any number of months, carrying into the year.
//!
//! ## Examples
//!
//! ```
//! use pqdate::prelude::*;
//!
//! // a nullable column holding a timestamp
//! let mut due = NullDate::default();
//! due.scan(&"2023-11-30T22:00:00-05:00".parse::<chrono::DateTime<chrono::FixedOffset>>().unwrap().into()).unwrap();
//! assert_eq!("2023-11-30", due.to_string());
//!
//! due.add_months(3);
//! assert_eq!(br#""2024-02-30""#.to_vec(), due.marshal_json());
//!
//! // SQL NULL, JSON null and empty text all agree
//! due.scan(&DriverValue::Null).unwrap();
//! assert_eq!(DriverValue::Null, due.to_driver_value());
//! assert_eq!(b"null".to_vec(), due.marshal_json());
//! assert_eq!("", due.to_string());
//! ```
//!
//! ## Nullness
//!
//! A [NullDate] is null exactly when its `valid` flag is false. The payload of a null date is
//! never read, so two null dates are always equal, whatever their payloads.
//!
//! | Input                              | Result                          |
//! |------------------------------------|---------------------------------|
//! | `DriverValue::Null`                | null                            |
//! | `DriverValue::Timestamp`           | the timestamp's date, present   |
//! | any other `DriverValue`            | [DateError::TypeMismatch], null |
//! | JSON `null`, `""`, or no bytes     | null                            |
//! | JSON that is not a string          | [DateError::Malformed], null    |
//! | a string that is not `YYYY-MM-DD`  | [DateError::InvalidDate], null  |
//!
//! ## Month arithmetic
//!
//! [CivilDate::add_months] keeps the month in `1..=12` and moves the year as needed. The day is
//! never adjusted, so adding a month to January 31st gives February 31st. Conversions that need a
//! real day ([CivilDate::to_naive], [Date::utc]) report [DateError::NotACalendarDate] for such
//! dates.
//!
//! ## Prelude
//!
//! Use it with:
//!
//! ```
//! use pqdate::prelude::*;
//! ```
#![warn(missing_docs)]

mod civil;
mod date;
pub mod driver;
mod error;
mod null_date;

pub use crate::civil::CivilDate;
pub use crate::date::Date;
pub use crate::driver::{DriverValue, Scan, ToDriverValue};
pub use crate::error::DateError;
pub use crate::null_date::NullDate;

/// A convenience module appropriate for glob imports (`use pqdate::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::CivilDate;
    #[doc(no_inline)]
    pub use crate::Date;
    #[doc(no_inline)]
    pub use crate::DateError;
    #[doc(no_inline)]
    pub use crate::DriverValue;
    #[doc(no_inline)]
    pub use crate::NullDate;
    #[doc(no_inline)]
    pub use crate::Scan;
    #[doc(no_inline)]
    pub use crate::ToDriverValue;
}
