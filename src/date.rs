use crate::{
    civil::CivilDate,
    driver::{DriverValue, Scan, ToDriverValue},
    error::DateError,
};
use chrono::{DateTime, Local, NaiveTime, Utc};
use core::{
    fmt::{self, Display},
    ops::Deref,
    str::FromStr,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A date that is always present, for `NOT NULL` columns.
///
/// ```
/// use pqdate::Date;
///
/// let mut date: Date = "2000-01-01".parse().unwrap();
/// date.add_months(14);
/// assert_eq!("2001-03-01", date.to_string());
/// assert_eq!(2001, date.year);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(CivilDate);

impl Date {
    /// Returns a new [Date] representing the current date in UTC at the time of this call.
    pub fn utc_now() -> Self {
        Self(CivilDate::of(&Utc::now()))
    }

    /// Returns a new [Date] representing the current date in the system's local timezone at the
    /// time of this call.
    pub fn local_now() -> Self {
        Self(CivilDate::of(&Local::now()))
    }

    /// Adds a signed number of months. See [CivilDate::add_months].
    pub fn add_months(&mut self, months: i32) {
        self.0.add_months(months);
    }

    /// Returns midnight at the start of this date, in UTC.
    ///
    /// # Errors
    ///
    /// - [DateError::NotACalendarDate] if month arithmetic left a day that does not exist in
    ///   its month.
    pub fn utc(&self) -> Result<DateTime<Utc>, DateError> {
        Ok(self.0.to_naive()?.and_time(NaiveTime::MIN).and_utc())
    }
}

impl From<CivilDate> for Date {
    fn from(date: CivilDate) -> Self {
        Self(date)
    }
}

impl From<Date> for CivilDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl Deref for Date {
    type Target = CivilDate;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Parses a `YYYY-MM-DD` string into a [Date].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CivilDate::parse(s).map(Self)
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Scan for Date {
    /// Reads a `NOT NULL` date column. Anything but a timestamp, `Null` included, is a
    /// [DateError::TypeMismatch] and leaves `self` unchanged.
    fn scan(&mut self, value: &DriverValue) -> Result<(), DateError> {
        match value {
            DriverValue::Timestamp(timestamp) => {
                self.0 = CivilDate::of(timestamp);
                Ok(())
            }
            DriverValue::Null
            | DriverValue::Integer(_)
            | DriverValue::Real(_)
            | DriverValue::Text(_)
            | DriverValue::Blob(_)
            | DriverValue::Boolean(_) => {
                debug!(found = value.type_name(), "date column is not a timestamp");
                Err(DateError::TypeMismatch {
                    expected: "timestamp",
                    found: value.type_name(),
                })
            }
        }
    }
}

impl ToDriverValue for Date {
    fn to_driver_value(&self) -> DriverValue {
        DriverValue::Text(self.to_string())
    }
}
