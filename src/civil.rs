use crate::error::DateError;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use core::{
    fmt::{self, Display},
    str::FromStr,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A calendar date with no time of day and no time zone: just a year, a month and a day.
///
/// The fields are plain integers and are not validated on construction. Month arithmetic
/// ([CivilDate::add_months]) keeps the month in `1..=12`, but leaves the day alone, so it can
/// produce payloads like `2000-02-31`. Use [CivilDate::to_naive] when a real day is needed.
///
/// ```
/// use pqdate::CivilDate;
///
/// let mut date: CivilDate = "2000-01-31".parse().unwrap();
/// date.add_months(-14);
/// assert_eq!("1998-11-31", date.to_string());
/// assert!(!date.is_calendar_date());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDate {
    /// Year, proleptic Gregorian.
    pub year: i32,
    /// Month of the year, `1`-`12` once normalized.
    pub month: u32,
    /// Day of the month.
    pub day: u32,
}

impl CivilDate {
    /// Returns a [CivilDate] with the given fields, as-is.
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Parses a `YYYY-MM-DD` string, or returns [DateError::InvalidDate].
    ///
    /// Only the exact form written by [Display] is accepted: a four-digit year, then a two-digit
    /// month and day, with no surrounding whitespace. Years outside `0..=9999` carry a sign and
    /// may be longer, e.g. `+10000-01-01` or `-0001-12-31`. The fields must name a real day.
    pub fn parse(s: &str) -> Result<Self, DateError> {
        let date = Self::parse_fields(s)
            .filter(|date| date.to_string() == s)
            .ok_or_else(|| DateError::invalid_date(s, "expected `YYYY-MM-DD`"))?;
        date.to_naive()
            .map_err(|_| DateError::invalid_date(s, "no such day in the calendar"))?;
        Ok(date)
    }

    /// Splits `[+-]YYYY-MM-DD` into fields, checking only that each part is made of digits.
    fn parse_fields(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        let (sign, rest) = match bytes.first()? {
            b'+' => (1, &bytes[1..]),
            b'-' => (-1, &bytes[1..]),
            _ => (1, bytes),
        };

        let (year, month_day) = rest.split_at(rest.len().checked_sub(6)?);
        if year.len() < 4 || !year.iter().all(u8::is_ascii_digit) {
            return None;
        }
        let &[b'-', m1, m2, b'-', d1, d2] = month_day else {
            return None;
        };
        if ![m1, m2, d1, d2].iter().all(u8::is_ascii_digit) {
            return None;
        }

        let two_digits = |hi: u8, lo: u8| u32::from(hi - b'0') * 10 + u32::from(lo - b'0');
        let year = core::str::from_utf8(year).ok()?.parse::<i64>().ok()?;
        Some(Self {
            year: i32::try_from(sign * year).ok()?,
            month: two_digits(m1, m2),
            day: two_digits(d1, d2),
        })
    }

    /// Returns the date of a timestamp, read in the timestamp's own offset. No time zone
    /// conversion is performed.
    pub fn of<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> Self {
        timestamp.date_naive().into()
    }

    /// Adds a signed number of months, carrying into or borrowing from the year so the month
    /// stays in `1..=12`. The day is left untouched.
    ///
    /// Years outside of the `i32` range saturate.
    pub fn add_months(&mut self, months: i32) {
        // month 0 of the zero date still borrows from the year, like any other underflow
        let total = i64::from(self.month) - 1 + i64::from(months);
        let year = i64::from(self.year) + total.div_euclid(12);

        self.year = i32::try_from(year).unwrap_or(if year < 0 { i32::MIN } else { i32::MAX });
        // rem_euclid is in 0..12
        self.month = total.rem_euclid(12) as u32 + 1;
    }

    /// Returns this date as a [NaiveDate], or [DateError::NotACalendarDate] if the fields do not
    /// name a real day.
    pub fn to_naive(&self) -> Result<NaiveDate, DateError> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or(
            DateError::NotACalendarDate {
                year: self.year,
                month: self.month,
                day: self.day,
            },
        )
    }

    /// Whether the fields name a real day in the proleptic Gregorian calendar.
    pub fn is_calendar_date(&self) -> bool {
        self.to_naive().is_ok()
    }
}

impl From<NaiveDate> for CivilDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl TryFrom<CivilDate> for NaiveDate {
    type Error = DateError;

    fn try_from(date: CivilDate) -> Result<Self, Self::Error> {
        date.to_naive()
    }
}

impl FromStr for CivilDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for CivilDate {
    /// Writes `YYYY-MM-DD`. Years outside `0..=9999` are written with a sign, as [NaiveDate]
    /// does, so that they read back unambiguously.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (0..=9999).contains(&self.year) {
            write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
        } else {
            write!(f, "{:+05}-{:02}-{:02}", self.year, self.month, self.day)
        }
    }
}

impl Serialize for CivilDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CivilDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = <String as Deserialize>::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDateTime, Utc};
    use itertools::iproduct;
    use rstest::*;

    #[fixture]
    fn millennium() -> CivilDate {
        CivilDate::new(2000, 1, 1)
    }

    #[rstest]
    #[case(5, "2000-06-01")]
    #[case(36, "2003-01-01")]
    #[case(14, "2001-03-01")]
    #[case(-1, "1999-12-01")]
    #[case(-12, "1999-01-01")]
    #[case(-14, "1998-11-01")]
    #[case(0, "2000-01-01")]
    #[case(11, "2000-12-01")]
    #[case(12, "2001-01-01")]
    fn test_add_months(mut millennium: CivilDate, #[case] months: i32, #[case] expected: &str) {
        millennium.add_months(months);
        assert_eq!(expected, millennium.to_string());
    }

    /// adding then subtracting the same amount always lands on the starting year and month
    #[test]
    fn test_add_months_inverse() {
        let years = [-400, -1, 0, 1, 1999, 2000, 2024];
        let months = 1..=12;
        let deltas = [-1000, -25, -13, -12, -11, -1, 0, 1, 11, 12, 13, 25, 1000];

        for (year, month, delta) in iproduct!(years, months, deltas) {
            let start = CivilDate::new(year, month, 17);
            let mut date = start;
            date.add_months(delta);
            assert!((1..=12).contains(&date.month), "{start} + {delta} = {date}");
            assert_eq!(17, date.day);
            date.add_months(-delta);
            assert_eq!(start, date, "{start} + {delta} - {delta}");
        }
    }

    #[test]
    fn test_add_months_matches_repeated_single_steps() {
        for delta in -40..=40 {
            let mut jumped = CivilDate::new(2000, 5, 1);
            jumped.add_months(delta);

            let mut stepped = CivilDate::new(2000, 5, 1);
            let step = delta.signum();
            for _ in 0..delta.abs() {
                stepped.add_months(step);
            }

            assert_eq!(stepped, jumped, "delta {delta}");
        }
    }

    #[test]
    fn test_add_months_saturates_year() {
        let mut date = CivilDate::new(i32::MAX, 12, 1);
        date.add_months(1);
        assert_eq!(i32::MAX, date.year);
        assert_eq!(1, date.month);

        let mut date = CivilDate::new(i32::MIN, 1, 1);
        date.add_months(-1);
        assert_eq!(i32::MIN, date.year);
        assert_eq!(12, date.month);
    }

    #[test]
    fn test_add_months_keeps_day() {
        let mut date = CivilDate::new(2000, 1, 31);
        date.add_months(1);
        assert_eq!(CivilDate::new(2000, 2, 31), date);
        assert!(!date.is_calendar_date());
        assert_eq!(
            Err(DateError::NotACalendarDate {
                year: 2000,
                month: 2,
                day: 31
            }),
            date.to_naive()
        );
    }

    #[rstest]
    #[case("2023-12-25", CivilDate::new(2023, 12, 25))]
    #[case("2024-02-29", CivilDate::new(2024, 2, 29))]
    #[case("0001-01-01", CivilDate::new(1, 1, 1))]
    #[case("9999-12-31", CivilDate::new(9999, 12, 31))]
    #[case("+10000-01-01", CivilDate::new(10000, 1, 1))]
    #[case("-0001-12-31", CivilDate::new(-1, 12, 31))]
    fn test_parse_ok(#[case] input: &str, #[case] expected: CivilDate) {
        assert_eq!(Ok(expected), input.parse());
        assert_eq!(input, expected.to_string());
    }

    #[rstest]
    #[case("")]
    #[case("invalid-date")]
    #[case("2023-02-29")]
    #[case("2023-13-01")]
    #[case("2023-12-25T00:00:00")]
    #[case("2023-1-5")]
    #[case("2023-12-5")]
    #[case(" 2023-12-25")]
    #[case("2023-12-25 ")]
    #[case("+2023-12-25")]
    #[case("2023 -12-25")]
    #[case("02023-12-25")]
    #[case("10000-01-01")]
    #[case("-0000-01-01")]
    #[case("0000-00-00")]
    #[case("2023-12-2\u{e9}")]
    #[case("20\u{e9}3-12-25")]
    fn test_parse_err(#[case] input: &str) {
        assert!(matches!(
            CivilDate::parse(input),
            Err(DateError::InvalidDate { input: rejected, .. }) if rejected == input
        ));
    }

    #[rstest]
    #[case(CivilDate::new(10000, 1, 1), "+10000-01-01")]
    #[case(CivilDate::new(-1, 12, 31), "-0001-12-31")]
    #[case(CivilDate::new(-44, 3, 15), "-0044-03-15")]
    #[case(CivilDate::new(0, 1, 1), "0000-01-01")]
    fn test_far_years_read_back(#[case] date: CivilDate, #[case] expected: &str) {
        assert_eq!(expected, date.to_string());
        assert_eq!(Ok(date), expected.parse());
    }

    #[test]
    fn test_add_months_past_year_9999_reads_back() {
        let mut date = CivilDate::new(9999, 12, 1);
        date.add_months(1);
        assert_eq!("+10000-01-01", date.to_string());
        assert_eq!(Ok(date), CivilDate::parse(&date.to_string()));
    }

    #[test]
    fn test_zero_value_display() {
        assert_eq!("0000-00-00", CivilDate::default().to_string());
    }

    #[test]
    fn test_of_uses_own_offset() {
        // 23:30 on the 31st at -05:00 is already the 1st in UTC
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let timestamp = NaiveDateTime::parse_from_str("2023-12-31 23:30:00", "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_local_timezone(offset)
            .unwrap();

        assert_eq!(CivilDate::new(2023, 12, 31), CivilDate::of(&timestamp));
        assert_eq!(
            CivilDate::new(2024, 1, 1),
            CivilDate::of(&timestamp.with_timezone(&Utc))
        );
    }

    #[test]
    fn test_ordering() {
        assert!(CivilDate::new(1999, 12, 31) < CivilDate::new(2000, 1, 1));
        assert!(CivilDate::new(2000, 2, 1) > CivilDate::new(2000, 1, 31));
    }

    #[test]
    fn test_serde_string() {
        let date = CivilDate::new(1990, 5, 15);
        assert_eq!(r#""1990-05-15""#, serde_json::to_string(&date).unwrap());
        assert_eq!(date, serde_json::from_str(r#""1990-05-15""#).unwrap());
        assert!(serde_json::from_str::<CivilDate>(r#""1990-15-05""#).is_err());
    }
}
