use crate::{
    civil::CivilDate,
    driver::{DriverValue, Scan, ToDriverValue},
    error::DateError,
};
use chrono::NaiveDate;
use core::{
    fmt::{self, Display},
    str::{self, FromStr},
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

/// A date that may be absent: SQL `NULL`, JSON `null`, or an empty string.
///
/// Nullness is carried by the `valid` flag alone. When `valid` is false, `date` is ignored by
/// every conversion, by [Display], and by equality, and may hold anything.
///
/// | state   | driver value        | JSON           | text         |
/// |---------|---------------------|----------------|--------------|
/// | null    | `Null`              | `null`         | (empty)      |
/// | present | `Text("YYYY-MM-DD")`| `"YYYY-MM-DD"` | `YYYY-MM-DD` |
///
/// When decoding, `null`, `""` and empty input all mean null. As a serde field, a missing key
/// also decodes as null.
///
/// ```
/// use pqdate::NullDate;
///
/// let mut date = NullDate::default();
/// date.unmarshal_json(br#""2023-12-25""#).unwrap();
/// date.add_months(2);
/// assert_eq!("2024-02-25", date.to_string());
///
/// date.unmarshal_json(b"null").unwrap();
/// assert!(!date.valid);
/// assert_eq!(b"null".to_vec(), date.marshal_json());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDate {
    /// The date, meaningful only when `valid` is true.
    pub date: CivilDate,
    /// Whether a date is present.
    pub valid: bool,
}

impl NullDate {
    /// Returns a null [NullDate].
    pub const fn null() -> Self {
        Self {
            date: CivilDate::new(0, 0, 0),
            valid: false,
        }
    }

    /// Returns a present [NullDate] holding `date`.
    pub const fn new(date: CivilDate) -> Self {
        Self { date, valid: true }
    }

    /// Whether a date is present.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the date if present.
    pub fn get(&self) -> Option<CivilDate> {
        self.valid.then_some(self.date)
    }

    /// Adds a signed number of months to the date. See [CivilDate::add_months].
    ///
    /// The flag is left alone, so this has no visible effect on a null date.
    pub fn add_months(&mut self, months: i32) {
        self.date.add_months(months);
    }

    fn set(&mut self, date: Option<CivilDate>) {
        match date {
            Some(date) => *self = Self::new(date),
            None => *self = Self::null(),
        }
    }

    /// Returns the JSON encoding: a `"YYYY-MM-DD"` string, or `null`.
    pub fn marshal_json(&self) -> Vec<u8> {
        serde_json::Value::from(self.get().map(|date| date.to_string()))
            .to_string()
            .into_bytes()
    }

    /// Decodes a JSON string or `null` into `self`, replacing what it held.
    ///
    /// Empty input, `""` and `null` leave `self` null.
    ///
    /// # Errors
    ///
    /// - [DateError::Malformed] if `data` is not a JSON string.
    /// - [DateError::InvalidDate] if the string is not a `YYYY-MM-DD` date.
    ///
    /// Either way, `self` is left null.
    pub fn unmarshal_json(&mut self, data: &[u8]) -> Result<(), DateError> {
        let decoded = Self::decode_json(data);
        if let Err(e) = &decoded {
            trace!(error = %e, "rejected date JSON");
        }
        self.set(decoded.as_ref().ok().copied().flatten());
        decoded.map(|_| ())
    }

    fn decode_json(data: &[u8]) -> Result<Option<CivilDate>, DateError> {
        if data.is_empty() {
            return Ok(None);
        }

        let text = serde_json::from_slice::<Option<String>>(data).map_err(|e| {
            DateError::Malformed {
                reason: e.to_string(),
            }
        })?;

        match text.as_deref() {
            None | Some("") => Ok(None),
            Some(text) => CivilDate::parse(text).map(Some),
        }
    }

    /// Decodes a bare `YYYY-MM-DD` string into `self`, replacing what it held.
    ///
    /// Empty input and the two bytes `""` leave `self` null.
    ///
    /// # Errors
    ///
    /// - [DateError::InvalidDate] if `data` is not a date. `self` is left null.
    pub fn unmarshal_text(&mut self, data: &[u8]) -> Result<(), DateError> {
        let decoded = Self::decode_text(data);
        if let Err(e) = &decoded {
            trace!(error = %e, "rejected date text");
        }
        self.set(decoded.as_ref().ok().copied().flatten());
        decoded.map(|_| ())
    }

    fn decode_text(data: &[u8]) -> Result<Option<CivilDate>, DateError> {
        if data.is_empty() || data == b"\"\"" {
            return Ok(None);
        }

        let text = str::from_utf8(data).map_err(|e| {
            DateError::invalid_date(String::from_utf8_lossy(data), format!("not UTF-8 ({e})"))
        })?;
        CivilDate::parse(text).map(Some)
    }
}

impl PartialEq for NullDate {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for NullDate {}

impl From<CivilDate> for NullDate {
    fn from(date: CivilDate) -> Self {
        Self::new(date)
    }
}

impl From<NaiveDate> for NullDate {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.into())
    }
}

impl From<Option<CivilDate>> for NullDate {
    fn from(date: Option<CivilDate>) -> Self {
        let mut null_date = Self::null();
        null_date.set(date);
        null_date
    }
}

impl From<NullDate> for Option<CivilDate> {
    fn from(date: NullDate) -> Self {
        date.get()
    }
}

impl Scan for NullDate {
    /// Reads a nullable date column. `Null` makes `self` null and a timestamp makes it present.
    /// Anything else is a [DateError::TypeMismatch] and leaves `self` null.
    fn scan(&mut self, value: &DriverValue) -> Result<(), DateError> {
        match value {
            DriverValue::Null => {
                self.set(None);
                Ok(())
            }
            DriverValue::Timestamp(timestamp) => {
                self.set(Some(CivilDate::of(timestamp)));
                Ok(())
            }
            DriverValue::Integer(_)
            | DriverValue::Real(_)
            | DriverValue::Text(_)
            | DriverValue::Blob(_)
            | DriverValue::Boolean(_) => {
                self.set(None);
                debug!(found = value.type_name(), "nullable date column is not a timestamp");
                Err(DateError::TypeMismatch {
                    expected: "null or timestamp",
                    found: value.type_name(),
                })
            }
        }
    }
}

impl ToDriverValue for NullDate {
    fn to_driver_value(&self) -> DriverValue {
        self.get()
            .map(|date| date.to_string())
            .map_or(DriverValue::Null, DriverValue::Text)
    }
}

impl FromStr for NullDate {
    type Err = DateError;

    /// Parses a bare `YYYY-MM-DD` string. The empty string is null.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut date = Self::null();
        date.unmarshal_text(s.as_bytes())?;
        Ok(date)
    }
}

impl Display for NullDate {
    /// Writes `YYYY-MM-DD`, or nothing when null.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(date) => Display::fmt(&date, f),
            None => Ok(()),
        }
    }
}

impl Serialize for NullDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.get() {
            Some(date) => serializer.collect_str(&date),
            None => serializer.serialize_none(),
        }
    }
}

struct NullDateVisitor;

impl<'de> de::Visitor<'de> for NullDateVisitor {
    type Value = NullDate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a date string in format `YYYY-MM-DD`, an empty string, or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(NullDate::null())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(NullDate::null())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.is_empty() {
            return Ok(NullDate::null());
        }
        CivilDate::parse(v).map(NullDate::new).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for NullDate {
    /// Option-shaped, so that a missing struct field decodes as null rather than an error.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(NullDateVisitor)
    }
}
