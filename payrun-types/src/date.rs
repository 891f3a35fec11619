use std::{fmt::Display, ops::Deref};

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A calendar date, written as `YYYY-MM-DD` in elements like `ReqdExctnDt`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct Date {
    date: NaiveDate,
}

impl Default for Date {
    fn default() -> Self {
        Self::today()
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format!(
            "{:04}-{:02}-{:02}",
            self.date.year_ce().1,
            self.date.month(),
            self.date.day()
        ))
    }
}

impl Date {
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        Some(Self {
            date: NaiveDate::from_ymd_opt(year, month, day)?,
        })
    }

    pub fn today() -> Self {
        Self {
            date: chrono::Local::now().date_naive(),
        }
    }

    pub fn in_some_days(days: u64) -> Self {
        let now = chrono::Local::now();
        let res = now.checked_add_days(Days::new(days)).unwrap();
        Self {
            date: res.date_naive(),
        }
    }
}

impl Deref for Date {
    type Target = NaiveDate;

    fn deref(&self) -> &Self::Target {
        &self.date
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let date = NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map_err(|_| serde::de::Error::custom(format!("{} is not a valid date", s)))?;
        Ok(Self { date })
    }
}

/// The moment a message was created, second precision, offset included.
///
/// `CreDtTm` wants `YYYY-MM-DDThh:mm:ss` plus the local UTC offset, which is
/// what [`Display`] produces.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct Timestamp {
    instant: DateTime<FixedOffset>,
}

impl Timestamp {
    pub fn now() -> Self {
        Self {
            instant: chrono::Local::now().fixed_offset(),
        }
    }

    /// A timestamp at UTC, mostly useful to keep tests reproducible.
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;
        Some(Self {
            instant: date.and_time(time).and_utc().fixed_offset(),
        })
    }

    pub fn date(&self) -> Date {
        Date::from(self.instant.date_naive())
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.instant.format("%Y-%m-%dT%H:%M:%S%:z"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let instant = DateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%:z")
            .map_err(|_| serde::de::Error::custom(format!("{} is not a valid timestamp", s)))?;
        Ok(Self { instant })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Date, Timestamp};

    #[test]
    fn date_display_test() {
        let date = Date::new(2024, 3, 7).unwrap();
        assert_eq!(date.to_string(), "2024-03-07");
    }

    #[test]
    fn date_ordering_test() {
        let earlier = Date::new(2024, 2, 28).unwrap();
        let later = Date::new(2024, 2, 29).unwrap();
        assert!(earlier < later);
        assert!(Date::new(2024, 2, 30).is_none());
    }

    #[test]
    fn timestamp_display_test() {
        let when = Timestamp::new(2023, 4, 20, 23, 24, 31).unwrap();
        assert_eq!(when.to_string(), "2023-04-20T23:24:31+00:00");
    }

    #[test]
    fn timestamp_date_test() {
        let when = Timestamp::new(2023, 4, 20, 23, 24, 31).unwrap();
        assert_eq!(when.date(), Date::new(2023, 4, 20).unwrap());
    }
}
