//! Serde helpers for model fields crossing the storage boundary
//!
//! Two formats must round-trip exactly (they are read back by the web layer
//! and the report generator):
//! - `days_of_week`: array of lowercase weekday name strings
//! - shift times: `HH:MM` strings

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Deserializer, Serializer};

use crate::utils::time::{parse_weekday, weekday_name};

/// `Vec<Weekday>` ⇄ `["monday", "tuesday", ...]`
pub mod weekday_list {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(days.len()))?;
        for day in days {
            seq.serialize_element(weekday_name(*day))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Weekday>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        names
            .iter()
            .map(|name| parse_weekday(name).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// `NaiveTime` ⇄ `"HH:MM"`
pub mod hhmm {
    use super::*;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// Default helper for `#[serde(default = "default_true")]`
pub fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct DaysWrapper {
        #[serde(with = "weekday_list")]
        days: Vec<Weekday>,
    }

    #[test]
    fn test_weekday_list_roundtrip() {
        let wrapper = DaysWrapper {
            days: vec![Weekday::Mon, Weekday::Fri, Weekday::Sun],
        };
        let json = serde_json::to_string(&wrapper).unwrap();
        assert_eq!(json, r#"{"days":["monday","friday","sunday"]}"#);

        let back: DaysWrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.days, wrapper.days);
    }

    #[test]
    fn test_weekday_list_rejects_unknown_name() {
        let result: Result<DaysWrapper, _> = serde_json::from_str(r#"{"days":["funday"]}"#);
        assert!(result.is_err());
    }

    #[derive(Serialize, Deserialize)]
    struct TimeWrapper {
        #[serde(with = "hhmm")]
        at: NaiveTime,
    }

    #[test]
    fn test_hhmm_roundtrip() {
        let wrapper = TimeWrapper {
            at: NaiveTime::from_hms_opt(22, 30, 0).unwrap(),
        };
        let json = serde_json::to_string(&wrapper).unwrap();
        assert_eq!(json, r#"{"at":"22:30"}"#);
        let back: TimeWrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.at, wrapper.at);
    }
}
