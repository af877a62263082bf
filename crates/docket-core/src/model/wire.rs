//! Serde helpers for the persisted record shapes.
//!
//! Optional values are written as the empty string rather than `null` so
//! every record keeps the same set of keys on disk:
//!
//! ```text
//! "adjournmentDate": ""            unset
//! "adjournmentDate": "2025-09-10"  set
//! ```

/// `YYYY-MM-DD`, the only date format accepted on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `Option<NaiveDate>` stored as `""` or `YYYY-MM-DD`. `null` and a missing
/// key also read as `None`.
pub mod optional_date {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.collect_str(&date.format(DATE_FORMAT)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map(Some)
                .map_err(|err| D::Error::custom(format!("invalid date '{text}': {err}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Dated {
        #[serde(default, with = "super::optional_date")]
        when: Option<NaiveDate>,
    }

    #[test]
    fn unset_date_is_written_as_empty_string() {
        let json = serde_json::to_string(&Dated { when: None }).expect("serialize");
        assert_eq!(json, r#"{"when":""}"#);
    }

    #[test]
    fn empty_null_and_missing_all_read_as_none() {
        for raw in [r#"{"when":""}"#, r#"{"when":null}"#, "{}"] {
            let dated: Dated = serde_json::from_str(raw).expect("deserialize");
            assert_eq!(dated.when, None, "input {raw}");
        }
    }

    #[test]
    fn set_date_keeps_iso_format() {
        let when = NaiveDate::from_ymd_opt(2025, 9, 10);
        let json = serde_json::to_string(&Dated { when }).expect("serialize");
        assert_eq!(json, r#"{"when":"2025-09-10"}"#);
        let back: Dated = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.when, when);
    }

    #[test]
    fn garbage_date_is_rejected() {
        assert!(serde_json::from_str::<Dated>(r#"{"when":"next tuesday"}"#).is_err());
    }
}
