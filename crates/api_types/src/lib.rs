use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on a title, shared by the client-side validation and the
/// reference server.
pub const TITLE_MAX_LEN: usize = 255;

pub mod timestamp {
    //! Serde helpers for the timestamps exchanged with the todo API.
    //!
    //! The API emits either RFC3339 strings or naive ISO-8601 strings without
    //! an offset (interpreted as UTC). Both are accepted on input; output is
    //! always RFC3339 with a `Z` suffix.

    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Parses an RFC3339, naive `YYYY-MM-DDTHH:MM:SS[.f]` or plain date string.
    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(naive.and_utc());
        }
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")?;
        Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// `Option<DateTime<Utc>>`, `null` and missing both map to `None`.
    pub mod option {
        use super::*;

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(dt) => serializer.serialize_str(&format(dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            raw.map(|raw| parse(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }

    /// `Option<Option<DateTime<Utc>>>` for partial updates: the outer `None`
    /// (field absent) leaves the value untouched, `Some(None)` clears it.
    ///
    /// Must be paired with `#[serde(default, skip_serializing_if = "Option::is_none")]`.
    pub mod patch {
        use super::*;

        pub fn serialize<S>(
            value: &Option<Option<DateTime<Utc>>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(Some(dt)) => serializer.serialize_str(&format(dt)),
                _ => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(
            deserializer: D,
        ) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            super::option::deserialize(deserializer).map(Some)
        }
    }
}

/// Same as [`timestamp::patch`] for plain values: lets a partial update tell
/// "not sent" apart from an explicit `null`.
pub mod nullable {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(Some(inner)) => serializer.serialize_some(inner),
            _ => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

pub mod todo {
    use std::{fmt, str::FromStr};

    use thiserror::Error;

    use super::*;

    /// Server-assigned identifier. Never fabricated on the client.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TodoId(pub i64);

    impl fmt::Display for TodoId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Priority {
        Low,
        #[default]
        Medium,
        High,
    }

    impl Priority {
        pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

        /// Returns the wire string of the priority.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Low => "low",
                Self::Medium => "medium",
                Self::High => "high",
            }
        }
    }

    impl fmt::Display for Priority {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    #[error("unknown priority \"{0}\"")]
    pub struct UnknownPriority(pub String);

    impl FromStr for Priority {
        type Err = UnknownPriority;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "low" => Ok(Self::Low),
                "medium" => Ok(Self::Medium),
                "high" => Ok(Self::High),
                _ => Err(UnknownPriority(s.to_string())),
            }
        }
    }

    /// A todo as returned by the server.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Todo {
        pub id: TodoId,
        pub title: String,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub priority: Priority,
        #[serde(default, with = "crate::timestamp::option")]
        pub due_date: Option<DateTime<Utc>>,
        #[serde(default)]
        pub completed: bool,
        #[serde(
            default,
            with = "crate::timestamp::option",
            skip_serializing_if = "Option::is_none"
        )]
        pub created_at: Option<DateTime<Utc>>,
        #[serde(
            default,
            with = "crate::timestamp::option",
            skip_serializing_if = "Option::is_none"
        )]
        pub updated_at: Option<DateTime<Utc>>,
    }

    /// Request body for `POST /api/todos`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TodoNew {
        pub title: String,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub priority: Priority,
        #[serde(default, with = "crate::timestamp::option")]
        pub due_date: Option<DateTime<Utc>>,
    }

    impl TodoNew {
        pub fn new(title: impl Into<String>) -> Self {
            Self {
                title: title.into(),
                description: None,
                priority: Priority::default(),
                due_date: None,
            }
        }

        pub fn priority(mut self, priority: Priority) -> Self {
            self.priority = priority;
            self
        }

        pub fn description(mut self, description: impl Into<String>) -> Self {
            self.description = Some(description.into());
            self
        }

        pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
            self.due_date = Some(due_date);
            self
        }
    }

    /// Request body for `PUT /api/todos/{id}`.
    ///
    /// Absent fields are left untouched by the server. `description` and
    /// `due_date` use `Some(None)` to clear the stored value.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TodoUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub title: Option<String>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "crate::nullable"
        )]
        pub description: Option<Option<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub completed: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub priority: Option<Priority>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "crate::timestamp::patch"
        )]
        pub due_date: Option<Option<DateTime<Utc>>>,
    }

    impl TodoUpdate {
        pub fn is_empty(&self) -> bool {
            self.title.is_none()
                && self.description.is_none()
                && self.completed.is_none()
                && self.priority.is_none()
                && self.due_date.is_none()
        }
    }

    /// Query string of `GET /api/todos`. The server owns the semantics.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TodoQuery {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub completed: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub priority: Option<Priority>,
    }
}

pub mod health {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
    }

    impl Health {
        pub fn healthy() -> Self {
            Self {
                status: "healthy".to_string(),
            }
        }

        pub fn is_healthy(&self) -> bool {
            self.status == "healthy"
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Banner {
        pub message: String,
    }
}
