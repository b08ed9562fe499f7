//! Newtype identifiers for all domain entities.
//!
//! Record identifiers are assigned by the store on insert (SQLite rowids)
//! and are unique only within their own collection, so every collection
//! gets its own type: passing a `TopicId` where a `LessonId` is expected
//! does not compile. When the `sqlx` feature is enabled, record ids also
//! implement `sqlx::Type`, `sqlx::Encode`, and `sqlx::Decode` for SQLite.
//!
//! Identifiers that are minted in-process (links, content handles,
//! notifications) wrap a random [`uuid::Uuid`] instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a store-assigned record identifier around `i64`.
macro_rules! define_record_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw row identifier.
            pub fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            /// Return the raw row identifier.
            pub fn into_raw(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        #[cfg(feature = "sqlx")]
        impl sqlx::Type<sqlx::Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <i64 as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $name {
            fn decode(
                value: <sqlx::Sqlite as sqlx::Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <i64 as sqlx::Decode<'r, sqlx::Sqlite>>::decode(value).map(Self)
            }
        }
    };
}

/// Macro to define an in-process identifier around `Uuid`.
macro_rules! define_uuid_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Return a reference to the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_record_id!(
    /// Identifier of a folder record.
    FolderId
);

define_record_id!(
    /// Identifier of a topic record.
    TopicId
);

define_record_id!(
    /// Identifier of a lesson record.
    LessonId
);

define_record_id!(
    /// Identifier of a lesson attachment (file) record.
    FileId
);

define_uuid_id!(
    /// Identifier of a link embedded in a lesson.
    LinkId
);

define_uuid_id!(
    /// Identifier of an ephemeral binary content handle.
    HandleId
);

define_uuid_id!(
    /// Identifier of a transient user notification.
    NotificationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_display() {
        assert_eq!(FolderId::from_raw(42).to_string(), "42");
    }

    #[test]
    fn test_record_id_from_str() {
        let id: LessonId = " 7 ".parse().expect("should parse");
        assert_eq!(id, LessonId(7));
        assert!("seven".parse::<LessonId>().is_err());
    }

    #[test]
    fn test_record_id_serializes_as_number() {
        let json = serde_json::to_string(&TopicId(3)).expect("serialize");
        assert_eq!(json, "3");
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        assert_ne!(LinkId::new(), LinkId::new());
    }

    #[test]
    fn test_uuid_id_from_str() {
        let uuid = Uuid::new_v4();
        let id: HandleId = uuid.to_string().parse().expect("should parse");
        assert_eq!(id.as_uuid(), &uuid);
    }
}
