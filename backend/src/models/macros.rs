/// Defines a newtype ID wrapper around a document-store object id and generates:
/// - derives (Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)
/// - `Display` as the canonical 24-character hex string
/// - `FromStr` parsing that hex string back, failing with `IdParseError`
/// - `Serialize` as the hex string; `Deserialize` from the hex string or a
///   native BSON object id
/// - `From<ObjectId> for $name` and `From<$name> for ObjectId`
/// - an `EntityId` implementation so the id can key a generic repository
///
/// Usage:
///   define_id_type!(CampaignId, "campaign");
#[macro_export]
macro_rules! define_id_type {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(::bson::oid::ObjectId);

        impl $name {
            /// Wrap an existing object id.
            pub fn new(value: ::bson::oid::ObjectId) -> Self {
                $name(value)
            }

            /// Generate a fresh, unique identifier.
            pub fn generate() -> Self {
                $name(::bson::oid::ObjectId::new())
            }

            pub fn value(&self) -> ::bson::oid::ObjectId {
                self.0
            }

            /// Parse the canonical hex form.
            pub fn parse(value: &str) -> ::std::result::Result<Self, $crate::models::IdParseError> {
                ::bson::oid::ObjectId::parse_str(value)
                    .map($name)
                    .map_err(|_| $crate::models::IdParseError::new($kind, value))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.0.to_hex())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::models::IdParseError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $name::parse(s)
            }
        }

        impl ::std::convert::From<::bson::oid::ObjectId> for $name {
            fn from(v: ::bson::oid::ObjectId) -> Self {
                $name(v)
            }
        }

        impl ::std::convert::From<$name> for ::bson::oid::ObjectId {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str(&self.0.to_hex())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::models::deserialize_object_id(deserializer, $kind).map($name)
            }
        }

        impl $crate::models::EntityId for $name {
            fn generate() -> Self {
                $name::generate()
            }
        }
    };
}
