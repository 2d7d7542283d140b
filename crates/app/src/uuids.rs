//! Typed record identifiers.

/// Declare a uuid newtype for one record family.
///
/// Identifiers serialize transparently as canonical uuid strings, which is
/// also the form the structured store keys and indexes them by.
macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Generate a new time-ordered identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::now_v7())
            }

            /// Wrap an existing uuid.
            #[must_use]
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying uuid.
            #[must_use]
            pub const fn into_uuid(self) -> ::uuid::Uuid {
                self.0
            }

            /// Whether this is the nil identifier.
            #[must_use]
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            /// The primary key this identifier stores under.
            #[must_use]
            pub fn key(&self) -> ::satchel::Key {
                ::satchel::Key::Text(self.0.to_string())
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::convert::From<::uuid::Uuid> for $name {
            fn from(value: ::uuid::Uuid) -> Self {
                Self::from_uuid(value)
            }
        }

        impl ::std::convert::From<$name> for ::uuid::Uuid {
            fn from(value: $name) -> Self {
                value.into_uuid()
            }
        }

        impl ::std::convert::From<$name> for ::satchel::IndexValue {
            fn from(value: $name) -> Self {
                Self::Text(value.0.to_string())
            }
        }
    };
}

uuid_newtype!(
    /// Identifies a user.
    UserUuid
);

uuid_newtype!(
    /// Identifies a product.
    ProductUuid
);

uuid_newtype!(
    /// Identifies an order.
    OrderUuid
);
