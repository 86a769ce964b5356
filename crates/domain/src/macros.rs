//! Macro for vendor enumerations
//!
//! The TrueSign API transmits enumerations as their integer ordinal. Older
//! payloads (and hand-written fixtures) sometimes carry the variant name
//! instead, so decoding accepts either form while encoding always emits the
//! ordinal.
//!
//! # Example
//!
//! ```rust
//! use truesign_domain::impl_wire_enum;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Colour {
//!     Red,
//!     Green,
//! }
//!
//! impl_wire_enum!(Colour {
//!     Red => 0,
//!     Green => 1,
//! });
//!
//! assert_eq!(serde_json::to_string(&Colour::Green).unwrap(), "1");
//! assert_eq!(serde_json::from_str::<Colour>("\"red\"").unwrap(), Colour::Red);
//! ```

/// Implements ordinal conversions, Display, FromStr and serde for an enum
///
/// This macro generates:
/// - `code()` / `from_code()`: wire ordinal conversions
/// - Display: the variant name
/// - FromStr: case-insensitive variant name parsing
/// - Serialize: the ordinal as an unsigned integer
/// - Deserialize: either the ordinal or the variant name
#[macro_export]
macro_rules! impl_wire_enum {
    ($enum_name:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Integer ordinal used on the wire
            pub const fn code(self) -> u8 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Look up a variant by its wire ordinal
            pub fn from_code(code: u64) -> ::core::option::Option<Self> {
                match code {
                    $($code => ::core::option::Option::Some(Self::$variant),)+
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::core::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str(::core::stringify!($variant)),)+
                }
            }
        }

        impl ::core::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case(::core::stringify!($variant)) {
                        return ::core::result::Result::Ok(Self::$variant);
                    }
                )+
                ::core::result::Result::Err(::std::format!(
                    "Invalid {}: {}",
                    ::core::stringify!($enum_name),
                    s
                ))
            }
        }

        impl ::serde::Serialize for $enum_name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_u8(self.code())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                struct WireVisitor;

                impl<'de> ::serde::de::Visitor<'de> for WireVisitor {
                    type Value = $enum_name;

                    fn expecting(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                        ::core::write!(
                            f,
                            "{} as an ordinal or variant name",
                            ::core::stringify!($enum_name)
                        )
                    }

                    fn visit_u64<E>(self, value: u64) -> ::core::result::Result<Self::Value, E>
                    where
                        E: ::serde::de::Error,
                    {
                        $enum_name::from_code(value).ok_or_else(|| {
                            E::invalid_value(::serde::de::Unexpected::Unsigned(value), &self)
                        })
                    }

                    fn visit_i64<E>(self, value: i64) -> ::core::result::Result<Self::Value, E>
                    where
                        E: ::serde::de::Error,
                    {
                        u64::try_from(value).ok().and_then($enum_name::from_code).ok_or_else(|| {
                            E::invalid_value(::serde::de::Unexpected::Signed(value), &self)
                        })
                    }

                    fn visit_str<E>(self, value: &str) -> ::core::result::Result<Self::Value, E>
                    where
                        E: ::serde::de::Error,
                    {
                        value
                            .parse::<$enum_name>()
                            .map_err(|_| {
                                E::unknown_variant(value, &[$(::core::stringify!($variant)),+])
                            })
                    }
                }

                deserializer.deserialize_any(WireVisitor)
            }
        }
    };
}
