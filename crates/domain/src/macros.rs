//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Several small enums (HTTP methods, failure kinds) have a canonical string
//! form that shows up in logs and error messages. This macro derives both
//! directions from one mapping table.
//!
//! # Example
//!
//! ```rust
//! use riskscreen_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Stage {
//!     Identity,
//!     Access,
//! }
//!
//! impl_wire_name_conversions!(Stage {
//!     Identity => "identity",
//!     Access => "access",
//! });
//!
//! assert_eq!(Stage::Access.to_string(), "access");
//! assert_eq!("IDENTITY".parse::<Stage>().unwrap(), Stage::Identity);
//! ```

/// Implements Display and FromStr traits for wire-name enums
///
/// - Display writes the mapped string verbatim
/// - FromStr matches the mapped string ASCII case-insensitively
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return ::std::result::Result::Ok(Self::$variant);
                    }
                )+
                ::std::result::Result::Err(::std::format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
