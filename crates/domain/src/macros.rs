//! Macro for mapping enums onto their wire names
//!
//! Event names, data types and HTTP methods all travel as fixed strings.
//! This macro generates `as_str`, `Display` and case-insensitive `FromStr`
//! from a single variant table.
//!
//! # Example
//!
//! ```rust
//! use corbel_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Mail,
//!     Push,
//! }
//!
//! impl_wire_name_conversions!(Channel {
//!     Mail => "mail",
//!     Push => "push",
//! });
//!
//! assert_eq!(Channel::Push.as_str(), "push");
//! assert_eq!("MAIL".parse::<Channel>(), Ok(Channel::Mail));
//! ```

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum.
///
/// Parsing lower-cases the input before matching, so table entries must be
/// written in lower case.
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire name of this variant.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestEvent {
        Before,
        After,
    }

    impl_wire_name_conversions!(TestEvent {
        Before => "service:request:before",
        After => "service:request:after",
    });

    #[test]
    fn test_as_str_and_display() {
        assert_eq!(TestEvent::Before.as_str(), "service:request:before");
        assert_eq!(TestEvent::After.to_string(), "service:request:after");
    }

    #[test]
    fn test_fromstr_ignores_case() {
        assert_eq!(TestEvent::from_str("SERVICE:REQUEST:AFTER").unwrap(), TestEvent::After);
        assert_eq!(TestEvent::from_str("service:request:before").unwrap(), TestEvent::Before);
    }

    #[test]
    fn test_fromstr_invalid() {
        let result = TestEvent::from_str("token:refresh");
        assert!(result.unwrap_err().contains("Invalid TestEvent: token:refresh"));
    }
}
