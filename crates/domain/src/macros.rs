//! Macro for implementing Display and FromStr for wire status enums
//!
//! The device reports states as lowercase strings. This macro maps them onto
//! a Rust enum in both directions.
//!
//! # Example
//!
//! ```rust
//! use routerlink_domain::impl_wire_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum LinkState {
//!     Up,
//!     Down,
//! }
//!
//! impl_wire_status_conversions!(LinkState {
//!     Up => "up",
//!     Down => "down",
//! });
//!
//! assert_eq!("UP".parse::<LinkState>(), Ok(LinkState::Up));
//! assert_eq!(LinkState::Down.to_string(), "down");
//! ```

/// Implements Display and FromStr for a wire status enum
///
/// Parsing is case-insensitive; unknown strings are rejected with a message
/// naming the enum.
#[macro_export]
macro_rules! impl_wire_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
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
    enum WifiState {
        Enabled,
        Disabled,
    }

    impl_wire_status_conversions!(WifiState {
        Enabled => "enabled",
        Disabled => "disabled",
    });

    #[test]
    fn displays_wire_string() {
        assert_eq!(WifiState::Enabled.to_string(), "enabled");
        assert_eq!(WifiState::Disabled.to_string(), "disabled");
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(WifiState::from_str("enabled").unwrap(), WifiState::Enabled);
        assert_eq!(WifiState::from_str("DISABLED").unwrap(), WifiState::Disabled);
        assert_eq!(WifiState::from_str("Enabled").unwrap(), WifiState::Enabled);
    }

    #[test]
    fn rejects_unknown_strings() {
        let result = WifiState::from_str("half-open");
        assert_eq!(result.unwrap_err(), "Invalid WifiState: half-open");
        assert!(WifiState::from_str("").is_err());
    }
}
