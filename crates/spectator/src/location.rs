// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Output location parsing and resolution.
//!
//! The output location decides which transport the metrics writer uses.
//! Accepted values:
//!
//! - `""`                       - Empty string defaults to `udp`.
//! - `none`                     - No-op writer, disables metrics collection.
//! - `memory`                   - Keep metrics in memory. Useful for testing.
//! - `stderr` / `stdout`        - Write metrics to a standard stream.
//! - `udp`                      - Default spectatord UDP port. This is the default.
//! - `unix`                     - Default spectatord Unix Domain Socket.
//! - `file:///path/to/file`     - Write metrics to a file.
//! - `udp://host:port`          - Write metrics to a UDP socket.
//! - `unix:///path/to/socket`   - Write metrics to a Unix Domain Socket.
//!
//! `SPECTATOR_OUTPUT_LOCATION` overrides whatever the caller asked for, which
//! is mostly useful for integration testing.

use std::fmt;
use std::str::FromStr;

use serde::{ser, Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::env::EnvSnapshot;
use crate::error::{ConfigError, LocationOrigin};

/// Environment variable that replaces the requested output location.
pub const OUTPUT_LOCATION_ENV_VAR: &str = "SPECTATOR_OUTPUT_LOCATION";

/// Location used when neither the caller nor the environment picks one.
pub const DEFAULT_LOCATION: &str = "udp";

/// Address spectatord listens on for the bare `udp` location.
pub const DEFAULT_UDP_ADDRESS: &str = "127.0.0.1:1234";

/// Socket spectatord listens on for the bare `unix` location.
pub const DEFAULT_UNIX_SOCKET_PATH: &str = "/run/spectatord/spectatord.sock";

const FILE_SCHEME: &str = "file://";
const UDP_SCHEME: &str = "udp://";
const UNIX_SCHEME: &str = "unix://";
const CUSTOM: &str = "custom";

/// A validated output location.
///
/// `Display` yields the exact string the location was parsed from. Serde
/// uses the same string form. `Custom` refuses to serialize because it can
/// not be parsed back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum OutputLocation {
    None,
    Memory,
    Stderr,
    Stdout,
    #[default]
    Udp,
    Unix,
    /// `file://<path>`
    File(String),
    /// `udp://<host:port>`
    UdpAddress(String),
    /// `unix://<path>`
    UnixSocket(String),
    /// Set by [`with_writer`](crate::option::with_writer); never parsed.
    Custom,
}

impl OutputLocation {
    /// UDP address the writer should send to, if this is a UDP location.
    pub fn udp_address(&self) -> Option<&str> {
        match self {
            Self::Udp => Some(DEFAULT_UDP_ADDRESS),
            Self::UdpAddress(addr) => Some(addr),
            _ => None,
        }
    }

    /// Socket path the writer should send to, if this is a Unix location.
    pub fn unix_socket_path(&self) -> Option<&str> {
        match self {
            Self::Unix => Some(DEFAULT_UNIX_SOCKET_PATH),
            Self::UnixSocket(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom)
    }
}

impl FromStr for OutputLocation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_location(s).ok_or_else(|| ConfigError::InvalidLocation {
            location: s.to_string(),
            origin: LocationOrigin::Argument,
        })
    }
}

impl TryFrom<String> for OutputLocation {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for OutputLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_custom() {
            return Err(ser::Error::custom(
                "custom output location has no string form to deserialize from",
            ));
        }
        serializer.collect_str(self)
    }
}

impl fmt::Display for OutputLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Memory => write!(f, "memory"),
            Self::Stderr => write!(f, "stderr"),
            Self::Stdout => write!(f, "stdout"),
            Self::Udp => write!(f, "udp"),
            Self::Unix => write!(f, "unix"),
            Self::File(path) => write!(f, "{FILE_SCHEME}{path}"),
            Self::UdpAddress(addr) => write!(f, "{UDP_SCHEME}{addr}"),
            Self::UnixSocket(path) => write!(f, "{UNIX_SCHEME}{path}"),
            Self::Custom => write!(f, "{CUSTOM}"),
        }
    }
}

impl PartialEq<str> for OutputLocation {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for OutputLocation {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

fn parse_location(s: &str) -> Option<OutputLocation> {
    let location = match s {
        "none" => OutputLocation::None,
        "memory" => OutputLocation::Memory,
        "stderr" => OutputLocation::Stderr,
        "stdout" => OutputLocation::Stdout,
        "udp" => OutputLocation::Udp,
        "unix" => OutputLocation::Unix,
        // Only the scheme and a non-empty remainder are checked here, the
        // writer validates paths and addresses when it opens them.
        _ => {
            if let Some(rest) = s.strip_prefix(FILE_SCHEME) {
                OutputLocation::File(non_empty(rest)?)
            } else if let Some(rest) = s.strip_prefix(UDP_SCHEME) {
                OutputLocation::UdpAddress(non_empty(rest)?)
            } else if let Some(rest) = s.strip_prefix(UNIX_SCHEME) {
                OutputLocation::UnixSocket(non_empty(rest)?)
            } else {
                return None;
            }
        }
    };
    Some(location)
}

fn non_empty(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_string())
}

/// Returns `true` if `location` is one of the accepted output locations.
///
/// The empty string is not valid here; callers treat it as "use the default"
/// before asking.
///
/// # Examples
///
/// ```
/// use spectator::location::is_valid_output_location;
///
/// assert!(is_valid_output_location("udp"));
/// assert!(is_valid_output_location("unix:///run/spectatord/spectatord.sock"));
/// assert!(!is_valid_output_location("udp://"));
/// assert!(!is_valid_output_location("tcp://localhost:1234"));
/// ```
pub fn is_valid_output_location(location: &str) -> bool {
    parse_location(location).is_some()
}

/// Resolves the output location for a new configuration.
///
/// A non-empty `requested` location must be valid. If
/// `SPECTATOR_OUTPUT_LOCATION` is set in `env` it must also be valid, and it
/// then replaces `requested` unconditionally. An empty result falls back to
/// [`DEFAULT_LOCATION`].
pub fn resolve_location(requested: &str, env: &EnvSnapshot) -> Result<OutputLocation, ConfigError> {
    let mut location = if requested.is_empty() {
        None
    } else {
        Some(parse_location(requested).ok_or_else(|| ConfigError::InvalidLocation {
            location: requested.to_string(),
            origin: LocationOrigin::Argument,
        })?)
    };

    if let Some(value) = env.get(OUTPUT_LOCATION_ENV_VAR) {
        let invalid = || ConfigError::InvalidLocation {
            location: value.to_string(),
            origin: LocationOrigin::EnvOverride,
        };
        // A lossily converted value can still look like a valid file path.
        if env.is_lossy(OUTPUT_LOCATION_ENV_VAR) {
            return Err(invalid());
        }
        let overridden = parse_location(value).ok_or_else(invalid)?;
        debug!(
            "{} overrides output location '{}' with '{}'",
            OUTPUT_LOCATION_ENV_VAR, requested, overridden
        );
        location = Some(overridden);
    }

    Ok(location.unwrap_or_else(|| {
        debug!("No output location configured, using default '{}'", DEFAULT_LOCATION);
        OutputLocation::default()
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use duplicate::duplicate_item;
    use proptest::prelude::*;
    use tracing_test::traced_test;

    fn env_with_override(value: &str) -> EnvSnapshot {
        EnvSnapshot::from_iter([(OUTPUT_LOCATION_ENV_VAR, value)])
    }

    #[duplicate_item(
        test_name                       token;
        [test_bare_location_none]       ["none"];
        [test_bare_location_memory]     ["memory"];
        [test_bare_location_stderr]     ["stderr"];
        [test_bare_location_stdout]     ["stdout"];
        [test_bare_location_udp]        ["udp"];
        [test_bare_location_unix]       ["unix"];
    )]
    #[test]
    fn test_name() {
        let location = resolve_location(token, &EnvSnapshot::empty()).unwrap();
        assert_eq!(location, token);
        assert_eq!(location.to_string(), token);
    }

    #[test]
    fn test_empty_location_defaults_to_udp() {
        let location = resolve_location("", &EnvSnapshot::empty()).unwrap();
        assert_eq!(location, OutputLocation::Udp);
        assert_eq!(location.to_string(), "udp");
    }

    #[test]
    fn test_uri_locations() {
        let env = EnvSnapshot::empty();
        assert_eq!(
            resolve_location("file:///tmp/metrics.log", &env).unwrap(),
            OutputLocation::File("/tmp/metrics.log".to_string())
        );
        assert_eq!(
            resolve_location("udp://localhost:1234", &env).unwrap(),
            OutputLocation::UdpAddress("localhost:1234".to_string())
        );
        assert_eq!(
            resolve_location("unix:///run/spectatord/spectatord.sock", &env).unwrap(),
            OutputLocation::UnixSocket("/run/spectatord/spectatord.sock".to_string())
        );
    }

    #[test]
    fn test_invalid_location() {
        let err = resolve_location("bogus", &EnvSnapshot::empty()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidLocation {
                location: "bogus".to_string(),
                origin: LocationOrigin::Argument,
            }
        );
    }

    #[test]
    fn test_scheme_without_rest_is_invalid() {
        for location in ["file://", "udp://", "unix://"] {
            assert!(!is_valid_output_location(location), "{location}");
        }
    }

    #[test]
    fn test_near_misses_are_invalid() {
        for location in ["UDP", " udp", "udp ", "tcp://host:1", "file:/tmp/x", "custom", ""] {
            assert!(!is_valid_output_location(location), "{location:?}");
        }
    }

    #[test]
    fn test_env_override_replaces_valid_argument() {
        let env = env_with_override("memory");
        assert_eq!(resolve_location("udp", &env).unwrap(), OutputLocation::Memory);
        assert_eq!(resolve_location("", &env).unwrap(), OutputLocation::Memory);
    }

    #[test]
    fn test_invalid_env_override_fails_regardless_of_argument() {
        let env = env_with_override("bogus");
        for requested in ["", "udp", "file:///tmp/x"] {
            let err = resolve_location(requested, &env).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidLocation {
                    location: "bogus".to_string(),
                    origin: LocationOrigin::EnvOverride,
                }
            );
        }
    }

    #[test]
    fn test_invalid_argument_reported_before_env_override() {
        let env = env_with_override("stdout");
        let err = resolve_location("bogus", &env).unwrap_err();
        assert_eq!(err.location(), "bogus");
    }

    #[test]
    fn test_empty_env_override_is_invalid() {
        let err = resolve_location("udp", &env_with_override("")).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidLocation {
                location: String::new(),
                origin: LocationOrigin::EnvOverride,
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_env_override_is_invalid() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        // "file:///\xff" would pass the grammar once converted lossily.
        for raw in [b"ud\xff".to_vec(), b"file:///\xff".to_vec()] {
            let env = EnvSnapshot::from_os_vars([(
                OsString::from(OUTPUT_LOCATION_ENV_VAR),
                OsString::from_vec(raw),
            )]);
            let err = resolve_location("stdout", &env).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidLocation {
                    origin: LocationOrigin::EnvOverride,
                    ..
                }
            ));
        }
    }

    #[test]
    #[traced_test]
    fn test_env_override_is_logged() {
        let _ = resolve_location("udp", &env_with_override("stderr")).unwrap();
        assert!(logs_contain("SPECTATOR_OUTPUT_LOCATION overrides output location"));
    }

    #[test]
    fn test_default_endpoints() {
        assert_eq!(OutputLocation::Udp.udp_address(), Some(DEFAULT_UDP_ADDRESS));
        assert_eq!(
            OutputLocation::UdpAddress("10.0.0.1:9000".to_string()).udp_address(),
            Some("10.0.0.1:9000")
        );
        assert_eq!(OutputLocation::Unix.unix_socket_path(), Some(DEFAULT_UNIX_SOCKET_PATH));
        assert_eq!(OutputLocation::Memory.udp_address(), None);
        assert_eq!(OutputLocation::Udp.unix_socket_path(), None);
    }

    #[test]
    fn test_custom_is_not_parseable() {
        assert!("custom".parse::<OutputLocation>().is_err());
        assert_eq!(OutputLocation::Custom.to_string(), "custom");
    }

    #[test]
    fn test_serde_uses_location_string() {
        let location = OutputLocation::UdpAddress("localhost:1234".to_string());
        let json = serde_json::to_string(&location).unwrap();
        assert_eq!(json, "\"udp://localhost:1234\"");
        let parsed: OutputLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, location);
        assert!(serde_json::from_str::<OutputLocation>("\"bogus\"").is_err());
    }

    #[test]
    fn test_custom_location_does_not_serialize() {
        assert!(serde_json::to_string(&OutputLocation::Custom).is_err());
        assert!(serde_json::from_str::<OutputLocation>("\"custom\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_scheme_with_non_empty_rest_is_valid(
            scheme in prop::sample::select(vec!["file://", "udp://", "unix://"]),
            rest in ".+",
        ) {
            let location = format!("{scheme}{rest}");
            prop_assert!(is_valid_output_location(&location));
            let parsed: OutputLocation = location.parse().unwrap();
            prop_assert_eq!(parsed.to_string(), location);
        }

        #[test]
        fn prop_unknown_scheme_is_invalid(scheme in "[a-z]{1,8}", rest in ".+") {
            prop_assume!(!["file", "udp", "unix"].contains(&scheme.as_str()));
            let location = format!("{scheme}://{rest}");
            prop_assert!(!is_valid_output_location(&location));
        }
    }
}
