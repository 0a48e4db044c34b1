// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Where a rejected location string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationOrigin {
    /// The `location` argument passed by the caller.
    Argument,
    /// The `SPECTATOR_OUTPUT_LOCATION` environment variable.
    EnvOverride,
}

impl fmt::Display for LocationOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Argument => write!(f, "location argument"),
            Self::EnvOverride => write!(f, "{}", crate::location::OUTPUT_LOCATION_ENV_VAR),
        }
    }
}

/// Errors that can occur while building a [`Config`](crate::Config)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{}", invalid_location_message(.location, .origin))]
    InvalidLocation {
        location: String,
        origin: LocationOrigin,
    },
}

impl ConfigError {
    /// The rejected location string, if this is a location error.
    pub fn location(&self) -> &str {
        match self {
            Self::InvalidLocation { location, .. } => location,
        }
    }
}

fn invalid_location_message(location: &str, origin: &LocationOrigin) -> String {
    match origin {
        LocationOrigin::Argument => format!("invalid spectatord output location: {location}"),
        LocationOrigin::EnvOverride => format!("{origin} is invalid: {location}"),
    }
}
