// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the spectatord metrics client.
//!
//! A [`Config`] answers three questions for the registry: where metrics are
//! written ([`OutputLocation`]), which tags go on every metric, and whether a
//! caller supplied writer replaces the built-in transports.
//!
//! ```
//! use std::collections::HashMap;
//! use spectator::{option::ConfigOptionFn, Config};
//!
//! let tags = HashMap::from([("app".to_string(), "foo".to_string())]);
//! let config = Config::new("udp://localhost:1234", &tags, None, Vec::<ConfigOptionFn>::new())?;
//! # let _ = config;
//! # Ok::<(), spectator::ConfigError>(())
//! ```

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod config;
pub mod env;
pub mod error;
pub mod location;
pub mod logger;
pub mod option;
pub mod tags;
pub mod writer;

pub use config::{Config, ConfigBuilder};
pub use env::EnvSnapshot;
pub use error::{ConfigError, LocationOrigin};
pub use location::OutputLocation;
pub use logger::{DefaultLogger, Logger};
pub use option::{with_writer, ConfigOption};
pub use writer::Writer;
