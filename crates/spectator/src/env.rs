// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Point-in-time view of the process environment.
//!
//! Location resolution and tag merging read the environment through an
//! [`EnvSnapshot`] instead of calling [`std::env`] directly, so a single
//! configuration build sees one consistent set of variables and tests can
//! substitute their own.

use std::collections::{HashMap, HashSet};
use std::env;
use std::ffi::OsString;

/// Immutable copy of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
    // names whose value was not valid UTF-8 and was converted lossily
    lossy: HashSet<String>,
}

impl EnvSnapshot {
    /// Captures the current process environment.
    ///
    /// See [`EnvSnapshot::from_os_vars`] for how non UTF-8 data is kept.
    pub fn capture() -> Self {
        Self::from_os_vars(env::vars_os())
    }

    /// Builds a snapshot from raw OS strings.
    ///
    /// Names and values that are not valid UTF-8 are converted lossily, so a
    /// variable that is set always shows up as set. Use
    /// [`EnvSnapshot::is_lossy`] to tell whether a value was converted.
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut snapshot = Self::default();
        for (key, value) in vars {
            let key = key.to_string_lossy().into_owned();
            let value = match value.into_string() {
                Ok(value) => value,
                Err(raw) => {
                    snapshot.lossy.insert(key.clone());
                    raw.to_string_lossy().into_owned()
                }
            };
            snapshot.vars.insert(key, value);
        }
        snapshot
    }

    /// Snapshot containing no variables.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the value of `key`, or `None` if it is unset.
    ///
    /// A variable set to the empty string is returned as `Some("")`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Returns `true` if `key` is set to a value that was not valid UTF-8.
    pub fn is_lossy(&self, key: &str) -> bool {
        self.lossy.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            lossy: HashSet::new(),
        }
    }
}
