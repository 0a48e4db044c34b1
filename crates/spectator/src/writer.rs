// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Debug;
use std::io;

/// Transport that receives encoded spectatord protocol lines.
///
/// Writers for the built-in locations are constructed by the registry from
/// [`Config::location`](crate::Config::location). Implement this trait and
/// install it with [`with_writer`](crate::option::with_writer) to send lines
/// somewhere else.
pub trait Writer: Debug + Send + Sync {
    fn write(&self, line: &str);

    fn close(&self) -> io::Result<()>;
}
