/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Used when `RUST_LOG` is unset or invalid.
const DEFAULT_LEVEL: &str = "warn";

/// Set up logging to stderr, filtered by `RUST_LOG`. Safe to call more
/// than once.
pub fn initialize_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));
    let layer = fmt::Layer::default()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    if let Err(err) = Registry::default().with(filter).with(layer).try_init() {
        tracing::debug!("logging already initialized for this process: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_twice() {
        initialize_logging();
        initialize_logging();
        tracing::debug!("still logging");
    }
}
