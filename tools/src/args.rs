/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use anyhow::Context;
use clap::Args;

/// A comma separated list of integers, such as coordinates or
/// dimension sizes: `3,0,12`. The empty string is the empty list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coords(pub Vec<i64>);

impl FromStr for Coords {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        if s.trim().is_empty() {
            return Ok(Coords::default());
        }
        s.split(',')
            .map(|part| {
                part.trim()
                    .parse::<i64>()
                    .with_context(|| format!("invalid integer `{}` in `{}`", part, s))
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map(Coords)
    }
}

impl Display for Coords {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Dimension sizes against which relative bounds are resolved.
#[derive(Args, Clone, Debug, Default)]
pub struct SizeArgs {
    /// Size of each dimension, comma separated
    #[arg(long, env = "NDRANGE_SIZES", default_value_t)]
    pub sizes: Coords,
}

impl SizeArgs {
    pub fn get(&self) -> &[i64] {
        &self.sizes.0
    }
}
