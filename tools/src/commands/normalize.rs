/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::io::Write;

use clap::Parser;
use ndrange::Range;

use crate::commands::Error;
use crate::commands::Runnable;

#[derive(Parser, Debug)]
pub struct Cmd {
    /// The range to normalize
    #[arg(allow_hyphen_values = true)]
    range: Range,
}

impl Runnable for Cmd {
    fn run(&self, out: &mut dyn Write) -> Result<(), Error> {
        tracing::debug!(ndim = self.range.ndim(), "normalize");
        writeln!(out, "{}", ndrange::encode(&self.range))?;
        Ok(())
    }
}
