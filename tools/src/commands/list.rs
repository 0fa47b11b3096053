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

use crate::args::Coords;
use crate::args::SizeArgs;
use crate::commands::Error;
use crate::commands::Runnable;

#[derive(Parser, Debug)]
pub struct Cmd {
    /// The range to enumerate
    #[arg(allow_hyphen_values = true)]
    range: Range,
    /// Stop after this many cells
    #[arg(short = 'n', long)]
    limit: Option<usize>,
    #[command(flatten)]
    sizes: SizeArgs,
}

impl Runnable for Cmd {
    fn run(&self, out: &mut dyn Write) -> Result<(), Error> {
        let limit = self.limit.unwrap_or(usize::MAX);
        let mut count = 0;
        let mut written = Ok(());
        self.range.product(self.sizes.get(), |coords| {
            if count < limit && written.is_ok() {
                written = writeln!(out, "{}", Coords(coords.to_vec()));
                count += 1;
            }
        })?;
        written?;
        tracing::debug!(count, "listed cells");
        Ok(())
    }
}
