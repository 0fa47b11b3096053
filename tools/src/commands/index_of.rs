/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use ndrange::Range;

use crate::args::Coords;
use crate::args::SizeArgs;
use crate::commands::Error;
use crate::commands::Runnable;

/// Prints one position per dimension, or `-` where the coordinate is
/// not selected.
#[derive(Parser, Debug)]
pub struct Cmd {
    /// The range to search
    #[arg(allow_hyphen_values = true)]
    range: Range,
    /// Absolute coordinates, comma separated
    coords: Coords,
    #[command(flatten)]
    sizes: SizeArgs,
}

impl Runnable for Cmd {
    fn run(&self, out: &mut dyn Write) -> Result<(), Error> {
        let positions = self
            .range
            .index_of(&self.coords.0, self.sizes.get())
            .with_context(|| format!("cannot find {} in `{}`", self.coords, self.range))?;
        let positions: Vec<String> = positions
            .into_iter()
            .map(|position| position.map_or_else(|| "-".to_string(), |p| p.to_string()))
            .collect();
        writeln!(out, "{}", positions.join(","))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::Cli;
    use crate::commands::Runnable;

    fn run(args: &[&str]) -> String {
        let cli = Cli::parse_from(["ndrange", "index-of"].iter().chain(args));
        let mut out = Vec::new();
        cli.subcmd.run(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_run() {
        assert_eq!(run(&["(10:13,20),(4,2)", "20,2"]), "3,1\n");
        assert_eq!(run(&["(10:13,20),(4,2)", "14,4"]), "-,0\n");
        assert_eq!(run(&["(-2:-1)", "4", "--sizes", "5"]), "0\n");
    }
}
