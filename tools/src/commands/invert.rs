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

#[derive(Parser, Debug)]
pub struct Cmd {
    /// The range to resolve against
    #[arg(allow_hyphen_values = true)]
    range: Range,
    /// Positions within the range, comma separated
    positions: Coords,
    #[command(flatten)]
    sizes: SizeArgs,
}

impl Runnable for Cmd {
    fn run(&self, out: &mut dyn Write) -> Result<(), Error> {
        let coords = self
            .range
            .invert(&self.positions.0, self.sizes.get())
            .with_context(|| format!("cannot invert {} in `{}`", self.positions, self.range))?;
        writeln!(out, "{}", Coords(coords))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::Cli;
    use crate::commands::Runnable;

    fn run(args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::parse_from(["ndrange", "invert"].iter().chain(args));
        let mut out = Vec::new();
        cli.subcmd.run(&mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_run() {
        assert_eq!(run(&["(10:13,20),(4,2)", "3,1"]).unwrap(), "20,2\n");
        assert_eq!(run(&["(2:8)", "1,7"]).unwrap(), "3,7\n");
    }

    #[test]
    fn test_out_of_range() {
        let err = run(&["(10:13)", "5"]).unwrap_err();
        assert_eq!(err.to_string(), "cannot invert 5 in `(10:13)`");
        assert_eq!(err.root_cause().to_string(), "position 5 out of range 3");
    }
}
