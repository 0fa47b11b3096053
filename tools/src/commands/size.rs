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
    /// The range to measure
    #[arg(allow_hyphen_values = true)]
    range: Range,
    #[command(flatten)]
    sizes: SizeArgs,
}

impl Runnable for Cmd {
    fn run(&self, out: &mut dyn Write) -> Result<(), Error> {
        let size = self
            .range
            .size(self.sizes.get())
            .with_context(|| format!("cannot measure `{}`", self.range))?;
        writeln!(out, "{}", Coords(size))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::Cli;
    use crate::commands::Runnable;

    fn run(args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::parse_from(["ndrange", "size"].iter().chain(args));
        let mut out = Vec::new();
        cli.subcmd.run(&mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_run() {
        assert_eq!(run(&["(1:4),(0,5)"]).unwrap(), "3,2\n");
        assert_eq!(run(&["(-3:-1),", "--sizes", "10,4"]).unwrap(), "2,4\n");
    }

    #[test]
    fn test_missing_size() {
        let err = run(&["(-3:-1)"]).unwrap_err();
        assert_eq!(err.to_string(), "cannot measure `(-3:-1)`");
        assert_eq!(
            err.root_cause().to_string(),
            "unbound element `-3:-1` cannot be resolved without a size"
        );
    }
}
