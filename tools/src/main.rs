/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use ndrange_tools::Cli;
use ndrange_tools::commands::Runnable;

fn main() -> ExitCode {
    ndrange_tools::logging::initialize_logging();
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    let result = cli
        .subcmd
        .run(&mut stdout)
        .and_then(|()| stdout.flush().map_err(Into::into));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error running subcommand: {:?} ", e);
            ExitCode::FAILURE
        }
    }
}
