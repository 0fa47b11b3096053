/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

mod args;
pub mod commands;
pub mod logging;

use clap::Parser;
use commands::Command;

#[derive(Parser, Debug)]
#[command(name = "ndrange", about = "Command line tool for index ranges")]
pub struct Cli {
    #[command(subcommand)]
    pub subcmd: Command,
}
