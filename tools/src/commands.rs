/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

mod combine;
mod index_of;
mod invert;
mod list;
mod normalize;
mod size;
mod swap;

use std::io::Write;

use clap::Subcommand;
use enum_dispatch::enum_dispatch;

/// Error that `Runnable` throws.
type Error = anyhow::Error;

/// The run logic for each subcommand. Results are written to `out`.
#[enum_dispatch]
pub trait Runnable {
    fn run(&self, out: &mut dyn Write) -> Result<(), Error>;
}

/// Sub-commands of the CLI.
///
/// Ranges are given in their textual encoding, e.g. `(0:4),-1`.
#[derive(Subcommand, Debug)]
#[enum_dispatch(Runnable)]
pub enum Command {
    /// Decodes a range and prints its canonical encoding
    #[command()]
    Normalize(normalize::Cmd),
    /// Prints the number of selected indices per dimension
    #[command()]
    Size(size::Cmd),
    /// Prints the coordinates of every selected cell, one per line
    #[command()]
    List(list::Cmd),
    /// Dimension-wise union of two ranges
    #[command()]
    Union(combine::Union),
    /// Dimension-wise intersection of two ranges
    #[command()]
    Intersect(combine::Intersect),
    /// Dimension-wise difference of two ranges
    #[command()]
    Without(combine::Without),
    /// Maps a range over a view back to the data the view was taken from
    #[command()]
    Compose(combine::Compose),
    /// Prints the position within a range of absolute coordinates
    #[command()]
    IndexOf(index_of::Cmd),
    /// Prints the absolute coordinates of a position within a range
    #[command()]
    Invert(invert::Cmd),
    /// Reverses the order of the dimensions of a range
    #[command()]
    Swap(swap::Cmd),
}
