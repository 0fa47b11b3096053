/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Binary operations on two ranges.

use std::io::Write;

use anyhow::Context;
use clap::Args;
use clap::Parser;
use ndrange::Range;
use ndrange::RangeError;

use crate::args::SizeArgs;
use crate::commands::Error;
use crate::commands::Runnable;

#[derive(Args, Debug)]
pub struct Operands {
    /// The left operand
    #[arg(allow_hyphen_values = true)]
    lhs: Range,
    /// The right operand
    #[arg(allow_hyphen_values = true)]
    rhs: Range,
    #[command(flatten)]
    sizes: SizeArgs,
}

type Op = fn(&Range, &Range, &[i64]) -> Result<Range, RangeError>;

impl Operands {
    fn apply(&self, name: &str, op: Op, out: &mut dyn Write) -> Result<(), Error> {
        tracing::debug!(lhs = %self.lhs, rhs = %self.rhs, "{}", name);
        let result = op(&self.lhs, &self.rhs, self.sizes.get())
            .with_context(|| format!("cannot {} `{}` and `{}`", name, self.lhs, self.rhs))?;
        writeln!(out, "{}", ndrange::encode(&result))?;
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct Union {
    #[command(flatten)]
    operands: Operands,
}

impl Runnable for Union {
    fn run(&self, out: &mut dyn Write) -> Result<(), Error> {
        self.operands.apply("union", Range::union, out)
    }
}

#[derive(Parser, Debug)]
pub struct Intersect {
    #[command(flatten)]
    operands: Operands,
}

impl Runnable for Intersect {
    fn run(&self, out: &mut dyn Write) -> Result<(), Error> {
        self.operands.apply("intersect", Range::intersect, out)
    }
}

#[derive(Parser, Debug)]
pub struct Without {
    #[command(flatten)]
    operands: Operands,
}

impl Runnable for Without {
    fn run(&self, out: &mut dyn Write) -> Result<(), Error> {
        self.operands.apply("subtract", Range::without, out)
    }
}

/// `lhs` is a view onto the data, `rhs` selects positions of the view.
#[derive(Parser, Debug)]
pub struct Compose {
    #[command(flatten)]
    operands: Operands,
}

impl Runnable for Compose {
    fn run(&self, out: &mut dyn Write) -> Result<(), Error> {
        self.operands.apply("compose", Range::pre_multiply, out)
    }
}
