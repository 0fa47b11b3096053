/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Index-range algebra over multidimensional datasets.
//!
//! A [`Range`] selects positions of a dataset, one [`Dim`] per axis.
//! Each dimension is an ordered [`Range1D`] of [`SliceElement`]s,
//! optionally named and colored ([`Range1DGroup`]) or partitioned into
//! named groups ([`CompositeRange1D`]).
//!
//! Ranges double as coordinate maps between a dataset and views of it:
//! [`Range::pre_multiply`] composes a view with a sub-view, and
//! [`Range::index_range_of`] maps back. Negative bounds count from the
//! end of a dimension and are only resolved when a size is supplied,
//! so views of views compose without knowing the data.
//!
//! Every type has a compact textual encoding (its `Display`) that
//! [`decode`] reverses:
//!
//! ```
//! let r = ndrange::decode("1, (1,4)").unwrap();
//! assert_eq!(ndrange::encode(&r), "1,(1,4)");
//! assert_eq!(r.size(&[]).unwrap(), vec![1, 2]);
//! ```

mod dim;
mod element;
mod group;
/// The textual decoder.
pub mod parse;
mod range;
mod range1d;
#[cfg(test)]
mod strategy;

pub use dim::Dim;
pub use element::RangeError;
pub use element::SliceElement;
pub use element::SliceElementIter;
pub use group::CompositeRange1D;
pub use group::Range1DGroup;
pub use parse::DecodeError;
pub use parse::decode;
pub use range::Nested;
pub use range::Range;
pub use range::RangeBuilder;
pub use range1d::Range1D;
pub use range1d::Range1DBuilder;
pub use range1d::Range1DIter;

/// Encode a range as text; the inverse of [`decode`].
pub fn encode(range: &Range) -> String {
    range.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_of_view() {
        // Rows 2..8 of a 10x10 matrix, then the last three of those rows
        // and every third column.
        let sizes = [10, 10];
        let view = decode("(2:8)").unwrap();
        let sub = decode("(-4:-1),(0:10:3)").unwrap();
        let composed = view.pre_multiply(&sub, &sizes).unwrap();
        assert_eq!(encode(&composed), "(5:8),(0:10:3)");
        assert_eq!(composed.size(&sizes).unwrap(), vec![3, 4]);
        let back = view.index_range_of(&composed, &sizes).unwrap();
        assert_eq!(encode(&back), "(3:6),(0:10:3)");
    }

    #[test]
    fn test_union_scenario() {
        let a = Range1D::from_indices(&[1, 3, 5]);
        let b = Range1D::from_indices(&[2, 3, 4]);
        let u = a.union(&b, None).unwrap();
        assert_eq!(u.to_string(), "(1:6)");
    }
}
