/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Proptest strategies for every range type. Bounds are kept small so
//! that generated ranges overlap often.

use proptest::prelude::*;

use crate::dim::Dim;
use crate::element::SliceElement;
use crate::group::CompositeRange1D;
use crate::group::Range1DGroup;
use crate::range::Range;
use crate::range1d::Range1D;

/// Names exercising the characters the encoding must escape or that
/// are otherwise delimiters.
fn name() -> impl Strategy<Value = String> {
    "[a-z \"\\\\,(){}:]{0,6}"
}

impl Arbitrary for SliceElement {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        let step = prop_oneof![-3i64..=-1, 1i64..=3];
        prop_oneof![
            Just(SliceElement::All),
            Just(SliceElement::None),
            (-20i64..20).prop_map(SliceElement::Single),
            (-20i64..20, -20i64..20).prop_map(|(from, to)| SliceElement::slice(from, to)),
            (-20i64..20, -20i64..20, step).prop_map(|(from, to, step)| {
                SliceElement::stepped(from, to, step).expect("nonzero step")
            }),
        ]
        .boxed()
    }
}

impl Arbitrary for Range1D {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            proptest::collection::vec(any::<SliceElement>(), 0..4).prop_map(Range1D::from_elements),
            proptest::collection::vec(0i64..32, 0..12)
                .prop_map(|indices| Range1D::from_indices(&indices)),
        ]
        .boxed()
    }
}

impl Arbitrary for Range1DGroup {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (name(), name(), any::<Range1D>())
            .prop_map(|(name, color, range)| Range1DGroup::new(name, color, range))
            .boxed()
    }
}

impl Arbitrary for CompositeRange1D {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (name(), proptest::collection::vec(any::<Range1DGroup>(), 0..4))
            .prop_map(|(name, groups)| {
                CompositeRange1D::new(name, groups).expect("composite without a size")
            })
            .boxed()
    }
}

impl Arbitrary for Dim {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            3 => any::<Range1D>().prop_map(Dim::Plain),
            1 => any::<Range1DGroup>().prop_map(Dim::Group),
            1 => any::<CompositeRange1D>().prop_map(Dim::Composite),
        ]
        .boxed()
    }
}

impl Arbitrary for Range {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        proptest::collection::vec(any::<Dim>(), 0..4)
            .prop_map(Range::from_dims)
            .boxed()
    }
}
