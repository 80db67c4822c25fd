// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
//! Change detection: marks rows whose value differs from the previous row
//! within the partition. Rank-family computations build on this.

use std::cmp::Ordering;

use crate::engine::column::{Column, ColumnData, OpaqueColumn, StrColumn};
use crate::engine::error::Result;
use crate::engine::numeric::FixedValue;
use crate::engine::ops::unsupported;
use crate::engine::partition::partition_ranges;

/// Unchanged rows copy the carry column when one is supplied (so chained
/// diffs over several key columns accumulate), otherwise `false`; a changed
/// row always writes `true`. The comparison value only advances on change.
/// The first row of each partition is never marked changed.
pub(crate) fn compute(
    out: &mut Column,
    input: &Column,
    bounds: Option<&[i8]>,
    carry: Option<&[i8]>,
) -> Result<()> {
    let ColumnData::Bool(rb) = &mut out.data else {
        return Err(unsupported(
            "diff",
            input.physical_type(),
            Some(out.physical_type()),
        ));
    };

    match &input.data {
        ColumnData::Bool(b) | ColumnData::I8(b) => diff_fixed(b, rb, bounds, carry),
        ColumnData::I16(b) => diff_fixed(b, rb, bounds, carry),
        ColumnData::I32(b) => diff_fixed(b, rb, bounds, carry),
        ColumnData::I64(b) => diff_fixed(b, rb, bounds, carry),
        ColumnData::I128(b) => diff_fixed(b, rb, bounds, carry),
        ColumnData::F32(b) => diff_fixed(b, rb, bounds, carry),
        ColumnData::F64(b) => diff_fixed(b, rb, bounds, carry),
        ColumnData::Str(b) => diff_str(b, rb, bounds, carry),
        ColumnData::Opaque(b) => diff_opaque(b, rb, bounds, carry),
    }
    // Only true/false are ever written.
    out.finish(false);
    Ok(())
}

fn diff_fixed<T: FixedValue>(b: &[T], rb: &mut [i8], bounds: Option<&[i8]>, carry: Option<&[i8]>) {
    for part in partition_ranges(bounds, b.len()) {
        let mut prev = b[part.start];
        for row in part {
            rb[row] = carry.map_or(0, |c| c[row]);
            if b[row] != prev {
                rb[row] = 1;
                prev = b[row];
            }
        }
    }
}

fn diff_str(b: &StrColumn, rb: &mut [i8], bounds: Option<&[i8]>, carry: Option<&[i8]>) {
    for part in partition_ranges(bounds, b.len()) {
        let mut prev = part.start;
        for row in part {
            rb[row] = carry.map_or(0, |c| c[row]);
            if b.get(row) != b.get(prev) {
                rb[row] = 1;
                prev = row;
            }
        }
    }
}

fn diff_opaque(b: &OpaqueColumn, rb: &mut [i8], bounds: Option<&[i8]>, carry: Option<&[i8]>) {
    for part in partition_ranges(bounds, b.len()) {
        let mut prev = part.start;
        for row in part {
            rb[row] = carry.map_or(0, |c| c[row]);
            if b.compare(b.get(row), b.get(prev)) != Ordering::Equal {
                rb[row] = 1;
                prev = row;
            }
        }
    }
}
