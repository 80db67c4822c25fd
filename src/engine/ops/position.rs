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
//! Positional selection: broadcasts one row of each partition (first, last,
//! or a caller-given 0-based offset) to every row of that partition.

use crate::engine::column::{Column, ColumnData, OpaqueColumn, StrColumn};
use crate::engine::error::Result;
use crate::engine::numeric::FixedValue;
use crate::engine::ops::unsupported;
use crate::engine::partition::partition_ranges;

#[derive(Copy, Clone, Debug)]
pub(crate) enum Pick {
    First,
    Last,
    /// 0-based offset from the partition start; at or beyond the partition
    /// size the partition's output is nil.
    Nth(u64),
    /// The "none" offset sentinel: the entire result is nil-filled.
    NthNone,
}

impl Pick {
    fn op(self) -> &'static str {
        match self {
            Pick::First => "first_value",
            Pick::Last => "last_value",
            Pick::Nth(_) | Pick::NthNone => "nth_value",
        }
    }

    /// The selected row for a partition `[lo, hi)`, or `None` for nil.
    fn select(self, lo: usize, hi: usize) -> Option<usize> {
        match self {
            Pick::First => Some(lo),
            Pick::Last => Some(hi - 1),
            Pick::Nth(n) => {
                let n = n as usize;
                (n < hi - lo).then_some(lo + n)
            }
            Pick::NthNone => None,
        }
    }
}

pub(crate) fn compute(
    out: &mut Column,
    input: &Column,
    bounds: Option<&[i8]>,
    pick: Pick,
) -> Result<()> {
    let has_nils = match (&input.data, &mut out.data) {
        (ColumnData::Bool(b), ColumnData::Bool(rb))
        | (ColumnData::I8(b), ColumnData::I8(rb)) => pick_fixed(b, rb, bounds, pick),
        (ColumnData::I16(b), ColumnData::I16(rb)) => pick_fixed(b, rb, bounds, pick),
        (ColumnData::I32(b), ColumnData::I32(rb)) => pick_fixed(b, rb, bounds, pick),
        (ColumnData::I64(b), ColumnData::I64(rb)) => pick_fixed(b, rb, bounds, pick),
        (ColumnData::I128(b), ColumnData::I128(rb)) => pick_fixed(b, rb, bounds, pick),
        (ColumnData::F32(b), ColumnData::F32(rb)) => pick_fixed(b, rb, bounds, pick),
        (ColumnData::F64(b), ColumnData::F64(rb)) => pick_fixed(b, rb, bounds, pick),
        (ColumnData::Str(b), ColumnData::Str(rb)) => pick_str(b, rb, bounds, pick),
        (ColumnData::Opaque(b), ColumnData::Opaque(rb)) => pick_opaque(b, rb, bounds, pick),
        _ => {
            return Err(unsupported(
                pick.op(),
                input.physical_type(),
                Some(out.physical_type()),
            ));
        }
    };
    // The "none" offset nil-fills the result unconditionally.
    out.finish(has_nils || matches!(pick, Pick::NthNone));
    Ok(())
}

fn pick_fixed<T: FixedValue>(
    b: &[T],
    rb: &mut [T],
    bounds: Option<&[i8]>,
    pick: Pick,
) -> bool {
    let mut has_nils = false;
    for part in partition_ranges(bounds, b.len()) {
        let curval = match pick.select(part.start, part.end) {
            Some(row) => b[row],
            None => T::NIL,
        };
        if curval.is_nil() {
            has_nils = true;
        }
        for r in &mut rb[part] {
            *r = curval;
        }
    }
    has_nils
}

fn pick_str(b: &StrColumn, rb: &mut StrColumn, bounds: Option<&[i8]>, pick: Pick) -> bool {
    let mut has_nils = false;
    for part in partition_ranges(bounds, b.len()) {
        let selected = pick.select(part.start, part.end);
        let nil = selected.is_none_or(|row| b.is_nil(row));
        if nil {
            has_nils = true;
        }
        for row in part {
            match selected {
                Some(src) => rb.copy_from(row, b, src),
                None => rb.set(row, None),
            }
        }
    }
    has_nils
}

fn pick_opaque(b: &OpaqueColumn, rb: &mut OpaqueColumn, bounds: Option<&[i8]>, pick: Pick) -> bool {
    let mut has_nils = false;
    for part in partition_ranges(bounds, b.len()) {
        let selected = pick.select(part.start, part.end);
        let nil = selected.is_none_or(|row| b.is_nil(row));
        if nil {
            has_nils = true;
        }
        for row in part {
            match selected {
                Some(src) => rb.set(row, b.get(src)),
                None => rb.set_nil(row),
            }
        }
    }
    has_nils
}
