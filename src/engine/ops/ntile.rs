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
//! Bucket assignment: distributes each partition's rows over ordered tiles.
//!
//! The remainder-distribution ordering is externally observable: when the
//! partition does not divide evenly, a bucket only advances after its
//! baseline `m / n` count has been written, so the first bucket absorbs one
//! extra row and undistributed remainder rows trail into a final short
//! bucket.

use crate::engine::column::{Column, ColumnData};
use crate::engine::error::Result;
use crate::engine::numeric::IntValue;
use crate::engine::ops::unsupported;
use crate::engine::partition::partition_ranges;

/// Integer columns only; the output column has the input's type. A `None`
/// tile yields an all-nil result for the whole input regardless of
/// partitioning. `tile` must be positive; callers validate the argument
/// before dispatch.
pub(crate) fn compute(
    out: &mut Column,
    input: &Column,
    bounds: Option<&[i8]>,
    tile: Option<i64>,
) -> Result<()> {
    if !input.physical_type().is_integer() || out.physical_type() != input.physical_type() {
        return Err(unsupported(
            "ntile",
            input.physical_type(),
            Some(out.physical_type()),
        ));
    }
    debug_assert!(tile.is_none_or(|t| t > 0), "ntile tile count must be positive");

    let len = input.len();
    match &mut out.data {
        ColumnData::I8(rb) => ntile_typed(rb, len, bounds, tile),
        ColumnData::I16(rb) => ntile_typed(rb, len, bounds, tile),
        ColumnData::I32(rb) => ntile_typed(rb, len, bounds, tile),
        ColumnData::I64(rb) => ntile_typed(rb, len, bounds, tile),
        ColumnData::I128(rb) => ntile_typed(rb, len, bounds, tile),
        _ => unreachable!("integer check above"),
    }
    out.finish(tile.is_none());
    Ok(())
}

fn ntile_typed<T: IntValue>(rb: &mut [T], len: usize, bounds: Option<&[i8]>, tile: Option<i64>) {
    let Some(val) = tile else {
        for r in rb.iter_mut() {
            *r = T::NIL;
        }
        return;
    };
    for part in partition_ranges(bounds, len) {
        fill_partition(&mut rb[part], val);
    }
}

fn fill_partition<T: IntValue>(rb: &mut [T], val: i64) {
    let m = rb.len() as i64;
    if val >= m {
        // One row per bucket, trailing buckets unused.
        for (k, r) in rb.iter_mut().enumerate() {
            *r = T::from_i128(k as i128 + 1);
        }
    } else if m % val == 0 {
        let baseline = m / val;
        let mut filled = 0i64;
        let mut bucket = 1i64;
        for r in rb.iter_mut() {
            if filled == baseline {
                bucket += 1;
                filled = 0;
            }
            *r = T::from_i128(bucket as i128);
            filled += 1;
        }
    } else {
        // Write before advancing: the first bucket takes baseline + 1 rows,
        // remainder rows trail into the final bucket.
        let baseline = m / val;
        let mut filled = 0i64;
        let mut bucket = 1i64;
        for r in rb.iter_mut() {
            *r = T::from_i128(bucket as i128);
            if filled == baseline {
                bucket += 1;
                filled = 0;
            }
            filled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fill_partition;

    #[test]
    fn even_division() {
        let mut rb = vec![0i32; 6];
        fill_partition(&mut rb, 3);
        assert_eq!(rb, vec![1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn more_tiles_than_rows() {
        let mut rb = vec![0i64; 3];
        fill_partition(&mut rb, 10);
        assert_eq!(rb, vec![1, 2, 3]);
    }

    #[test]
    fn uneven_division_trails_remainder_into_final_bucket() {
        let mut rb = vec![0i32; 7];
        fill_partition(&mut rb, 3);
        assert_eq!(rb, vec![1, 1, 1, 2, 2, 3, 3]);

        let mut rb = vec![0i32; 8];
        fill_partition(&mut rb, 3);
        assert_eq!(rb, vec![1, 1, 1, 2, 2, 3, 3, 4]);
    }

    #[test]
    fn bucket_sizes_stay_within_one_of_baseline() {
        for m in 1i64..40 {
            for n in 1i64..=m {
                let mut rb = vec![0i64; m as usize];
                fill_partition(&mut rb, n);
                let baseline = m / n;
                let mut sizes = std::collections::HashMap::new();
                for b in &rb {
                    *sizes.entry(*b).or_insert(0i64) += 1;
                }
                let total: i64 = sizes.values().sum();
                assert_eq!(total, m);
                if n < m {
                    for size in sizes.values() {
                        assert!(*size <= baseline + 1);
                    }
                }
            }
        }
    }
}
