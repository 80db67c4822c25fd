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
//! Per-operation analytic kernels. Each module owns the type dispatch and
//! both traversal regimes of one operation family.

pub(crate) mod arith;
pub(crate) mod avg;
pub(crate) mod count;
pub(crate) mod diff;
pub(crate) mod minmax;
pub(crate) mod ntile;
pub(crate) mod position;
pub(crate) mod shift;

use crate::engine::column::{Column, ColumnData, PhysicalType};
use crate::engine::error::{AnalyticError, Result};

pub(crate) fn unsupported(
    op: &'static str,
    src: PhysicalType,
    dst: Option<PhysicalType>,
) -> AnalyticError {
    AnalyticError::UnsupportedType { op, src, dst }
}

/// Boundary markers of the optional partition column. Only `Bool` columns
/// qualify; anything else is rejected at dispatch time.
pub(crate) fn bool_slice<'a>(
    op: &'static str,
    col: Option<&'a Column>,
) -> Result<Option<&'a [i8]>> {
    match col.map(|c| &c.data) {
        None => Ok(None),
        Some(ColumnData::Bool(v)) => Ok(Some(v)),
        Some(other) => Err(unsupported(op, other.physical_type(), None)),
    }
}
