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

use thiserror::Error;

use crate::engine::column::PhysicalType;

fn dst_suffix(dst: &Option<PhysicalType>) -> String {
    match dst {
        Some(d) => format!(" -> {d}"),
        None => String::new(),
    }
}

/// Terminal failures of an analytic call.
///
/// Every variant aborts the whole call: no partial output is valid and the
/// output column must not be inspected afterwards. Recoverable numeric edge
/// cases (nil inputs, empty partitions, out-of-range offsets) are defined
/// nil outputs, never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticError {
    /// No kernel exists for the requested type (combination). Raised at
    /// dispatch time, before anything is written.
    #[error("{op}: type combination ({src}{}) not supported", dst_suffix(.dst))]
    UnsupportedType {
        op: &'static str,
        src: PhysicalType,
        dst: Option<PhysicalType>,
    },

    /// A fixed-point accumulation left the accumulator's representable
    /// range.
    #[error("{op}: overflow in calculation")]
    Overflow { op: &'static str },

    /// The stable floating-point summation routine failed internally.
    #[error("{op}: error while calculating floating-point sum")]
    FloatSum { op: &'static str },
}

pub type Result<T> = std::result::Result<T, AnalyticError>;
