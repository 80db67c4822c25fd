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
//! Column construction and readback helpers shared by the engine tests.
#![allow(dead_code)]

use std::cmp::Ordering;

use novarocks_analytic::{Column, ColumnData, OpaqueColumn, StrColumn};

pub fn i8_col(vals: &[Option<i8>]) -> Column {
    Column::new(ColumnData::I8(
        vals.iter().map(|v| v.unwrap_or(i8::MIN)).collect(),
    ))
}

pub fn i32_col(vals: &[Option<i32>]) -> Column {
    Column::new(ColumnData::I32(
        vals.iter().map(|v| v.unwrap_or(i32::MIN)).collect(),
    ))
}

pub fn i64_col(vals: &[Option<i64>]) -> Column {
    Column::new(ColumnData::I64(
        vals.iter().map(|v| v.unwrap_or(i64::MIN)).collect(),
    ))
}

pub fn f64_col(vals: &[Option<f64>]) -> Column {
    Column::new(ColumnData::F64(
        vals.iter().map(|v| v.unwrap_or(f64::MIN_POSITIVE)).collect(),
    ))
}

pub fn str_col(vals: &[Option<&str>]) -> Column {
    Column::new(ColumnData::Str(StrColumn::from_values(
        vals.iter().copied(),
    )))
}

/// Boundary-marker column: `true` starts a new partition.
pub fn marks(bits: &[bool]) -> Column {
    Column::new(ColumnData::Bool(
        bits.iter().map(|b| *b as i8).collect(),
    ))
}

fn atom_cmp(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// Opaque column of 4-byte big-endian encoded u32 atoms; all-0xFF is nil.
pub fn opaque_col(vals: &[Option<u32>]) -> Column {
    let nil: Box<[u8]> = vec![0xFF; 4].into_boxed_slice();
    let atoms = vals
        .iter()
        .map(|v| match v {
            Some(x) => x.to_be_bytes().to_vec().into_boxed_slice(),
            None => nil.clone(),
        })
        .collect();
    Column::new(ColumnData::Opaque(OpaqueColumn::new(atoms, nil, atom_cmp)))
}

pub fn opaque_output(input: &Column, len: usize) -> Column {
    match &input.data {
        ColumnData::Opaque(src) => Column::opaque_like(src, len),
        other => panic!("expected opaque column, got {:?}", other.physical_type()),
    }
}

pub fn read_bools(col: &Column) -> Vec<bool> {
    match &col.data {
        ColumnData::Bool(v) => v.iter().map(|x| *x != 0).collect(),
        other => panic!("expected bool column, got {:?}", other.physical_type()),
    }
}

pub fn read_i8(col: &Column) -> Vec<Option<i8>> {
    match &col.data {
        ColumnData::I8(v) => v
            .iter()
            .map(|x| (*x != i8::MIN).then_some(*x))
            .collect(),
        other => panic!("expected i8 column, got {:?}", other.physical_type()),
    }
}

pub fn read_i32(col: &Column) -> Vec<Option<i32>> {
    match &col.data {
        ColumnData::I32(v) => v
            .iter()
            .map(|x| (*x != i32::MIN).then_some(*x))
            .collect(),
        other => panic!("expected i32 column, got {:?}", other.physical_type()),
    }
}

pub fn read_i64(col: &Column) -> Vec<Option<i64>> {
    match &col.data {
        ColumnData::I64(v) => v
            .iter()
            .map(|x| (*x != i64::MIN).then_some(*x))
            .collect(),
        other => panic!("expected i64 column, got {:?}", other.physical_type()),
    }
}

pub fn read_i128(col: &Column) -> Vec<Option<i128>> {
    match &col.data {
        ColumnData::I128(v) => v
            .iter()
            .map(|x| (*x != i128::MIN).then_some(*x))
            .collect(),
        other => panic!("expected i128 column, got {:?}", other.physical_type()),
    }
}

pub fn read_f64(col: &Column) -> Vec<Option<f64>> {
    match &col.data {
        ColumnData::F64(v) => v
            .iter()
            .map(|x| (*x != f64::MIN_POSITIVE).then_some(*x))
            .collect(),
        other => panic!("expected f64 column, got {:?}", other.physical_type()),
    }
}

pub fn read_strs(col: &Column) -> Vec<Option<String>> {
    match &col.data {
        ColumnData::Str(c) => (0..c.len())
            .map(|i| c.get(i).map(|s| s.to_string()))
            .collect(),
        other => panic!("expected str column, got {:?}", other.physical_type()),
    }
}

pub fn read_opaque(col: &Column) -> Vec<Option<u32>> {
    match &col.data {
        ColumnData::Opaque(c) => (0..c.len())
            .map(|i| {
                if c.is_nil(i) {
                    None
                } else {
                    Some(u32::from_be_bytes(c.get(i).try_into().expect("4-byte atom")))
                }
            })
            .collect(),
        other => panic!("expected opaque column, got {:?}", other.physical_type()),
    }
}
