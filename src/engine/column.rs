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
//! Dense sentinel-coded columns consumed and produced by the analytic engine.
//!
//! Responsibilities:
//! - Owns the closed set of physical column representations (fixed-width
//!   numerics, heap-backed strings, opaque comparator-driven atoms).
//! - Tracks and finalizes the exclusive `nonil`/`nils` flag pair.
//!
//! Key exported interfaces:
//! - Types: `Column`, `ColumnData`, `PhysicalType`, `StrColumn`,
//!   `OpaqueColumn`, `ScalarValue`.
//!
//! Current limitations:
//! - Columns are in-memory only; allocation, growth and persistence belong
//!   to the surrounding storage layer.

use std::cmp::Ordering;
use std::fmt;

/// First heap byte of a nil string entry.
pub const STR_NIL_BYTE: u8 = 0x80;

/// Tag for the closed set of physical column representations.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PhysicalType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    F32,
    F64,
    Str,
    Opaque,
}

impl PhysicalType {
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            PhysicalType::I8
                | PhysicalType::I16
                | PhysicalType::I32
                | PhysicalType::I64
                | PhysicalType::I128
        )
    }
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhysicalType::Bool => "bool",
            PhysicalType::I8 => "i8",
            PhysicalType::I16 => "i16",
            PhysicalType::I32 => "i32",
            PhysicalType::I64 => "i64",
            PhysicalType::I128 => "i128",
            PhysicalType::F32 => "f32",
            PhysicalType::F64 => "f64",
            PhysicalType::Str => "str",
            PhysicalType::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

/// Variable-width column: fixed-width offsets into a shared byte heap.
///
/// Each entry is NUL-terminated UTF-8, or the single byte `0x80` for nil.
/// Offset 0 always addresses the shared nil entry.
#[derive(Clone, Debug)]
pub struct StrColumn {
    offsets: Vec<u64>,
    heap: Vec<u8>,
}

impl StrColumn {
    pub fn with_len(len: usize) -> Self {
        Self {
            offsets: vec![0; len],
            heap: vec![STR_NIL_BYTE, 0],
        }
    }

    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut col = Self::with_len(0);
        for v in values {
            col.offsets.push(0);
            let row = col.offsets.len() - 1;
            col.set(row, v);
        }
        col
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_nil(&self, row: usize) -> bool {
        self.heap[self.offsets[row] as usize] == STR_NIL_BYTE
    }

    /// The entry's bytes, nil entries included (sentinel byte for nil).
    fn raw(&self, row: usize) -> &[u8] {
        let start = self.offsets[row] as usize;
        let end = start
            + self.heap[start..]
                .iter()
                .position(|b| *b == 0)
                .unwrap_or(self.heap.len() - start);
        &self.heap[start..end]
    }

    pub fn get(&self, row: usize) -> Option<&str> {
        if self.is_nil(row) {
            return None;
        }
        // Entries are written from &str values, so they stay valid UTF-8.
        std::str::from_utf8(self.raw(row)).ok()
    }

    /// Writes `value` at `row`, appending its bytes to the heap.
    pub fn set(&mut self, row: usize, value: Option<&str>) {
        match value {
            None => self.offsets[row] = 0,
            Some(s) => {
                self.offsets[row] = self.heap.len() as u64;
                self.heap.extend_from_slice(s.as_bytes());
                self.heap.push(0);
            }
        }
    }

    /// Copies the entry at `src_row` of `src` into `row`.
    pub fn copy_from(&mut self, row: usize, src: &StrColumn, src_row: usize) {
        if src.is_nil(src_row) {
            self.offsets[row] = 0;
        } else {
            self.offsets[row] = self.heap.len() as u64;
            self.heap.extend_from_slice(src.raw(src_row));
            self.heap.push(0);
        }
    }

    pub(crate) fn heap(&self) -> &[u8] {
        &self.heap
    }

    pub(crate) fn offsets(&self) -> &[u64] {
        &self.offsets
    }
}

/// Opaque comparator over byte-encoded atoms, mirroring an atom table's
/// compare entry.
pub type AtomCmp = fn(&[u8], &[u8]) -> Ordering;

/// Generic fallback column: byte-encoded atoms of an arbitrary type, driven
/// entirely by an opaque comparator and a stored nil atom.
#[derive(Clone)]
pub struct OpaqueColumn {
    atoms: Vec<Box<[u8]>>,
    nil: Box<[u8]>,
    cmp: AtomCmp,
}

impl OpaqueColumn {
    pub fn new(atoms: Vec<Box<[u8]>>, nil: Box<[u8]>, cmp: AtomCmp) -> Self {
        Self { atoms, nil, cmp }
    }

    /// An output column shaped for `len` rows, nil-filled, sharing the
    /// source column's comparator and nil atom.
    pub fn like(other: &OpaqueColumn, len: usize) -> Self {
        Self {
            atoms: vec![other.nil.clone(); len],
            nil: other.nil.clone(),
            cmp: other.cmp,
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_nil(&self, row: usize) -> bool {
        (self.cmp)(&self.atoms[row], &self.nil) == Ordering::Equal
    }

    pub fn get(&self, row: usize) -> &[u8] {
        &self.atoms[row]
    }

    pub fn nil_atom(&self) -> &[u8] {
        &self.nil
    }

    pub fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        (self.cmp)(a, b)
    }

    pub fn set(&mut self, row: usize, atom: &[u8]) {
        self.atoms[row] = atom.into();
    }

    pub fn set_nil(&mut self, row: usize) {
        self.atoms[row] = self.nil.clone();
    }
}

impl fmt::Debug for OpaqueColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueColumn")
            .field("len", &self.atoms.len())
            .finish()
    }
}

/// Physical payload of a column. `Bool` rows are stored as `i8` with the
/// same nil sentinel as `I8`, matching the boundary-marker encoding.
#[derive(Clone, Debug)]
pub enum ColumnData {
    Bool(Vec<i8>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    I128(Vec<i128>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Str(StrColumn),
    Opaque(OpaqueColumn),
}

impl ColumnData {
    pub fn physical_type(&self) -> PhysicalType {
        match self {
            ColumnData::Bool(_) => PhysicalType::Bool,
            ColumnData::I8(_) => PhysicalType::I8,
            ColumnData::I16(_) => PhysicalType::I16,
            ColumnData::I32(_) => PhysicalType::I32,
            ColumnData::I64(_) => PhysicalType::I64,
            ColumnData::I128(_) => PhysicalType::I128,
            ColumnData::F32(_) => PhysicalType::F32,
            ColumnData::F64(_) => PhysicalType::F64,
            ColumnData::Str(_) => PhysicalType::Str,
            ColumnData::Opaque(_) => PhysicalType::Opaque,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Bool(v) | ColumnData::I8(v) => v.len(),
            ColumnData::I16(v) => v.len(),
            ColumnData::I32(v) => v.len(),
            ColumnData::I64(v) => v.len(),
            ColumnData::I128(v) => v.len(),
            ColumnData::F32(v) => v.len(),
            ColumnData::F64(v) => v.len(),
            ColumnData::Str(c) => c.len(),
            ColumnData::Opaque(c) => c.len(),
        }
    }
}

/// A dense typed column with nil-presence metadata.
///
/// Inputs are read-only for the duration of a call; the output column is
/// exclusively owned by the call, pre-sized by the caller to the input's row
/// count, and has its nil flags finalized on success.
#[derive(Clone, Debug)]
pub struct Column {
    pub data: ColumnData,
    nonil: bool,
    nils: bool,
}

impl Column {
    /// Wraps `data`, scanning it once to establish the nil flags.
    pub fn new(data: ColumnData) -> Self {
        let mut col = Self {
            data,
            nonil: false,
            nils: false,
        };
        let has = col.scan_nils();
        col.finish(has);
        col
    }

    /// A zero-filled output column of `ty` shaped for `len` rows, nil flags
    /// unset until `finish` runs. `Opaque` outputs must be built with
    /// [`Column::opaque_like`] instead (they need a comparator).
    pub fn for_output(ty: PhysicalType, len: usize) -> Self {
        let data = match ty {
            PhysicalType::Bool => ColumnData::Bool(vec![0; len]),
            PhysicalType::I8 => ColumnData::I8(vec![0; len]),
            PhysicalType::I16 => ColumnData::I16(vec![0; len]),
            PhysicalType::I32 => ColumnData::I32(vec![0; len]),
            PhysicalType::I64 => ColumnData::I64(vec![0; len]),
            PhysicalType::I128 => ColumnData::I128(vec![0; len]),
            PhysicalType::F32 => ColumnData::F32(vec![0.0; len]),
            PhysicalType::F64 => ColumnData::F64(vec![0.0; len]),
            PhysicalType::Str => ColumnData::Str(StrColumn::with_len(len)),
            PhysicalType::Opaque => {
                unreachable!("opaque outputs are built with Column::opaque_like")
            }
        };
        Self {
            data,
            nonil: false,
            nils: false,
        }
    }

    pub fn opaque_like(src: &OpaqueColumn, len: usize) -> Self {
        Self {
            data: ColumnData::Opaque(OpaqueColumn::like(src, len)),
            nonil: false,
            nils: false,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn physical_type(&self) -> PhysicalType {
        self.data.physical_type()
    }

    /// No nil can occur in this column.
    pub fn nonil(&self) -> bool {
        self.nonil
    }

    /// At least one nil is present.
    pub fn nils(&self) -> bool {
        self.nils
    }

    /// Finalizes the exclusive nil-flag pair.
    pub fn finish(&mut self, has_nils: bool) {
        self.nonil = !has_nils;
        self.nils = has_nils;
    }

    fn scan_nils(&self) -> bool {
        match &self.data {
            ColumnData::Bool(v) | ColumnData::I8(v) => v.iter().any(|x| *x == i8::MIN),
            ColumnData::I16(v) => v.iter().any(|x| *x == i16::MIN),
            ColumnData::I32(v) => v.iter().any(|x| *x == i32::MIN),
            ColumnData::I64(v) => v.iter().any(|x| *x == i64::MIN),
            ColumnData::I128(v) => v.iter().any(|x| *x == i128::MIN),
            ColumnData::F32(v) => v.iter().any(|x| *x == f32::MIN_POSITIVE),
            ColumnData::F64(v) => v.iter().any(|x| *x == f64::MIN_POSITIVE),
            ColumnData::Str(c) => (0..c.len()).any(|i| c.is_nil(i)),
            ColumnData::Opaque(c) => (0..c.len()).any(|i| c.is_nil(i)),
        }
    }
}

/// A single typed value, used for caller-supplied scalars (lag/lead
/// defaults). Nil is expressed through the type's sentinel, exactly as in
/// column storage; `Str(None)` is the string nil.
#[derive(Clone, Debug)]
pub enum ScalarValue {
    Bool(i8),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    F32(f32),
    F64(f64),
    Str(Option<String>),
    Opaque(Box<[u8]>),
}

impl ScalarValue {
    pub fn physical_type(&self) -> PhysicalType {
        match self {
            ScalarValue::Bool(_) => PhysicalType::Bool,
            ScalarValue::I8(_) => PhysicalType::I8,
            ScalarValue::I16(_) => PhysicalType::I16,
            ScalarValue::I32(_) => PhysicalType::I32,
            ScalarValue::I64(_) => PhysicalType::I64,
            ScalarValue::I128(_) => PhysicalType::I128,
            ScalarValue::F32(_) => PhysicalType::F32,
            ScalarValue::F64(_) => PhysicalType::F64,
            ScalarValue::Str(_) => PhysicalType::Str,
            ScalarValue::Opaque(_) => PhysicalType::Opaque,
        }
    }
}
