//! Struct descriptors and their fixed layout.

use std::fmt;

use itertools::Itertools;

use crate::{ArrayInfo, Primitive};

/// The type of a single struct field.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldType {
    /// A fixed-width scalar.
    Primitive(Primitive),
    /// A fixed-size array; the element count is part of the contract.
    Array(ArrayInfo),
}

impl FieldType {
    /// Returns the serialized size of the field in bytes.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            FieldType::Primitive(primitive) => primitive.size_in_bytes(),
            FieldType::Array(array) => array.byte_len(),
        }
    }

    /// Returns the alignment of the field in bytes.
    pub fn alignment(&self) -> usize {
        match self {
            FieldType::Primitive(primitive) => primitive.alignment(),
            FieldType::Array(array) => array.alignment(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Primitive(primitive) => primitive.fmt(f),
            FieldType::Array(array) => array.fmt(f),
        }
    }
}

/// A named, typed struct field.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldInfo {
    name: String,
    ty: FieldType,
}

impl FieldInfo {
    /// Creates a field declaration.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        FieldInfo {
            name: name.into(),
            ty,
        }
    }

    /// Returns the field's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field's type.
    pub fn ty(&self) -> FieldType {
        self.ty
    }
}

/// Describes a struct with a fixed layout shared with the native side.
///
/// Field offsets, the struct alignment, and the total size are computed once
/// at construction using the platform C layout rules: each field starts at
/// its offset aligned up to the field's alignment and the total size is
/// padded to a multiple of the struct's alignment. The same fields always
/// produce the same numbers.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StructInfo {
    name: String,
    fields: Vec<FieldInfo>,
    field_offsets: Vec<usize>,
    size_in_bytes: usize,
    alignment: usize,
}

impl StructInfo {
    /// Creates a struct descriptor and computes its layout.
    pub fn new(name: impl Into<String>, fields: Vec<FieldInfo>) -> Self {
        let mut field_offsets = Vec::with_capacity(fields.len());
        let mut offset = 0;
        let mut alignment = 1;
        for field in &fields {
            let field_alignment = field.ty().alignment();
            offset = align_up(offset, field_alignment);
            field_offsets.push(offset);
            offset += field.ty().size_in_bytes();
            alignment = alignment.max(field_alignment);
        }

        StructInfo {
            name: name.into(),
            fields,
            field_offsets,
            size_in_bytes: align_up(offset, alignment),
            alignment,
        }
    }

    /// Returns the struct's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the struct's fields in declaration order.
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Returns the offset of each field relative to the start of the struct.
    pub fn field_offsets(&self) -> &[usize] {
        &self.field_offsets
    }

    /// Returns the total size of the struct in bytes, padding included.
    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }

    /// Returns the alignment of the struct in bytes.
    pub fn alignment(&self) -> usize {
        self.alignment
    }
}

impl fmt::Display for StructInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "struct {} {{ {} }}",
            self.name,
            self.fields
                .iter()
                .map(|field| format!("{}: {}", field.name(), field.ty()))
                .join(", ")
        )
    }
}

// All alignments here are powers of two.
fn align_up(offset: usize, alignment: usize) -> usize {
    (offset + alignment - 1) & !(alignment - 1)
}
