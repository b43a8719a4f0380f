//! Construction-time failures of the descriptor and value layers.
//!
//! Everything here is local and recoverable: a rejected construction builds
//! no value, and nothing reaches the native boundary.

use thiserror::Error;

use crate::{FieldType, Primitive};

/// The error produced when a fixed-size sequence is constructed with the
/// wrong number of elements.
///
/// The element count is part of the contract, so this is rejected before a
/// value exists and long before any native call is made.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("expected exactly {expected} elements, found {found}")]
pub struct ArityMismatch {
    /// The element count the descriptor declares.
    pub expected: usize,
    /// The element count that was supplied.
    pub found: usize,
}

/// The error produced when an array descriptor is declared with a length of
/// zero. The length sizes a fixed buffer on the native side and must be a
/// positive constant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("a fixed-size array must have a positive length")]
pub struct ZeroLengthArray;

/// The error produced when a byte image has a different size than the
/// descriptor it is decoded against. A fixed-layout image carries no length
/// metadata, so the size must match exactly.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("expected a byte image of exactly {expected} bytes, found {found}")]
pub struct BufferSizeMismatch {
    /// The image size the descriptor requires.
    pub expected: usize,
    /// The size of the buffer that was supplied.
    pub found: usize,
}

/// An error that occurs while validating a runtime value against a
/// descriptor. All variants are construction-time failures: no value is
/// built and nothing crosses the boundary.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValueError {
    /// The wrong number of elements for a fixed-size array.
    #[error(transparent)]
    Arity(#[from] ArityMismatch),

    /// An array element of a different scalar type than the descriptor
    /// declares.
    #[error("expected element type `{expected}`, found `{found}`")]
    ElementTypeMismatch {
        /// The declared element type.
        expected: Primitive,
        /// The type of the offending element.
        found: Primitive,
    },

    /// A struct value with a different number of field values than the
    /// descriptor has fields. Every field must be populated; none is
    /// optional.
    #[error("struct `{name}` declares {expected} fields, {found} values were supplied")]
    FieldCountMismatch {
        /// The struct name.
        name: String,
        /// The number of declared fields.
        expected: usize,
        /// The number of supplied values.
        found: usize,
    },

    /// A field value whose type differs from the field's declaration.
    #[error("field `{field}` is declared as `{expected}`, found a value of type `{found}`")]
    FieldTypeMismatch {
        /// The field name.
        field: String,
        /// The declared field type.
        expected: FieldType,
        /// The type of the supplied value.
        found: FieldType,
    },
}

/// The error produced when a shared-library identifier is not a bare name.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("`{name}` is not a bare library name; pass the name without path or extension")]
pub struct InvalidLibraryName {
    /// The rejected identifier.
    pub name: String,
}
