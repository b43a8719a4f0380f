//! Descriptors for binary interface contracts with native shared libraries.
//!
//! A boundary contract has two halves: the layout of the data that crosses
//! it, and the entry points it crosses into. This crate models both without
//! touching a loader. [`StructInfo`] describes a fixed-layout struct whose
//! fields are fixed-width scalars or fixed-size arrays ([`ArrayInfo`],
//! [`FixedArray`]); [`StructValue`] validates runtime values against such a
//! descriptor at construction time and marshals them to and from the exact
//! byte image the native side expects. [`FunctionBinding`] declares an entry
//! point in a shared library, optionally grouped under a [`ModulePath`] that
//! affects nothing but the reference path.
//!
//! Everything here is a pure data declaration: descriptors have no side
//! effects and every failure is a local, recoverable construction error.
#![warn(missing_docs)]

mod array;
mod error;
mod function_info;
mod path;
mod primitive;
mod struct_info;
mod value;

pub use array::{ArrayInfo, FixedArray};
pub use error::{
    ArityMismatch, BufferSizeMismatch, InvalidLibraryName, ValueError, ZeroLengthArray,
};
pub use function_info::{FunctionBinding, LibraryName, ParamType, ReturnType};
pub use path::ModulePath;
pub use primitive::{Primitive, PrimitiveType};
pub use struct_info::{FieldInfo, FieldType, StructInfo};
pub use value::{ArrayValue, ScalarValue, StructValue, Value};
