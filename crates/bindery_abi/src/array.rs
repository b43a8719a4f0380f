//! The fixed-array marshalling descriptor.
//!
//! A fixed-size array field is laid out as `length` contiguous elements with
//! no length prefix and no terminator: the count is part of the contract,
//! never of the transmitted data. This is what a native side with a
//! statically sized struct expects; its calling convention has no room for
//! an implicit length field.

use std::{fmt, mem, ops::Deref};

use crate::{ArityMismatch, BufferSizeMismatch, Primitive, PrimitiveType, ZeroLengthArray};

/// Describes a struct field holding a fixed number of scalar elements.
///
/// The serialized size of such a field is always
/// `length * element size`, regardless of how many elements are logically
/// "in use".
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArrayInfo {
    element_type: Primitive,
    length: usize,
}

impl ArrayInfo {
    /// Creates an array descriptor.
    ///
    /// The length sizes a fixed buffer on the native side and must be
    /// positive; a zero length is rejected.
    pub fn new(element_type: Primitive, length: usize) -> Result<Self, ZeroLengthArray> {
        if length == 0 {
            return Err(ZeroLengthArray);
        }
        Ok(ArrayInfo {
            element_type,
            length,
        })
    }

    /// Returns the array's element type.
    pub fn element_type(&self) -> Primitive {
        self.element_type
    }

    /// Returns the declared number of elements.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the serialized size of the field in bytes.
    pub fn byte_len(&self) -> usize {
        self.length * self.element_type.size_in_bytes()
    }

    /// Returns the alignment of the field, which is its element's alignment.
    pub fn alignment(&self) -> usize {
        self.element_type.alignment()
    }
}

impl fmt::Display for ArrayInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}; {}]", self.element_type, self.length)
    }
}

/// A by-value array whose element count is part of the type.
///
/// With the count in the type, supplying the wrong number of elements is a
/// compile error; [`FixedArray::from_slice`] is the constructor-time check
/// for callers that only have a slice. Values are read-only once built.
///
/// The count must be positive, just as [`ArrayInfo::new`] requires; here
/// that is checked per instantiation, at compile time:
///
/// ```compile_fail
/// use bindery_abi::FixedArray;
///
/// // A zero-length array has no fixed buffer to describe.
/// let empty = FixedArray::<i32, 0>::new([]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(transparent)]
pub struct FixedArray<T: PrimitiveType, const N: usize> {
    elements: [T; N],
}

impl<T: PrimitiveType, const N: usize> FixedArray<T, N> {
    // Referenced from every construction and descriptor path, so a zero `N`
    // is rejected at compile time exactly where `ArrayInfo::new` would
    // reject it at runtime.
    const POSITIVE_LENGTH: () = assert!(N > 0, "a fixed-size array must have a positive length");

    /// The serialized size of the array in bytes.
    pub const BYTE_LEN: usize = N * mem::size_of::<T>();

    /// Creates an array from exactly `N` elements.
    pub fn new(elements: [T; N]) -> Self {
        let () = Self::POSITIVE_LENGTH;
        FixedArray { elements }
    }

    /// Creates an array from a slice, checking the element count.
    ///
    /// Fails with [`ArityMismatch`] when the slice does not hold exactly `N`
    /// elements; no value is constructed in that case.
    pub fn from_slice(elements: &[T]) -> Result<Self, ArityMismatch> {
        let () = Self::POSITIVE_LENGTH;
        let elements: [T; N] = elements.try_into().map_err(|_| ArityMismatch {
            expected: N,
            found: elements.len(),
        })?;
        Ok(FixedArray { elements })
    }

    /// Returns the runtime descriptor of this array type.
    pub fn descriptor() -> ArrayInfo {
        let () = Self::POSITIVE_LENGTH;
        ArrayInfo {
            element_type: T::PRIMITIVE,
            length: N,
        }
    }

    /// Returns the elements.
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Appends the native-endian byte image of the array to `buf`: `N`
    /// contiguous elements, no length prefix.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        for element in self.elements.iter().copied() {
            element.write_ne_bytes(buf);
        }
    }

    /// Returns the byte image of the array, exactly [`Self::BYTE_LEN`] bytes
    /// long.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::BYTE_LEN);
        self.write_to(&mut buf);
        buf
    }

    /// Reconstructs an array from the byte image produced by
    /// [`FixedArray::to_bytes`].
    ///
    /// The image carries no length metadata, so the buffer must be exactly
    /// [`Self::BYTE_LEN`] bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BufferSizeMismatch> {
        let () = Self::POSITIVE_LENGTH;
        if bytes.len() != Self::BYTE_LEN {
            return Err(BufferSizeMismatch {
                expected: Self::BYTE_LEN,
                found: bytes.len(),
            });
        }
        let size = mem::size_of::<T>();
        let elements = std::array::from_fn(|index| T::read_ne_bytes(&bytes[index * size..]));
        Ok(FixedArray { elements })
    }
}

impl<T: PrimitiveType, const N: usize> Deref for FixedArray<T, N> {
    type Target = [T; N];

    fn deref(&self) -> &Self::Target {
        &self.elements
    }
}

impl<T: PrimitiveType, const N: usize> From<[T; N]> for FixedArray<T, N> {
    fn from(elements: [T; N]) -> Self {
        FixedArray::new(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::{ArrayInfo, FixedArray};
    use crate::{ArityMismatch, BufferSizeMismatch, Primitive, ZeroLengthArray};

    #[test]
    fn descriptor_byte_len_is_count_times_element_size() {
        let info = ArrayInfo::new(Primitive::I32, 10).unwrap();
        assert_eq!(info.byte_len(), 40);
        assert_eq!(info.alignment(), 4);
    }

    #[test]
    fn zero_length_descriptor_is_rejected() {
        assert_eq!(ArrayInfo::new(Primitive::I32, 0), Err(ZeroLengthArray));
    }

    #[test]
    fn from_slice_checks_the_element_count() {
        let short = FixedArray::<i32, 10>::from_slice(&[0; 9]);
        assert_eq!(
            short,
            Err(ArityMismatch {
                expected: 10,
                found: 9
            })
        );

        let long = FixedArray::<i32, 10>::from_slice(&[0; 11]);
        assert_eq!(
            long,
            Err(ArityMismatch {
                expected: 10,
                found: 11
            })
        );

        let exact = FixedArray::<i32, 10>::from_slice(&[7; 10]).unwrap();
        assert_eq!(exact.as_slice(), &[7; 10]);
    }

    #[test]
    fn byte_image_has_no_length_prefix() {
        let array = FixedArray::new([1_i16, 2, 3]);
        let bytes = array.to_bytes();
        assert_eq!(bytes.len(), FixedArray::<i16, 3>::BYTE_LEN);
        assert_eq!(bytes.len(), 6);
    }

    #[test]
    fn equal_arrays_serialize_identically() {
        let lhs = FixedArray::new([4_u32, 5, 6, 7]);
        let rhs = FixedArray::new([4_u32, 5, 6, 7]);
        assert_eq!(lhs.to_bytes(), rhs.to_bytes());
    }

    #[test]
    fn byte_image_round_trips_element_wise() {
        let array = FixedArray::new([-1_i64, 0, 1, i64::MAX]);
        let decoded = FixedArray::<i64, 4>::from_bytes(&array.to_bytes()).unwrap();
        assert_eq!(decoded, array);
    }

    #[test]
    fn truncated_image_is_rejected() {
        let bytes = FixedArray::new([1_i32, 2]).to_bytes();
        assert_eq!(
            FixedArray::<i32, 2>::from_bytes(&bytes[..7]),
            Err(BufferSizeMismatch {
                expected: 8,
                found: 7
            })
        );
    }

    #[test]
    fn typed_descriptor_matches_the_runtime_descriptor() {
        assert_eq!(
            FixedArray::<i32, 10>::descriptor(),
            ArrayInfo::new(Primitive::I32, 10).unwrap()
        );
    }

    #[test]
    fn typed_descriptor_passes_runtime_validation() {
        // Whatever the typed layer emits must be accepted by the validated
        // runtime constructor; zero lengths are unrepresentable on the typed
        // layer to begin with.
        let info = FixedArray::<u8, 1>::descriptor();
        assert_eq!(ArrayInfo::new(info.element_type(), info.length()), Ok(info));
    }
}
