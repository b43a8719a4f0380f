//! Runtime values validated against descriptors at construction time.
//!
//! A value that would not match its descriptor is rejected before it exists,
//! so marshalling itself can never fail: by the time a byte image is
//! produced, count and types are already known to be right.

use itertools::izip;

use crate::{
    ArityMismatch, ArrayInfo, BufferSizeMismatch, FieldType, Primitive, PrimitiveType, StructInfo,
    ValueError,
};

/// A single scalar value tagged with its boundary type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarValue {
    /// An `i8` value.
    I8(i8),
    /// An `i16` value.
    I16(i16),
    /// An `i32` value.
    I32(i32),
    /// An `i64` value.
    I64(i64),
    /// A `u8` value.
    U8(u8),
    /// A `u16` value.
    U16(u16),
    /// A `u32` value.
    U32(u32),
    /// A `u64` value.
    U64(u64),
    /// An `f32` value.
    F32(f32),
    /// An `f64` value.
    F64(f64),
}

macro_rules! impl_scalar_value {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        impl ScalarValue {
            /// Returns the descriptor of this value's type.
            pub fn primitive(&self) -> Primitive {
                match self {
                    $(ScalarValue::$variant(_) => Primitive::$variant),+
                }
            }

            pub(crate) fn write_to(&self, buf: &mut Vec<u8>) {
                match *self {
                    $(ScalarValue::$variant(value) => value.write_ne_bytes(buf)),+
                }
            }

            pub(crate) fn read(primitive: Primitive, bytes: &[u8]) -> ScalarValue {
                match primitive {
                    $(Primitive::$variant => ScalarValue::$variant(<$ty>::read_ne_bytes(bytes))),+
                }
            }
        }

        $(
            impl From<$ty> for ScalarValue {
                fn from(value: $ty) -> Self {
                    ScalarValue::$variant(value)
                }
            }
        )+
    };
}

impl_scalar_value! {
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    F32 => f32,
    F64 => f64,
}

/// A validated fixed-array value: exactly as many elements as the descriptor
/// declares, all of the declared element type.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayValue {
    info: ArrayInfo,
    elements: Vec<ScalarValue>,
}

impl ArrayValue {
    /// Validates `elements` against `info` and builds the value.
    ///
    /// Supplying fewer or more than the declared number of elements fails
    /// with [`ArityMismatch`] and constructs nothing; a stray element type
    /// fails likewise.
    pub fn new(info: ArrayInfo, elements: Vec<ScalarValue>) -> Result<Self, ValueError> {
        if elements.len() != info.length() {
            return Err(ArityMismatch {
                expected: info.length(),
                found: elements.len(),
            }
            .into());
        }
        if let Some(element) = elements
            .iter()
            .find(|element| element.primitive() != info.element_type())
        {
            return Err(ValueError::ElementTypeMismatch {
                expected: info.element_type(),
                found: element.primitive(),
            });
        }
        Ok(ArrayValue { info, elements })
    }

    /// Builds an array value from plain Rust scalars.
    pub fn from_elements<T>(
        info: ArrayInfo,
        elements: impl IntoIterator<Item = T>,
    ) -> Result<Self, ValueError>
    where
        T: PrimitiveType + Into<ScalarValue>,
    {
        Self::new(info, elements.into_iter().map(Into::into).collect())
    }

    /// Returns the descriptor this value was validated against.
    pub fn info(&self) -> ArrayInfo {
        self.info
    }

    /// Returns the elements in order.
    pub fn elements(&self) -> &[ScalarValue] {
        &self.elements
    }

    fn write_to(&self, buf: &mut Vec<u8>) {
        for element in &self.elements {
            element.write_to(buf);
        }
    }

    fn read(info: ArrayInfo, bytes: &[u8]) -> ArrayValue {
        let size = info.element_type().size_in_bytes();
        let elements = (0..info.length())
            .map(|index| ScalarValue::read(info.element_type(), &bytes[index * size..]))
            .collect();
        ArrayValue { info, elements }
    }
}

/// A single field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A scalar field value.
    Scalar(ScalarValue),
    /// A fixed-size array field value.
    Array(ArrayValue),
}

impl Value {
    /// Returns the field type this value inhabits.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Scalar(scalar) => FieldType::Primitive(scalar.primitive()),
            Value::Array(array) => FieldType::Array(array.info()),
        }
    }

    fn write_to(&self, buf: &mut Vec<u8>) {
        match self {
            Value::Scalar(scalar) => scalar.write_to(buf),
            Value::Array(array) => array.write_to(buf),
        }
    }

    fn read(ty: FieldType, bytes: &[u8]) -> Value {
        match ty {
            FieldType::Primitive(primitive) => Value::Scalar(ScalarValue::read(primitive, bytes)),
            FieldType::Array(info) => Value::Array(ArrayValue::read(info, bytes)),
        }
    }
}

impl From<ScalarValue> for Value {
    fn from(value: ScalarValue) -> Self {
        Value::Scalar(value)
    }
}

impl From<ArrayValue> for Value {
    fn from(value: ArrayValue) -> Self {
        Value::Array(value)
    }
}

/// A fully-populated struct value, validated against its descriptor.
///
/// Every declared field must be supplied, in declaration order; no field is
/// optional. The value borrows its descriptor, so the descriptor outlives
/// every image produced from it.
#[derive(Clone, Debug, PartialEq)]
pub struct StructValue<'i> {
    info: &'i StructInfo,
    values: Vec<Value>,
}

impl<'i> StructValue<'i> {
    /// Validates `values` against `info` and builds the value.
    pub fn new(info: &'i StructInfo, values: Vec<Value>) -> Result<Self, ValueError> {
        if values.len() != info.fields().len() {
            return Err(ValueError::FieldCountMismatch {
                name: info.name().to_owned(),
                expected: info.fields().len(),
                found: values.len(),
            });
        }
        for (field, value) in izip!(info.fields(), &values) {
            if value.field_type() != field.ty() {
                return Err(ValueError::FieldTypeMismatch {
                    field: field.name().to_owned(),
                    expected: field.ty(),
                    found: value.field_type(),
                });
            }
        }
        Ok(StructValue { info, values })
    }

    /// Returns the descriptor this value was validated against.
    pub fn info(&self) -> &'i StructInfo {
        self.info
    }

    /// Returns the field values in declaration order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Marshals the value into its fixed-layout byte image.
    ///
    /// The image is exactly `info.size_in_bytes()` long. Alignment padding is
    /// zeroed, so equal values always produce byte-identical images.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.info.size_in_bytes());
        for (&offset, value) in izip!(self.info.field_offsets(), &self.values) {
            buf.resize(offset, 0);
            value.write_to(&mut buf);
        }
        buf.resize(self.info.size_in_bytes(), 0);
        buf
    }

    /// Reconstructs a value from the byte image produced by
    /// [`StructValue::to_bytes`], or by a symmetric native-side encoder.
    ///
    /// The image carries no length metadata, so the buffer must be exactly
    /// `info.size_in_bytes()` long.
    pub fn from_bytes(info: &'i StructInfo, bytes: &[u8]) -> Result<Self, BufferSizeMismatch> {
        if bytes.len() != info.size_in_bytes() {
            return Err(BufferSizeMismatch {
                expected: info.size_in_bytes(),
                found: bytes.len(),
            });
        }
        let values = izip!(info.fields(), info.field_offsets())
            .map(|(field, &offset)| Value::read(field.ty(), &bytes[offset..]))
            .collect();
        Ok(StructValue { info, values })
    }
}

#[cfg(test)]
mod tests {
    use super::{ArrayValue, ScalarValue, StructValue, Value};
    use crate::{
        ArityMismatch, ArrayInfo, FieldInfo, FieldType, Primitive, StructInfo, ValueError,
    };

    fn i32_array(length: usize) -> ArrayInfo {
        ArrayInfo::new(Primitive::I32, length).unwrap()
    }

    #[test]
    fn array_value_rejects_the_wrong_arity() {
        let err = ArrayValue::from_elements(i32_array(10), 0_i32..9).unwrap_err();
        assert_eq!(
            err,
            ValueError::Arity(ArityMismatch {
                expected: 10,
                found: 9
            })
        );

        let err = ArrayValue::from_elements(i32_array(10), 0_i32..11).unwrap_err();
        assert_eq!(
            err,
            ValueError::Arity(ArityMismatch {
                expected: 10,
                found: 11
            })
        );
    }

    #[test]
    fn array_value_rejects_a_stray_element_type() {
        let elements = vec![
            ScalarValue::I32(1),
            ScalarValue::U8(2),
            ScalarValue::I32(3),
        ];
        let err = ArrayValue::new(i32_array(3), elements).unwrap_err();
        assert_eq!(
            err,
            ValueError::ElementTypeMismatch {
                expected: Primitive::I32,
                found: Primitive::U8
            }
        );
    }

    #[test]
    fn struct_value_requires_every_field() {
        let info = StructInfo::new(
            "Pair",
            vec![
                FieldInfo::new("a", FieldType::Primitive(Primitive::I32)),
                FieldInfo::new("b", FieldType::Primitive(Primitive::I32)),
            ],
        );
        let err = StructValue::new(&info, vec![Value::Scalar(ScalarValue::I32(1))]).unwrap_err();
        assert!(matches!(err, ValueError::FieldCountMismatch { .. }));
    }

    #[test]
    fn struct_value_rejects_a_mistyped_field() {
        let info = StructInfo::new(
            "Tagged",
            vec![FieldInfo::new("tag", FieldType::Primitive(Primitive::U8))],
        );
        let err = StructValue::new(&info, vec![Value::Scalar(ScalarValue::I32(1))]).unwrap_err();
        assert!(matches!(
            err,
            ValueError::FieldTypeMismatch { field, .. } if field == "tag"
        ));
    }

    #[test]
    fn image_length_matches_the_descriptor() {
        let info = StructInfo::new(
            "Packet",
            vec![FieldInfo::new("values", FieldType::Array(i32_array(10)))],
        );
        let array = ArrayValue::from_elements(i32_array(10), 0_i32..10).unwrap();
        let value = StructValue::new(&info, vec![array.into()]).unwrap();
        assert_eq!(value.to_bytes().len(), info.size_in_bytes());
    }

    #[test]
    fn padding_is_zeroed_and_images_are_deterministic() {
        let info = StructInfo::new(
            "Mixed",
            vec![
                FieldInfo::new("tag", FieldType::Primitive(Primitive::U8)),
                FieldInfo::new("values", FieldType::Array(i32_array(2))),
            ],
        );
        let make = || {
            StructValue::new(
                &info,
                vec![
                    Value::Scalar(ScalarValue::U8(0xAA)),
                    ArrayValue::from_elements(i32_array(2), [1_i32, 2])
                        .unwrap()
                        .into(),
                ],
            )
            .unwrap()
        };

        let bytes = make().to_bytes();
        assert_eq!(bytes.len(), 12);
        assert_eq!(bytes[0], 0xAA);
        // Bytes 1..4 are alignment padding in front of the array field.
        assert_eq!(&bytes[1..4], &[0, 0, 0]);
        assert_eq!(bytes, make().to_bytes());
    }

    #[test]
    fn byte_image_round_trips_element_wise() {
        let info = StructInfo::new(
            "Sample",
            vec![
                FieldInfo::new("scale", FieldType::Primitive(Primitive::F64)),
                FieldInfo::new("values", FieldType::Array(i32_array(3))),
            ],
        );
        let original = StructValue::new(
            &info,
            vec![
                Value::Scalar(ScalarValue::F64(0.5)),
                ArrayValue::from_elements(i32_array(3), [-1_i32, 0, 1])
                    .unwrap()
                    .into(),
            ],
        )
        .unwrap();

        let decoded = StructValue::from_bytes(&info, &original.to_bytes()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn undersized_image_is_rejected() {
        let info = StructInfo::new(
            "Packet",
            vec![FieldInfo::new("values", FieldType::Array(i32_array(10)))],
        );
        let err = StructValue::from_bytes(&info, &[0; 39]).unwrap_err();
        assert_eq!(err.expected, 40);
        assert_eq!(err.found, 39);
    }
}
