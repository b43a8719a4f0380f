//! The closed set of scalar types that may cross the native boundary.

use std::fmt;

/// A fixed-width, non-pointer scalar type whose layout is identical on both
/// sides of the native boundary.
///
/// Pointer-sized and platform-dependent types are deliberately absent: a
/// boundary contract is only unambiguous when every participating type has
/// one fixed width.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Primitive {
    /// 8-bit signed integer
    I8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 8-bit unsigned integer
    U8,
    /// 16-bit unsigned integer
    U16,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit unsigned integer
    U64,
    /// 32-bit IEEE-754 float
    F32,
    /// 64-bit IEEE-754 float
    F64,
}

impl Primitive {
    /// Returns the size of the type in bytes.
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Primitive::I8 | Primitive::U8 => 1,
            Primitive::I16 | Primitive::U16 => 2,
            Primitive::I32 | Primitive::U32 | Primitive::F32 => 4,
            Primitive::I64 | Primitive::U64 | Primitive::F64 => 8,
        }
    }

    /// Returns the alignment of the type in bytes.
    ///
    /// All supported targets use natural alignment for these types, so the
    /// alignment equals the size.
    pub const fn alignment(self) -> usize {
        self.size_in_bytes()
    }

    /// Returns the name of the type.
    pub const fn name(self) -> &'static str {
        match self {
            Primitive::I8 => "i8",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::U8 => "u8",
            Primitive::U16 => "u16",
            Primitive::U32 => "u32",
            Primitive::U64 => "u64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Rust scalar type with a [`Primitive`] descriptor and a native-endian
/// byte image.
pub trait PrimitiveType: Copy + PartialEq {
    /// The descriptor for this type.
    const PRIMITIVE: Primitive;

    /// Appends the native-endian byte image of `self` to `buf`.
    fn write_ne_bytes(self, buf: &mut Vec<u8>);

    /// Reads a value back from the start of a native-endian byte image.
    ///
    /// `bytes` must hold at least `size_of::<Self>()` bytes; callers check
    /// the full image size up front.
    fn read_ne_bytes(bytes: &[u8]) -> Self;
}

macro_rules! define_primitives {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl PrimitiveType for $ty {
                const PRIMITIVE: Primitive = Primitive::$variant;

                fn write_ne_bytes(self, buf: &mut Vec<u8>) {
                    buf.extend_from_slice(&self.to_ne_bytes());
                }

                fn read_ne_bytes(bytes: &[u8]) -> Self {
                    let mut image = [0u8; std::mem::size_of::<$ty>()];
                    image.copy_from_slice(&bytes[..std::mem::size_of::<$ty>()]);
                    <$ty>::from_ne_bytes(image)
                }
            }
        )+
    };
}

define_primitives! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

#[cfg(test)]
mod tests {
    use super::{Primitive, PrimitiveType};

    #[test]
    fn size_matches_the_rust_scalar() {
        assert_eq!(Primitive::I8.size_in_bytes(), std::mem::size_of::<i8>());
        assert_eq!(Primitive::I32.size_in_bytes(), std::mem::size_of::<i32>());
        assert_eq!(Primitive::U64.size_in_bytes(), std::mem::size_of::<u64>());
        assert_eq!(Primitive::F64.size_in_bytes(), std::mem::size_of::<f64>());
    }

    #[test]
    fn alignment_is_natural() {
        for primitive in [
            Primitive::I8,
            Primitive::I16,
            Primitive::I32,
            Primitive::I64,
            Primitive::F32,
            Primitive::F64,
        ] {
            assert_eq!(primitive.alignment(), primitive.size_in_bytes());
        }
    }

    #[test]
    fn byte_image_round_trips() {
        let mut buf = Vec::new();
        (-123_456_i32).write_ne_bytes(&mut buf);
        assert_eq!(buf.len(), 4);
        assert_eq!(i32::read_ne_bytes(&buf), -123_456);
    }

    #[test]
    fn display_uses_the_rust_name() {
        assert_eq!(Primitive::I32.to_string(), "i32");
        assert_eq!(Primitive::F64.to_string(), "f64");
    }
}
