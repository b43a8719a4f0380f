//! Declarations of entry points in native shared libraries.

use std::fmt;

use itertools::Itertools;

use crate::{InvalidLibraryName, ModulePath, StructInfo};

/// A platform-independent shared-library identifier: the bare name, without
/// path or extension. Decorating it into a platform file name (`lib….so`,
/// `….dll`, `lib….dylib`) is the loader's concern.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LibraryName(String);

impl LibraryName {
    /// Validates and creates a library name.
    ///
    /// Path separators and platform library extensions (`.so`, `.dll`,
    /// `.dylib`, including versioned forms like `.so.6`) are rejected so
    /// the same declaration resolves on every platform. Other dots, as in
    /// `foo2.5`, are part of the name.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidLibraryName> {
        let name = name.into();
        let has_extension = name
            .split('.')
            .skip(1)
            .any(|segment| matches!(segment, "so" | "dll" | "dylib"));
        if name.is_empty() || name.contains(['/', '\\']) || has_extension {
            return Err(InvalidLibraryName { name });
        }
        Ok(LibraryName(name))
    }

    /// Returns the bare name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a parameter crosses the native boundary.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParamType {
    /// The full fixed-layout byte image of a struct is copied into the call
    /// frame. The callee owns its copy and never aliases the caller's
    /// storage.
    Struct(StructInfo),
}

impl ParamType {
    /// Returns the number of bytes the parameter occupies.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            ParamType::Struct(info) => info.size_in_bytes(),
        }
    }

    /// Returns the parameter's alignment in bytes.
    pub fn alignment(&self) -> usize {
        match self {
            ParamType::Struct(info) => info.alignment(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Struct(info) => f.write_str(info.name()),
        }
    }
}

/// The declared return type of a binding.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ReturnType {
    /// The function returns nothing.
    #[default]
    Unit,
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Unit => f.write_str("()"),
        }
    }
}

/// A declared entry point in a native shared library.
///
/// The declaration asserts that `symbol` exists in `library` with exactly
/// this signature under the platform C calling convention. That assertion
/// cannot be checked here: a mismatch with the native side is undefined
/// behavior at call time, so keeping the declaration in sync is the
/// declarer's contract. Missing libraries and missing symbols, by contrast,
/// do surface as distinct errors when the binding is resolved.
///
/// Calling the function requires a fully-populated value for every declared
/// parameter; no parameter is optional.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionBinding {
    library: LibraryName,
    module: ModulePath,
    symbol: String,
    param_types: Vec<ParamType>,
    return_type: ReturnType,
}

impl FunctionBinding {
    /// Declares a binding at the root scope.
    pub fn new(
        library: LibraryName,
        symbol: impl Into<String>,
        param_types: Vec<ParamType>,
    ) -> Self {
        FunctionBinding {
            library,
            module: ModulePath::root(),
            symbol: symbol.into(),
            param_types,
            return_type: ReturnType::Unit,
        }
    }

    /// Moves the declaration into a grouping scope.
    ///
    /// This changes only how calling code refers to the binding; the native
    /// symbol, the parameter layout, and the call signature are untouched.
    pub fn in_module(mut self, module: ModulePath) -> Self {
        self.module = module;
        self
    }

    /// Returns the library the symbol lives in.
    pub fn library(&self) -> &LibraryName {
        &self.library
    }

    /// Returns the grouping scope of the declaration.
    pub fn module(&self) -> &ModulePath {
        &self.module
    }

    /// Returns the native symbol name, exactly as exported by the library.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the declared parameter types in call order.
    pub fn param_types(&self) -> &[ParamType] {
        &self.param_types
    }

    /// Returns the declared return type.
    pub fn return_type(&self) -> ReturnType {
        self.return_type
    }

    /// Returns the path calling code uses to refer to this binding. Purely
    /// referential; the native side only ever sees [`Self::symbol`].
    pub fn qualified_symbol(&self) -> String {
        self.module.qualify(&self.symbol)
    }
}

impl fmt::Display for FunctionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fn {}({})",
            self.qualified_symbol(),
            self.param_types.iter().map(ToString::to_string).join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{FunctionBinding, LibraryName, ParamType};
    use crate::{ArrayInfo, FieldInfo, FieldType, ModulePath, Primitive, StructInfo};

    fn packet() -> StructInfo {
        StructInfo::new(
            "Packet",
            vec![FieldInfo::new(
                "values",
                FieldType::Array(ArrayInfo::new(Primitive::I32, 10).unwrap()),
            )],
        )
    }

    #[test]
    fn library_name_rejects_paths_and_extensions() {
        assert!(LibraryName::new("interop").is_ok());
        assert!(LibraryName::new("").is_err());
        assert!(LibraryName::new("interop.dll").is_err());
        assert!(LibraryName::new("libinterop.so").is_err());
        assert!(LibraryName::new("libinterop.so.6").is_err());
        assert!(LibraryName::new("native/interop").is_err());
        assert!(LibraryName::new(r"native\interop").is_err());
    }

    #[test]
    fn library_name_keeps_version_style_dots() {
        assert!(LibraryName::new("interop2.5").is_ok());
        assert!(LibraryName::new("so").is_ok());
    }

    #[test]
    fn binding_displays_its_signature() {
        let binding = FunctionBinding::new(
            LibraryName::new("interop").unwrap(),
            "root",
            vec![ParamType::Struct(packet())],
        );
        assert_eq!(binding.to_string(), "fn root(Packet)");
    }

    #[test]
    fn module_scope_changes_only_the_reference_path() {
        let plain = FunctionBinding::new(
            LibraryName::new("interop").unwrap(),
            "root",
            vec![ParamType::Struct(packet())],
        );
        let nested = plain
            .clone()
            .in_module(ModulePath::from("fixtures::interop"));

        assert_eq!(plain.qualified_symbol(), "root");
        assert_eq!(nested.qualified_symbol(), "fixtures::interop::root");

        // Everything the native side can observe is identical.
        assert_eq!(plain.symbol(), nested.symbol());
        assert_eq!(plain.param_types(), nested.param_types());
        assert_eq!(plain.return_type(), nested.return_type());
    }
}
