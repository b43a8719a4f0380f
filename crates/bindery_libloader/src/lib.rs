//! Loading native shared libraries and resolving declared bindings.
//!
//! A [`FunctionBinding`] is only a declaration; this crate turns it into
//! something invocable. Loading locates the library through the platform
//! loader, binding checks that the declared symbol actually exists, and the
//! resulting handle borrows the library so the resolved address can never
//! outlive the loaded object.
//!
//! What can go wrong here is exactly what the platform loader can report: a
//! library that cannot be found or loaded, and a symbol the library does not
//! export. Both are surfaced as distinct [`LoadError`] variants and neither
//! is worth retrying without an external state change. A declaration whose
//! signature differs from the native definition is *not* detectable at this
//! layer; it stays the declarer's contract.
#![warn(missing_docs)]

use std::{
    ffi::c_void,
    mem,
    path::{Path, PathBuf},
};

use bindery_abi::{FunctionBinding, LibraryName};
use bindery_target::Target;

/// An error that occurs while loading a library or resolving a symbol in it.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The shared library could not be located or loaded by the platform
    /// loader.
    #[error("failed to load shared library `{name}`: {source}")]
    LibraryNotFound {
        /// The file name that was passed to the platform loader.
        name: String,
        /// The loader's own report.
        #[source]
        source: libloading::Error,
    },

    /// The library loaded, but does not export the requested symbol.
    #[error("shared library does not export symbol `{symbol}`: {source}")]
    SymbolNotFound {
        /// The symbol that was requested.
        symbol: String,
        /// The loader's own report.
        #[source]
        source: libloading::Error,
    },
}

/// A loaded native shared library.
///
/// Whether concurrent calls into the library are allowed is the library's
/// own contract; nothing here adds synchronization. Each by-value call
/// parameter is an independent copy, so the parameter data itself is never
/// shared between concurrent calls.
#[derive(Debug)]
pub struct NativeLibrary {
    library: libloading::Library,
    name: String,
}

impl NativeLibrary {
    /// Loads a library by its bare name.
    ///
    /// The name is decorated with the host platform's prefix and extension
    /// (`interop` becomes `libinterop.so` on Linux) and located through the
    /// platform's library search path.
    ///
    /// # Safety
    ///
    /// When a library is loaded, initialisation routines contained within it
    /// are executed. For the purposes of safety, the execution of these
    /// routines is conceptually the same as calling an unknown foreign
    /// function and may impose arbitrary requirements on the caller for the
    /// call to be sound. The same holds for termination routines executed
    /// when the library is unloaded. See [`libloading::Library::new`].
    pub unsafe fn load(name: &LibraryName) -> Result<Self, LoadError> {
        let filename = Target::host().library_filename(name.as_str());
        Self::load_from_path(&PathBuf::from(filename))
    }

    /// Loads a library from an explicit path, bypassing platform name
    /// decoration.
    ///
    /// # Safety
    ///
    /// See [`NativeLibrary::load`].
    pub unsafe fn load_from_path(path: &Path) -> Result<Self, LoadError> {
        let name = path.display().to_string();
        let library = libloading::Library::new(path).map_err(|source| {
            LoadError::LibraryNotFound {
                name: name.clone(),
                source,
            }
        })?;
        log::debug!("loaded shared library `{name}`");
        Ok(NativeLibrary { library, name })
    }

    /// Returns the name the library was loaded under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves a declared binding to an invocable handle.
    ///
    /// Resolution only checks that the symbol exists; whether its native
    /// signature matches the declaration cannot be checked here and remains
    /// the declaration's contract.
    pub fn bind<'l>(
        &'l self,
        binding: &'l FunctionBinding,
    ) -> Result<BoundFunction<'l>, LoadError> {
        // Safety: the symbol is only read as an address here; calling it is
        // gated behind `BoundFunction::as_fn`.
        let symbol: libloading::Symbol<'_, unsafe extern "C" fn()> = unsafe {
            self.library.get(binding.symbol().as_bytes())
        }
        .map_err(|source| LoadError::SymbolNotFound {
            symbol: binding.symbol().to_owned(),
            source,
        })?;
        log::debug!(
            "resolved `{}` in shared library `{}`",
            binding.qualified_symbol(),
            self.name
        );

        Ok(BoundFunction {
            library: self,
            binding,
            fn_ptr: *symbol as *const c_void,
        })
    }

    /// Returns the typed symbol with the given name.
    ///
    /// # Safety
    ///
    /// The loaded symbol carries no type information, so `T` must match the
    /// native definition exactly; using a mismatched type is undefined
    /// behavior. See [`libloading::Library::get`].
    pub unsafe fn symbol<T>(&self, name: &str) -> Result<libloading::Symbol<'_, T>, LoadError> {
        self.library
            .get(name.as_bytes())
            .map_err(|source| LoadError::SymbolNotFound {
                symbol: name.to_owned(),
                source,
            })
    }
}

/// An invocable handle to a resolved native entry point.
///
/// The handle borrows both the library and the declaration it was resolved
/// from, so it can never outlive either.
#[derive(Debug)]
pub struct BoundFunction<'l> {
    library: &'l NativeLibrary,
    binding: &'l FunctionBinding,
    fn_ptr: *const c_void,
}

impl<'l> BoundFunction<'l> {
    /// Returns the library the handle was resolved in.
    pub fn library(&self) -> &'l NativeLibrary {
        self.library
    }

    /// Returns the declaration this handle was resolved from.
    pub fn binding(&self) -> &'l FunctionBinding {
        self.binding
    }

    /// Returns the resolved address.
    pub fn fn_ptr(&self) -> *const c_void {
        self.fn_ptr
    }

    /// Reinterprets the resolved address as a concrete Rust function type.
    ///
    /// Struct parameters are passed by value: the callee receives a copy of
    /// the full fixed-layout byte image, never a pointer into the caller's
    /// storage.
    ///
    /// # Safety
    ///
    /// `F` must be a function pointer type (`extern "C" fn(..)`) that
    /// matches the native definition exactly. A mismatch between `F`, the
    /// declaration, and the native side is undefined behavior at call time;
    /// none of the three can be checked against each other here. Invoking
    /// the function may have arbitrary side effects in the native library.
    pub unsafe fn as_fn<F: Copy>(&self) -> F {
        mem::transmute_copy::<*const c_void, F>(&self.fn_ptr)
    }
}
