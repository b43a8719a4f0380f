//! Platform facts needed to locate native shared libraries.
//!
//! A binding declaration names a library by its bare identifier; how that
//! identifier maps to a file name is a property of the operating system's
//! dynamic loader, collected here so nothing else has to know about it.
#![warn(missing_docs)]

/// Shared-library naming conventions of a target platform.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Target {
    /// String prepended to the bare library name. "lib" on Unix-likes,
    /// empty on Windows.
    pub dll_prefix: &'static str,
    /// File extension appended to the bare library name, including the dot.
    pub dll_suffix: &'static str,
}

impl Target {
    /// Returns the target the current process runs on.
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            Target {
                dll_prefix: "",
                dll_suffix: ".dll",
            }
        } else if cfg!(target_os = "macos") {
            Target {
                dll_prefix: "lib",
                dll_suffix: ".dylib",
            }
        } else {
            Target {
                dll_prefix: "lib",
                dll_suffix: ".so",
            }
        }
    }

    /// Decorates a bare library name into the platform file name, e.g.
    /// `interop` becomes `libinterop.so` on Linux and `interop.dll` on
    /// Windows.
    pub fn library_filename(&self, name: &str) -> String {
        format!("{}{}{}", self.dll_prefix, name, self.dll_suffix)
    }
}
