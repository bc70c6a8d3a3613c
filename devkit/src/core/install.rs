//! Naming rules for installed library artifacts.

/// Subdirectory of the install lib dir that is never copied as a library.
pub const PKGCONFIG_DIR: &str = "pkgconfig";

/// Whether an entry of the install lib dir is a library artifact.
pub fn is_library_entry(name: &str) -> bool {
    name != PKGCONFIG_DIR
}

/// `remi` -> `remi.pc`
pub fn pkgconfig_file_name(library: &str) -> String {
    format!("{library}.pc")
}
