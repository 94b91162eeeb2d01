//! # notag-go
//!
//! Go front end for notag.
//!
//! Parses Go sources with Tree-sitter and feeds them to the language-agnostic
//! engine in `notag-core`:
//!
//! - [`GoFile`]: a parsed file, implementing `SyntaxTree`
//! - [`PackageLoader`]: discovers files and groups them into [`GoPackage`]s
//! - [`ModuleResolver`]: import paths from the nearest `go.mod`
//! - [`check_packages`]: runs an `Analyzer` over loaded packages

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod check;
pub mod error;
pub mod loader;
pub mod module;
pub mod parser;

pub use check::check_packages;
pub use error::GoError;
pub use loader::{GoPackage, PackageLoader};
pub use module::{parse_module_path, GoModule, ModuleResolver};
pub use parser::GoFile;
