/// Annotation synthesis for Garry's Mod Lua sources
pub mod annotate;
pub mod binder;
pub mod config;
pub mod context;
pub mod diff;
pub mod error;
pub mod fs;
pub mod io;
pub mod scan;
pub mod scope;
pub mod synth;

// Explicit exports for better API clarity
pub use annotate::{annotate, annotate_file};
pub use binder::{BindReport, SyntaxTree, TreeCall, bind, bind_file};
pub use config::Settings;
pub use context::AnnotatorContext;
pub use diff::{TextEdit, apply_edits};
pub use error::{AnnotateError, AnnotateResult, ConfigError, ConfigResult};
pub use fs::{DiskFs, MemoryFs, SourceFs};
