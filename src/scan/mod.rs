//! Text scanning primitives shared by every synthesizer

pub mod calls;
pub mod text;
pub mod tokenizer;

pub use calls::{CallSite, find_calls, find_matching_close, is_call_prefix};
pub use text::{extract_numeric, extract_string_literal, is_identifier};
pub use tokenizer::{SplitOptions, split_arguments};
