//! Statement text generation
//!
//! - [`escape`] - identifier and string-literal escaping
//! - [`clause`] - the `WITH (...)` configuration clause
//! - [`statement`] - LIST / DESCRIBE / CREATE / ALTER / UPDATE / DROP / START / STOP / INSERT

pub mod clause;
pub mod escape;
pub mod statement;

pub use clause::{is_unquoted_key, keyword_bool, render_value, WithClause, UNQUOTED_KEYS};
pub use escape::{escape_identifier, escape_string_literal, unescape_string_literal};
