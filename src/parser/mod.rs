//! Parsing of `--tokens` entries.

mod token_spec;

pub use token_spec::{parse_token_specs, TokenSource, TokenSpec, DEFAULT_BOOK};
