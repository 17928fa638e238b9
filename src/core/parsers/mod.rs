//! Parsers for translation sources.
//!
//! - `json`: locale message files (`messages/<locale>.json`) flattened into
//!   a [`TranslationKeyMap`](crate::core::TranslationKeyMap)

pub mod json;
