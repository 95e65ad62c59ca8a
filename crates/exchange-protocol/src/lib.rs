//! exchange-protocol
//!
//! Line-level encoding/decoding for the brokerage.
//!
//! This crate turns client text lines into [`Command`]s and renders
//! logical exchange events (`exchange_core::OutputMessage`) as the
//! plain-text notifications traders read.
//!
//! - [`text_codec`] : comma-separated commands and notification text

pub mod text_codec;

pub use text_codec::{format_output, format_quote, parse_command, Command, ParseError};
