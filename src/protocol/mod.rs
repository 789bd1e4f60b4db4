//! CRP protocol handling.
//!
//! This module implements parsing and serialization for the CRP (Chain
//! Reaction Protocol) line interface, including BFEN position encoding and
//! the command parser for the main loop.

pub mod bfen;
pub mod parser;

pub use bfen::{encode_bfen, parse_bfen, BfenError, Position};
pub use parser::{parse_command, Command, NewGameParams};
