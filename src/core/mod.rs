//! Format-independent building blocks: FILETIME conversion, the quoted-value
//! newline codec, and the .hst lexing primitives.

pub mod filetime;
pub mod lexer;
pub mod lines;
