//! # rlox
//!
//! A single-pass bytecode compiler and stack-based virtual machine for a
//! small dynamically-typed expression language (the Lox arithmetic /
//! boolean / string subset).
//!
//! A program is a single expression. Source is scanned into tokens
//! ([`scanner`]), parsed by a Pratt-style precedence climber that emits
//! bytecode directly into a [`chunk::Chunk`] with no intervening AST
//! ([`compiler`]), and executed on a stack machine with tagged
//! [`value::Value`]s and an interned string table ([`vm`], [`table`],
//! [`object`]).

pub mod chunk;
pub mod compiler;
pub mod debug;
pub mod memory;
pub mod object;
pub mod scanner;
pub mod table;
pub mod value;
pub mod vm;
