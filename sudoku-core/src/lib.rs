#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod board;
pub mod error;

pub use crate::board::{Board, Conflict, UnitKind};
pub use crate::error::BoardError;
