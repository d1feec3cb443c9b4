//! In-memory worksheet model: cells, rows, sheets and conditional formatting.

mod cell;
mod conditional;
mod sheet;

pub use cell::*;
pub use conditional::*;
pub use sheet::*;
