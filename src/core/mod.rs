//! Terminal and text primitives.

pub mod terminal;
pub mod text;
