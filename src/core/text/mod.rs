//! Text measurement helpers.

pub mod width;
