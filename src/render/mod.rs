//! Rendering pipeline.

pub mod frame;

pub use frame::{message_header, Frame};
