// Adapters layer: concrete implementations for external systems.

pub mod d64;

pub use d64::{D64Image, D64Reader};
