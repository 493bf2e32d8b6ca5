//! Typed raw buffer module
//!
//! This module provides the strided, ownership-aware 3-D sample buffer that
//! every stage of the decode pipeline reads from and writes into.

mod buffer;
mod sample;
pub mod types;


pub use buffer::RawArray;
pub use sample::Sample;
pub use types::{BayerColor, ColorLayout, ElementType};
