//! Audio decoding, assembly and encoding.

pub mod assembler;
pub mod clip;
pub mod decode;
pub mod encode;

pub use assembler::assemble;
pub use clip::AudioClip;
pub use decode::decode;
pub use encode::{OutputFormat, encode};
