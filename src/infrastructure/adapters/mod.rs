//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod access;
pub mod imagegen;
pub mod pdf;
pub mod storage;
pub mod textgen;

pub use access::*;
pub use imagegen::*;
pub use pdf::*;
pub use storage::*;
pub use textgen::*;
