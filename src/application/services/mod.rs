//! Resolution services for the application layer.

pub mod cache_aside;
pub mod code_generator;
pub mod expand_engine;
pub mod shorten_engine;

pub use cache_aside::CacheAside;
pub use code_generator::CodeGenerator;
pub use expand_engine::ExpandEngine;
pub use shorten_engine::ShortenEngine;
