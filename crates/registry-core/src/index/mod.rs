//! Index aggregation and serialization.

pub mod builder;
pub mod normalize;

pub use builder::{
    build_index, write_index, BuildOptions, BuildReport, Diagnostic, Index, Severity,
};
pub use normalize::coerce_float_literals;
