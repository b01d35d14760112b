pub mod builder;

pub use builder::UnifiedLocationBuilder;
