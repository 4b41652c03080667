pub mod adaptors;
pub mod artifacts;
pub mod chart;
pub mod pipeline;
pub mod scoring;
