pub mod calculate;
pub mod jobs;
pub mod probes;
pub mod ui;
