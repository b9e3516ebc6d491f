pub mod analyzer;
pub mod indicators;
pub mod scoring;
pub mod signals;
