//! Utility modules shared by the pipeline.

pub mod date;
pub mod hash;
pub mod mime;
pub mod plural;
