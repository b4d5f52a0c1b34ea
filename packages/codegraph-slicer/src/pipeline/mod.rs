//! Pipeline orchestration

pub mod request;
pub mod slicing_pipeline;

pub use request::SliceRequest;
pub use slicing_pipeline::{SliceRun, SlicingPipeline};
