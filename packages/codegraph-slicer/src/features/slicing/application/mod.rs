//! Slicing Application Layer
//!
//! Use cases for criterion generation, slicing and merging.
//!
//! Main entry point: `SlicingPipeline::slice()` (pipeline/)

pub use crate::features::slicing::infrastructure::{
    CriterionGenerator, MergeStats, ProgramSlicer, SliceMerger, SlicerStats,
};
