/*
 * Slicing Pipeline
 *
 * End-to-end driver over one program:
 *   config.validate → call graph build → criteria → worklist slicing → merge
 *
 * The call graph is built once per pipeline and extended in place when the
 * program grows; the slice store outlives every request so repeated requests
 * are memoized.
 */

use std::time::Instant;
use tracing::{info, warn};

use crate::config::SlicingConfig;
use crate::errors::Result;
use crate::features::call_graph::{CallGraphBuild, CallGraphBuilder, ClassFilter};
use crate::features::ir_provider::ProgramSource;
use crate::features::slice_store::{InMemorySliceStore, Predicate, SliceStore};
use crate::features::slicing::{
    CriterionGenerator, MergeStats, ProgramSlicer, SliceMerger, SliceRecord, SlicerStats,
    TargetKind,
};
use crate::pipeline::request::SliceRequest;

/// Outcome of one request
#[derive(Debug, Clone, Default)]
pub struct SliceRun {
    /// Node ids of the generated root criteria
    pub roots: Vec<String>,
    /// Merged records of every root group
    pub merged: Vec<SliceRecord>,
    pub slicer: SlicerStats,
    pub merge: MergeStats,
    pub elapsed_ms: u128,
}

pub struct SlicingPipeline<P: ProgramSource> {
    program: P,
    config: SlicingConfig,
    filter: ClassFilter,
    build: CallGraphBuild,
    store: InMemorySliceStore,
}

impl<P: ProgramSource> SlicingPipeline<P> {
    pub fn new(program: P, config: SlicingConfig) -> Result<Self> {
        Self::with_store(program, config, InMemorySliceStore::new())
    }

    /// Pipeline writing into an existing store (shared with other pipelines)
    pub fn with_store(
        program: P,
        config: SlicingConfig,
        store: InMemorySliceStore,
    ) -> Result<Self> {
        config.validate()?;
        let filter = ClassFilter::from_config(&config);
        let build = CallGraphBuilder::new(&filter).build(&program);
        Ok(Self {
            program,
            config,
            filter,
            build,
            store,
        })
    }

    pub fn program(&self) -> &P {
        &self.program
    }

    /// Mutable program access; call `refresh_call_graph` after adding classes
    pub fn program_mut(&mut self) -> &mut P {
        &mut self.program
    }

    pub fn config(&self) -> &SlicingConfig {
        &self.config
    }

    pub fn call_graph(&self) -> &CallGraphBuild {
        &self.build
    }

    pub fn store(&self) -> &InMemorySliceStore {
        &self.store
    }

    /// Extend the call graph with classes not processed yet; returns new edges
    pub fn refresh_call_graph(&mut self) -> usize {
        let before = self.build.graph.edge_count();
        CallGraphBuilder::new(&self.filter).build_into(&mut self.build, &self.program);
        self.build.graph.edge_count() - before
    }

    pub fn slice(
        &self,
        caller: &str,
        target_statement: &str,
        kind: TargetKind,
        params: &[i32],
    ) -> Result<SliceRun> {
        let started = Instant::now();
        let criteria =
            CriterionGenerator::new(&self.program).generate(caller, target_statement, kind, params);
        let roots: Vec<String> = criteria.iter().map(|c| c.node_id()).collect();

        let slicer = ProgramSlicer::new(&self.build, &self.program, &self.store, &self.config)
            .slice_all(criteria);

        let mut merge = MergeStats::default();
        let mut merged = Vec::new();
        if self.config.merge {
            let mut merger = SliceMerger::new(&self.store, &self.program, &self.config);
            for root in &roots {
                match merger.merge_group(root) {
                    Ok(stats) => merge += stats,
                    Err(err) if err.is_local() => {
                        warn!(root = %root, error = %err, "Skipping group merge");
                    }
                    Err(err) => return Err(err),
                }
                merged.extend(self.store.select_all(&[
                    Predicate::missing("nodeId"),
                    Predicate::eq("groupId", root.as_str()),
                ])?);
            }
        }

        let run = SliceRun {
            roots,
            merged,
            slicer,
            merge,
            elapsed_ms: started.elapsed().as_millis(),
        };
        info!(
            caller,
            target = target_statement,
            roots = run.roots.len(),
            processed = run.slicer.processed,
            merged = run.merged.len(),
            elapsed_ms = run.elapsed_ms,
            "Slice request finished"
        );
        Ok(run)
    }

    pub fn slice_request(&self, request: &SliceRequest) -> Result<SliceRun> {
        self.slice(
            &request.caller,
            &request.target_statement,
            request.kind,
            &request.params,
        )
    }

    /// Run every request in order; the first non-local error aborts the batch
    pub fn slice_batch(&self, requests: &[SliceRequest]) -> Result<Vec<SliceRun>> {
        requests.iter().map(|r| self.slice_request(r)).collect()
    }
}
