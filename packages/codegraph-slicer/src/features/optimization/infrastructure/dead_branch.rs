/*
 * Dead-Branch Elimination
 *
 * Runs the segment interpreter over every segment of a merged path, in
 * execution order. A segment receives argument values from the previous
 * segment only when that segment's method calls it; otherwise its parameters
 * are unknown. Lines at positions proven unreachable are reported as dead.
 */

use ahash::AHashSet;
use tracing::debug;

use crate::features::ir_provider::ProgramSource;
use crate::features::optimization::infrastructure::bodies::BodyCache;
use crate::features::optimization::infrastructure::interpreter::{CallArgs, SegmentInterpreter};
use crate::features::slicing::domain::SliceRecord;

/// (owning method, program index)
pub type LinePosition = (String, usize);

pub struct DeadBranchEliminator<'a> {
    bodies: BodyCache<'a>,
}

impl<'a> DeadBranchEliminator<'a> {
    pub fn new(source: &'a dyn ProgramSource) -> Self {
        Self {
            bodies: BodyCache::new(source),
        }
    }

    /// Positions of `segments`' lines that can never execute
    pub fn dead_lines(&mut self, segments: &[&SliceRecord]) -> AHashSet<LinePosition> {
        let mut dead_lines = AHashSet::new();
        let mut incoming: Option<(String, CallArgs)> = None;

        for (i, segment) in segments.iter().enumerate() {
            let method = segment.caller_name.as_str();
            let next = segments.get(i + 1).map(|s| s.caller_name.as_str());

            let params = match incoming.take() {
                Some((callee, args)) if callee == method => args,
                _ => Vec::new(),
            };

            let Some(body) = self.bodies.get(method) else {
                continue;
            };
            let outcome = SegmentInterpreter::new(&body).run(&params, next);

            if let (Some(next), Some(args)) = (next, outcome.call_args) {
                incoming = Some((next.to_string(), args));
            }
            if outcome.dead.is_empty() {
                continue;
            }

            for line in &segment.content {
                if line.caller_name == method && outcome.dead.contains(line.source_index) {
                    dead_lines.insert((line.caller_name.clone(), line.source_index));
                }
            }
            debug!(method, ranges = ?outcome.dead.ranges(), "Dead ranges decided");
        }

        dead_lines
    }
}
