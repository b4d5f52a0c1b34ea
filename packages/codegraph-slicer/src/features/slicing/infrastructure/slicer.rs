/*
 * Program Slicer
 *
 * Worklist of criteria processed FIFO. Each criterion is one backward walk
 * inside one method; crossing a method boundary spawns a new criterion:
 * - upward: parameters reached the walk → one criterion per caller call site
 * - downward: a call's result is live → one criterion per callee `return v`
 * - field writers: a field read reached the walk → one per writer store
 *
 * Every criterion persists exactly one record (keyed by its node id), and a
 * criterion whose record already exists is skipped. That memo is what bounds
 * recursion and cycles; the depth limits bound call-chain length.
 */

use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::config::SlicingConfig;
use crate::errors::SlicerError;
use crate::features::call_graph::{load_body, CallGraphBuild};
use crate::features::classification::UnitType;
use crate::features::ir_provider::ProgramSource;
use crate::features::slice_store::SliceStore;
use crate::features::slicing::domain::{SlicingCriterion, TargetKind};
use crate::features::slicing::infrastructure::context::TraversalContext;
use crate::features::slicing::infrastructure::transfer::{transfer, Spawn, TransferEnv};
use crate::shared::models::{FieldSig, Instruction, MethodSig, Stmt, Type, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlicerStats {
    pub processed: usize,
    pub memoized: usize,
    pub skipped: usize,
    pub spawned_upward: usize,
    pub spawned_downward: usize,
    pub spawned_field_writers: usize,
}

pub struct ProgramSlicer<'a> {
    build: &'a CallGraphBuild,
    source: &'a dyn ProgramSource,
    store: &'a dyn SliceStore,
    config: &'a SlicingConfig,
    queue: VecDeque<SlicingCriterion>,
    stats: SlicerStats,
}

impl<'a> ProgramSlicer<'a> {
    pub fn new(
        build: &'a CallGraphBuild,
        source: &'a dyn ProgramSource,
        store: &'a dyn SliceStore,
        config: &'a SlicingConfig,
    ) -> Self {
        Self {
            build,
            source,
            store,
            config,
            queue: VecDeque::new(),
            stats: SlicerStats::default(),
        }
    }

    pub fn enqueue(&mut self, criterion: SlicingCriterion) {
        self.queue.push_back(criterion);
    }

    /// Drain the worklist
    pub fn run(&mut self) -> SlicerStats {
        while let Some(criterion) = self.queue.pop_front() {
            self.process(criterion);
        }
        debug!(
            processed = self.stats.processed,
            memoized = self.stats.memoized,
            skipped = self.stats.skipped,
            "Slicer worklist drained"
        );
        self.stats
    }

    pub fn slice_all<I>(&mut self, criteria: I) -> SlicerStats
    where
        I: IntoIterator<Item = SlicingCriterion>,
    {
        for criterion in criteria {
            self.enqueue(criterion);
        }
        self.run()
    }

    fn process(&mut self, criterion: SlicingCriterion) {
        let node_id = criterion.node_id();
        if self.store.contains_node(&node_id) {
            trace!(node_id = %node_id, "Criterion already sliced");
            self.stats.memoized += 1;
            return;
        }

        let body = match MethodSig::parse(&criterion.caller)
            .and_then(|sig| load_body(self.source, &sig))
        {
            Ok(body) => body,
            Err(err) => {
                warn!(caller = %criterion.caller, error = %err, "Skipping criterion");
                self.stats.skipped += 1;
                return;
            }
        };
        if criterion.target_index >= body.len() {
            let err = SlicerError::mismatch(format!(
                "target index {} outside {} instructions",
                criterion.target_index,
                body.len()
            ));
            warn!(caller = %criterion.caller, error = %err, "Skipping criterion");
            self.stats.skipped += 1;
            return;
        }

        let branches = self.build.branches_for(&criterion.caller, &body);
        let mut ctx = TraversalContext::new(criterion, body, &branches);
        self.walk(&mut ctx);

        let children = self.spawn_children(&ctx);
        let mut related: Vec<String> = Vec::with_capacity(children.len());
        for child in &children {
            let id = child.node_id();
            if !related.contains(&id) {
                related.push(id);
            }
        }

        debug!(
            node_id = %node_id,
            caller = %ctx.criterion.caller,
            depth = ctx.criterion.depth,
            lines = ctx.line_count(),
            children = children.len(),
            "Sliced criterion"
        );

        let record = ctx.into_record(node_id, related);
        match self.store.insert_if_absent(&record) {
            Ok(true) => {
                self.stats.processed += 1;
                self.queue.extend(children);
            }
            Ok(false) => self.stats.memoized += 1,
            Err(err) => {
                warn!(error = %err, "Failed to persist slice");
                self.stats.skipped += 1;
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Backward walk
    // ═══════════════════════════════════════════════════════════════════════

    fn walk(&self, ctx: &mut TraversalContext) {
        let body = ctx.body.clone();
        let len = body.len();
        let seed_index = ctx.seed_index();
        let seed = &body[seed_index];

        let constants = seed_constants(ctx, seed, self.build);
        ctx.retain(seed, constants);
        if ctx.criterion.seeds_field_read() {
            if let Stmt::Assign { rhs, .. } = &seed.stmt {
                if let Some(field) = rhs.field() {
                    ctx.spawns.push(Spawn::FieldWriters {
                        field: field.clone(),
                    });
                }
            }
        }

        let env = TransferEnv {
            constants: &self.build.constants,
            seed_field_read: ctx.criterion.seeds_field_read(),
        };

        let mut reversed = ctx.criterion.target_index + 1;
        while reversed < len {
            let index = len - 1 - reversed;
            if let Some(tail) = ctx.take_loop_jump(index) {
                trace!(head = index, tail, "Walking loop body");
                reversed = len - 1 - tail;
                continue;
            }

            let instruction = &body[index];
            match (&instruction.unit_type, &instruction.stmt) {
                (Some(UnitType::If), Stmt::If { cond, target }) => {
                    if *target <= seed_index {
                        ctx.retain(instruction, Vec::new());
                        for id in cond.lhs.used_ids().into_iter().chain(cond.rhs.used_ids()) {
                            ctx.make_live(id, instruction.stmt.to_string());
                        }
                    }
                }
                (Some(UnitType::Switch), Stmt::Switch { key, .. }) => {
                    ctx.retain(instruction, Vec::new());
                    for id in key.used_ids() {
                        ctx.make_live(id, instruction.stmt.to_string());
                    }
                }
                (Some(UnitType::Goto), Stmt::Goto { target }) => {
                    if *target <= seed_index {
                        ctx.retain(instruction, Vec::new());
                    }
                }
                (Some(unit_type), _) if unit_type.is_return() => {}
                (Some(_), _) => {
                    let effect = transfer(instruction, &ctx.live, &env);
                    if effect.retain {
                        ctx.retain(instruction, effect.constants.clone());
                        ctx.apply(index, &effect);
                    }
                }
                (None, _) => {}
            }
            reversed += 1;
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Spawning
    // ═══════════════════════════════════════════════════════════════════════

    fn spawn_children(&mut self, ctx: &TraversalContext) -> Vec<SlicingCriterion> {
        let mut children = Vec::new();
        let group = ctx.criterion.root_id();

        for spawn in &ctx.spawns {
            match spawn {
                Spawn::Downward { callee } => {
                    let spawned = self.spawn_downward(ctx, callee, &group);
                    self.stats.spawned_downward += spawned.len();
                    children.extend(spawned);
                }
                Spawn::FieldWriters { field } => {
                    let spawned = self.spawn_field_writers(ctx, field, &group);
                    self.stats.spawned_field_writers += spawned.len();
                    children.extend(spawned);
                }
            }
        }

        if !ctx.param_ordinals.is_empty() {
            let spawned = self.spawn_upward(ctx, &group);
            self.stats.spawned_upward += spawned.len();
            children.extend(spawned);
        }
        children
    }

    fn spawn_upward(&self, ctx: &TraversalContext, group: &str) -> Vec<SlicingCriterion> {
        let depth = ctx.criterion.depth + 1;
        if depth > self.config.max_upward_depth as i32 {
            trace!(caller = %ctx.criterion.caller, depth, "Upward depth limit reached");
            return Vec::new();
        }

        let method = &ctx.criterion.caller;
        let ordinals: Vec<i32> = ctx.param_ordinals.iter().map(|&o| o as i32).collect();
        let mut spawned = Vec::new();

        for caller in self.build.graph.callers_of(method) {
            let Some(body) = self.body_of(&caller) else {
                continue;
            };
            let len = body.len();
            for instruction in body.iter() {
                let Some(expr) = instruction.stmt.invoke_expr() else {
                    continue;
                };
                if expr.method.to_string() != *method {
                    continue;
                }
                let mut criterion = SlicingCriterion::new(
                    caller.clone(),
                    method.clone(),
                    TargetKind::Invocation,
                    len - 1 - instruction.index,
                )
                .with_params(ordinals.clone())
                .with_depth(depth)
                .with_group(group);
                for &ordinal in &ordinals {
                    if let Some(Value::Local(local)) = expr.operand(ordinal) {
                        criterion
                            .live_values
                            .insert(local.name, format!("{}#{}", method, ordinal));
                    }
                }
                spawned.push(criterion);
            }
        }
        spawned
    }

    fn spawn_downward(
        &self,
        ctx: &TraversalContext,
        callee: &MethodSig,
        group: &str,
    ) -> Vec<SlicingCriterion> {
        let depth = ctx.criterion.depth - 1;
        if depth < -(self.config.max_downward_depth as i32) {
            trace!(callee = %callee, depth, "Downward depth limit reached");
            return Vec::new();
        }
        if !self.build.is_processed(&callee.class) {
            return Vec::new();
        }
        let callee_name = callee.to_string();
        let Some(body) = self.body_of(&callee_name) else {
            return Vec::new();
        };

        let len = body.len();
        body.iter()
            .filter(|i| i.unit_type == Some(UnitType::ReturnValue))
            .filter_map(|instruction| {
                let Stmt::Return(value) = &instruction.stmt else {
                    return None;
                };
                let mut criterion = SlicingCriterion::new(
                    callee_name.clone(),
                    instruction.stmt.to_string(),
                    TargetKind::ReturnValue,
                    len - 1 - instruction.index,
                )
                .with_depth(depth)
                .with_group(group);
                if let Value::Local(local) = value {
                    criterion = criterion.with_live(local.name.clone(), "return");
                }
                Some(criterion)
            })
            .collect()
    }

    fn spawn_field_writers(
        &self,
        ctx: &TraversalContext,
        field: &FieldSig,
        group: &str,
    ) -> Vec<SlicingCriterion> {
        if let Some(class) = self.source.class(&field.class) {
            let enum_constant = class
                .field(&field.name)
                .map_or(false, |f| f.is_enum_constant);
            if class.is_enum && enum_constant {
                return Vec::new();
            }
        }

        let field_id = field.to_string();
        let mut spawned = Vec::new();
        for writer in self.build.graph.writers_of(&field_id) {
            if writer == ctx.criterion.caller {
                continue;
            }
            let Some(body) = self.body_of(&writer) else {
                continue;
            };
            let len = body.len();
            for instruction in body.iter() {
                let Stmt::Assign { lhs, rhs } = &instruction.stmt else {
                    continue;
                };
                if lhs.field() != Some(field) {
                    continue;
                }
                let mut criterion = SlicingCriterion::new(
                    writer.clone(),
                    field_id.clone(),
                    TargetKind::FieldWrite,
                    len - 1 - instruction.index,
                )
                .with_depth(ctx.criterion.depth)
                .with_group(group);
                if let Value::Local(local) = rhs {
                    criterion = criterion.with_live(local.name.clone(), field_id.clone());
                }
                spawned.push(criterion);
            }
        }
        spawned
    }

    fn body_of(&self, method: &str) -> Option<Arc<[Instruction]>> {
        let result = MethodSig::parse(method).and_then(|sig| load_body(self.source, &sig));
        match result {
            Ok(body) => Some(body),
            Err(err) => {
                debug!(method, error = %err, "Body unavailable");
                None
            }
        }
    }
}

/// Literal texts attached to the seed line
fn seed_constants(
    ctx: &TraversalContext,
    seed: &Instruction,
    build: &CallGraphBuild,
) -> Vec<String> {
    let mut constants = Vec::new();
    match (ctx.criterion.target_kind, &seed.stmt) {
        (TargetKind::Invocation, stmt) => {
            if let Some(expr) = stmt.invoke_expr() {
                let positions: Vec<i32> = if ctx.criterion.target_param_numbers.is_empty() {
                    (0..expr.args.len() as i32).collect()
                } else {
                    ctx.criterion.target_param_numbers.clone()
                };
                for position in positions {
                    if let Some(Value::Constant(constant)) = expr.operand(position) {
                        let slot = expr.operand_type(position).unwrap_or(Type::Unknown);
                        constants.extend(constant.text_for(&slot));
                    }
                }
            }
        }
        (TargetKind::FieldRead, Stmt::Assign { rhs, .. }) => {
            if let Some(field) = rhs.field() {
                if let Some(constant) = build.constants.get_field(field) {
                    constants.extend(constant.text_for(&field.ty));
                }
            }
        }
        (TargetKind::FieldWrite, Stmt::Assign { lhs, rhs }) => {
            if let (Some(field), Value::Constant(constant)) = (lhs.field(), rhs) {
                constants.extend(constant.text_for(&field.ty));
            }
        }
        (TargetKind::ReturnValue, Stmt::Return(Value::Constant(constant))) => {
            let ret = MethodSig::parse(&ctx.criterion.caller)
                .map(|sig| sig.ret)
                .unwrap_or(Type::Unknown);
            constants.extend(constant.text_for(&ret));
        }
        _ => {}
    }
    constants
}
