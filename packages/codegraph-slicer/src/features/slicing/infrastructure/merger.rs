/*
 * Slice Merger
 *
 * A group is the tree of per-criterion records reachable from one root
 * through `relatedNodeIds`. Every root-to-leaf path becomes one merged
 * record: segments concatenated leaf first, then optionally pruned of dead
 * branches and string-folded, then renumbered.
 *
 * Merged records carry no node id. A group that already has merged records
 * is left untouched, so merging twice writes nothing new.
 */

use ahash::AHashMap;
use tracing::{debug, info, warn};

use crate::config::SlicingConfig;
use crate::errors::{Result, SlicerError};
use crate::features::classification::UnitType;
use crate::features::ir_provider::ProgramSource;
use crate::features::optimization::{ConstantFolder, DeadBranchEliminator};
use crate::features::slice_store::{Predicate, SliceStore};
use crate::features::slicing::domain::{ContentLine, SliceRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub paths: usize,
    pub written: usize,
    /// Paths starting at an unresolved parameter
    pub dropped: usize,
    pub dead_lines: usize,
    pub folded_lines: usize,
    pub truncated: bool,
}

impl std::ops::AddAssign for MergeStats {
    fn add_assign(&mut self, other: Self) {
        self.paths += other.paths;
        self.written += other.written;
        self.dropped += other.dropped;
        self.dead_lines += other.dead_lines;
        self.folded_lines += other.folded_lines;
        self.truncated |= other.truncated;
    }
}

pub struct SliceMerger<'a> {
    store: &'a dyn SliceStore,
    source: &'a dyn ProgramSource,
    config: &'a SlicingConfig,
    records: AHashMap<String, Option<SliceRecord>>,
}

impl<'a> SliceMerger<'a> {
    pub fn new(
        store: &'a dyn SliceStore,
        source: &'a dyn ProgramSource,
        config: &'a SlicingConfig,
    ) -> Self {
        Self {
            store,
            source,
            config,
            records: AHashMap::new(),
        }
    }

    /// Merge the group rooted at `root_id`
    pub fn merge_group(&mut self, root_id: &str) -> Result<MergeStats> {
        let mut stats = MergeStats::default();
        let existing = self
            .store
            .select_documents(&[Predicate::missing("nodeId"), Predicate::eq("groupId", root_id)]);
        if !existing.is_empty() {
            debug!(root = root_id, merged = existing.len(), "Group already merged");
            return Ok(stats);
        }

        for record in self.store.select_all(&[Predicate::eq("groupId", root_id)])? {
            if let Some(node_id) = record.node_id.clone() {
                self.records.insert(node_id, Some(record));
            }
        }
        if self.record(root_id)?.is_none() {
            return Err(SlicerError::unresolved(format!("slice group root {}", root_id)));
        }

        let (paths, truncated) = self.enumerate_paths(root_id)?;
        stats.truncated = truncated;
        if truncated {
            warn!(
                root = root_id,
                limit = self.config.max_merge_paths,
                "Merge path limit reached"
            );
        }

        for path in &paths {
            stats.paths += 1;
            match self.merge_path(root_id, path, &mut stats)? {
                Some(merged) => {
                    self.store.insert(&merged)?;
                    stats.written += 1;
                }
                None => stats.dropped += 1,
            }
        }

        info!(
            root = root_id,
            paths = stats.paths,
            written = stats.written,
            dropped = stats.dropped,
            "Merged slice group"
        );
        Ok(stats)
    }

    fn record(&mut self, node_id: &str) -> Result<Option<&SliceRecord>> {
        if !self.records.contains_key(node_id) {
            let found = self.store.select_one(&[Predicate::eq("nodeId", node_id)])?;
            self.records.insert(node_id.to_string(), found);
        }
        Ok(self.records.get(node_id).and_then(Option::as_ref))
    }

    fn children(&mut self, node_id: &str) -> Result<Vec<String>> {
        let related = match self.record(node_id)? {
            Some(record) => record.related_node_ids.clone(),
            None => return Ok(Vec::new()),
        };
        let mut children = Vec::with_capacity(related.len());
        for child in related {
            if self.record(&child)?.is_some() {
                children.push(child);
            }
        }
        Ok(children)
    }

    /// Root-to-leaf node id paths; a node never repeats within a path
    fn enumerate_paths(&mut self, root_id: &str) -> Result<(Vec<Vec<String>>, bool)> {
        let limit = self.config.max_merge_paths;
        let mut paths = Vec::new();
        let mut stack: Vec<Vec<String>> = vec![vec![root_id.to_string()]];

        while let Some(path) = stack.pop() {
            let Some(last) = path.last() else {
                continue;
            };
            let open: Vec<String> = self
                .children(last)?
                .into_iter()
                .filter(|child| !path.contains(child))
                .collect();

            if open.is_empty() {
                if paths.len() == limit {
                    return Ok((paths, true));
                }
                paths.push(path);
                continue;
            }
            // reversed so the first related child is explored first
            for child in open.into_iter().rev() {
                let mut next = path.clone();
                next.push(child);
                stack.push(next);
            }
        }
        Ok((paths, false))
    }

    fn merge_path(
        &mut self,
        root_id: &str,
        path: &[String],
        stats: &mut MergeStats,
    ) -> Result<Option<SliceRecord>> {
        let mut segments: Vec<SliceRecord> = Vec::with_capacity(path.len());
        for node_id in path.iter().rev() {
            match self.record(node_id)? {
                Some(record) => segments.push(record.clone()),
                None => return Ok(None),
            }
        }

        let starts_at_parameter = segments
            .iter()
            .flat_map(|s| s.content.first())
            .next()
            .map_or(false, |line| line.unit_type == UnitType::ParameterIdentity);
        if starts_at_parameter {
            debug!(root = root_id, leaf = ?path.last(), "Dropping path with unresolved parameter");
            return Ok(None);
        }

        let optimize = self.config.optimize && segments.len() > 1;
        let dead = if optimize {
            let refs: Vec<&SliceRecord> = segments.iter().collect();
            DeadBranchEliminator::new(self.source).dead_lines(&refs)
        } else {
            Default::default()
        };

        let mut content: Vec<ContentLine> = segments
            .iter()
            .flat_map(|s| s.content.iter())
            .filter(|line| !dead.contains(&(line.caller_name.clone(), line.source_index)))
            .cloned()
            .collect();
        stats.dead_lines += dead.len();

        if optimize && self.config.fold_string_constants {
            stats.folded_lines += ConstantFolder::new(self.source).fold(&mut content);
        }
        for (line_number, line) in content.iter_mut().enumerate() {
            line.line_number = line_number;
        }

        let Some(root) = segments.last() else {
            return Ok(None);
        };
        Ok(Some(SliceRecord {
            node_id: None,
            group_id: root_id.to_string(),
            related_node_ids: path.to_vec(),
            caller_name: root.caller_name.clone(),
            target_statement: root.target_statement.clone(),
            target_param_numbers: root.target_param_numbers.clone(),
            target_variables: root.target_variables.clone(),
            content,
        }))
    }
}
