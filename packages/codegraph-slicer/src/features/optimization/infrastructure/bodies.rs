//! Body cache shared by the optimization passes

use ahash::AHashMap;
use std::sync::Arc;
use tracing::debug;

use crate::features::call_graph::load_body;
use crate::features::ir_provider::ProgramSource;
use crate::shared::models::{Instruction, MethodSig};

pub struct BodyCache<'a> {
    source: &'a dyn ProgramSource,
    bodies: AHashMap<String, Option<Arc<[Instruction]>>>,
}

impl<'a> BodyCache<'a> {
    pub fn new(source: &'a dyn ProgramSource) -> Self {
        Self {
            source,
            bodies: AHashMap::new(),
        }
    }

    /// Body of a method signature string; failures are cached as absent
    pub fn get(&mut self, method: &str) -> Option<Arc<[Instruction]>> {
        if let Some(cached) = self.bodies.get(method) {
            return cached.clone();
        }
        let body = match MethodSig::parse(method).and_then(|sig| load_body(self.source, &sig)) {
            Ok(body) => Some(body),
            Err(err) => {
                debug!(method, error = %err, "Body unavailable for optimization");
                None
            }
        };
        self.bodies.insert(method.to_string(), body.clone());
        body
    }

    /// Instruction at a program index of a method
    pub fn instruction(&mut self, method: &str, index: usize) -> Option<Instruction> {
        self.get(method)?.get(index).cloned()
    }
}
