//! Procedure emission over the reachable type set.
//!
//! One generation run starts from a set of root message types and emits one
//! procedure per distinct message type reachable from them. Nested messages
//! are never inlined: a message-valued field calls the nested type's own
//! procedure, so recursion lives only in the call graph of the generated
//! code. Each type moves through `Discovered -> Emitted` exactly once, which
//! keeps self-referential and mutually recursive schemas finite.
//!
//! ```text
//! roots ──► queue (FIFO) ──► plan fields ──► procedure
//!              ▲                  │
//!              └── newly discovered message types
//! ```

use crate::diagnostics::Diagnostics;
use crate::error::GenResult;
use crate::naming::go_field_names;
use crate::registry::{Registry, TypeId};
use crate::strategy::{Statement, plan_field};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Which reachable types a run emits procedures for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitScope<'s> {
    /// Every reachable type.
    All,
    /// Only types declared in the named file; others are referenced by call
    /// and reported as external.
    File(&'s str),
}

/// Generated marshal procedure for one message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProcedure {
    pub type_id: TypeId,
    pub full_name: String,
    pub go_name: String,
    /// Statements in field declaration order.
    pub statements: Vec<Statement>,
}

impl GeneratedProcedure {
    pub fn uses_strconv(&self) -> bool {
        self.statements.iter().any(Statement::uses_strconv)
    }
}

/// Output of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Procedures in emission order.
    pub procedures: Vec<GeneratedProcedure>,
    /// Reachable types owned by other files, by fully-qualified name.
    pub external: Vec<String>,
    pub diagnostics: Diagnostics,
}

impl GeneratedUnit {
    pub fn uses_strconv(&self) -> bool {
        self.procedures.iter().any(GeneratedProcedure::uses_strconv)
    }

    pub fn procedure(&self, full_name: &str) -> Option<&GeneratedProcedure> {
        self.procedures.iter().find(|p| p.full_name == full_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeState {
    Discovered,
    Emitted,
    External,
}

/// Single-use emitter owning the traversal state of one run.
pub struct Emitter<'r, 'a> {
    registry: &'r Registry<'a>,
    scope: EmitScope<'r>,
    states: HashMap<TypeId, TypeState>,
    queue: VecDeque<TypeId>,
    unit: GeneratedUnit,
}

impl<'r, 'a> Emitter<'r, 'a> {
    pub fn new(registry: &'r Registry<'a>, scope: EmitScope<'r>) -> Self {
        Self {
            registry,
            scope,
            states: HashMap::new(),
            queue: VecDeque::new(),
            unit: GeneratedUnit::default(),
        }
    }

    /// Emit procedures for `roots` and everything reachable from them.
    ///
    /// Emission order is the roots in the given order followed by newly
    /// discovered types in first-discovery order.
    pub fn run(mut self, roots: &[TypeId]) -> GenResult<GeneratedUnit> {
        for &root in roots {
            self.discover(root);
        }

        while let Some(id) = self.queue.pop_front() {
            let procedure = self.emit(id)?;
            self.states.insert(id, TypeState::Emitted);
            self.unit.procedures.push(procedure);
        }

        debug!(
            procedures = self.unit.procedures.len(),
            external = self.unit.external.len(),
            diagnostics = self.unit.diagnostics.len(),
            "generation run complete"
        );
        Ok(self.unit)
    }

    fn discover(&mut self, id: TypeId) {
        if self.states.contains_key(&id) {
            return;
        }
        let registry = self.registry;
        let entry = registry.get(id);
        if entry.message.map_entry {
            return;
        }

        let in_scope = match self.scope {
            EmitScope::All => true,
            EmitScope::File(name) => entry.file.name == name,
        };
        if in_scope {
            debug!(type_name = %entry.full_name, "discovered");
            self.states.insert(id, TypeState::Discovered);
            self.queue.push_back(id);
        } else {
            debug!(type_name = %entry.full_name, "external reference");
            self.states.insert(id, TypeState::External);
            self.unit.external.push(entry.full_name.clone());
        }
    }

    fn emit(&mut self, id: TypeId) -> GenResult<GeneratedProcedure> {
        debug_assert_eq!(self.states.get(&id), Some(&TypeState::Discovered));
        let registry = self.registry;
        let entry = registry.get(id);
        let mut statements = Vec::with_capacity(entry.message.fields.len());

        let go_names = go_field_names(&entry.message.fields);

        for (field, go_name) in entry.message.fields.iter().zip(&go_names) {
            let Some(plan) =
                plan_field(registry, id, field, go_name, &mut self.unit.diagnostics)?
            else {
                continue;
            };
            if let Some(nested) = plan.delegates_to {
                self.discover(nested);
            }
            statements.push(plan.statement);
        }

        Ok(GeneratedProcedure {
            type_id: id,
            full_name: entry.full_name.clone(),
            go_name: entry.go_name.clone(),
            statements,
        })
    }
}

/// Run one generation pass over `roots`.
pub fn generate(
    registry: &Registry<'_>,
    roots: &[TypeId],
    scope: EmitScope<'_>,
) -> GenResult<GeneratedUnit> {
    Emitter::new(registry, scope).run(roots)
}
