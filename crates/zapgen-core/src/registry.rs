//! Identity-keyed arena of message types
//!
//! Every message declared in the provided schema files (nested declarations
//! included) gets a stable [`TypeId`]. The emitter keys its per-run state on
//! these ids, which is what keeps cyclic schemas finite.

use crate::error::{GenError, GenResult};
use crate::naming::go_type_name;
use crate::schema::{Cardinality, Field, MessageType, SchemaFile};
use std::collections::{HashMap, HashSet};

/// Stable identity of a message type within a [`Registry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A registered message type
#[derive(Debug)]
pub struct TypeEntry<'a> {
    pub id: TypeId,
    /// Fully-qualified proto name with leading dot (`.acme.User.Inner`)
    pub full_name: String,
    /// Go type name (`User_Inner`, `UserInner` for `User.inner`)
    pub go_name: String,
    /// File that declares the type
    pub file: &'a SchemaFile,
    pub message: &'a MessageType,
}

/// Key and value fields of a map entry type
#[derive(Debug, Clone, Copy)]
pub struct MapEntry<'a> {
    /// The synthetic entry type; value type names resolve relative to it
    pub id: TypeId,
    pub key: &'a Field,
    pub value: &'a Field,
}

/// Arena of all message types known to a generation run
#[derive(Debug)]
pub struct Registry<'a> {
    entries: Vec<TypeEntry<'a>>,
    by_name: HashMap<String, TypeId>,
    enums: HashSet<String>,
}

impl<'a> Registry<'a> {
    /// Register every message and enum declared in `files`.
    ///
    /// Fails if the same fully-qualified name is declared twice.
    pub fn build(files: &'a [SchemaFile]) -> GenResult<Self> {
        let mut registry = Registry {
            entries: Vec::new(),
            by_name: HashMap::new(),
            enums: HashSet::new(),
        };

        for file in files {
            let scope = file.scope();
            for decl in &file.enums {
                registry.register_enum(format!("{scope}.{}", decl.name))?;
            }
            for message in &file.messages {
                registry.register_message(file, &scope, &[], message)?;
            }
        }

        Ok(registry)
    }

    fn register_message(
        &mut self,
        file: &'a SchemaFile,
        scope: &str,
        parents: &[&'a str],
        message: &'a MessageType,
    ) -> GenResult<()> {
        let full_name = format!("{scope}.{}", message.name);
        if self.by_name.contains_key(&full_name) || self.enums.contains(&full_name) {
            return Err(GenError::DuplicateType(full_name));
        }

        let mut path = parents.to_vec();
        path.push(message.name.as_str());

        let id = TypeId(self.entries.len());
        self.by_name.insert(full_name.clone(), id);
        self.entries.push(TypeEntry {
            id,
            full_name: full_name.clone(),
            go_name: go_type_name(&path),
            file,
            message,
        });

        for decl in &message.enums {
            self.register_enum(format!("{full_name}.{}", decl.name))?;
        }
        for nested in &message.nested {
            self.register_message(file, &full_name, &path, nested)?;
        }
        Ok(())
    }

    fn register_enum(&mut self, full_name: String) -> GenResult<()> {
        if self.by_name.contains_key(&full_name) || !self.enums.insert(full_name.clone()) {
            return Err(GenError::DuplicateType(full_name));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: TypeId) -> &TypeEntry<'a> {
        &self.entries[id.0]
    }

    /// Look up a message by fully-qualified name (`.pkg.Type`).
    pub fn lookup(&self, full_name: &str) -> Option<TypeId> {
        self.by_name.get(full_name).copied()
    }

    /// Look up a message by fully-qualified name, failing if absent.
    pub fn require(&self, full_name: &str) -> GenResult<TypeId> {
        self.lookup(full_name)
            .ok_or_else(|| GenError::UnknownType(full_name.to_string()))
    }

    /// Messages declared in `file_name` in declaration order (parents before
    /// their nested types), excluding synthetic map entries.
    pub fn messages_in_file(&self, file_name: &str) -> Vec<TypeId> {
        self.entries
            .iter()
            .filter(|e| e.file.name == file_name && !e.message.map_entry)
            .map(|e| e.id)
            .collect()
    }

    /// Resolve the message type referenced by a message-kind or map field of `owner`.
    pub fn resolve_message(&self, owner: TypeId, field: &Field) -> GenResult<TypeId> {
        let type_name = self.type_name_of(owner, field)?;
        let scope = &self.get(owner).full_name;

        candidates(scope, type_name)
            .find_map(|candidate| self.lookup(&candidate))
            .ok_or_else(|| self.unresolved(owner, field, type_name))
    }

    /// Check that the enum referenced by an enum-kind field of `owner` exists.
    pub fn resolve_enum(&self, owner: TypeId, field: &Field) -> GenResult<()> {
        let type_name = self.type_name_of(owner, field)?;
        let scope = &self.get(owner).full_name;

        if candidates(scope, type_name).any(|candidate| self.enums.contains(&candidate)) {
            Ok(())
        } else {
            Err(self.unresolved(owner, field, type_name))
        }
    }

    /// Resolve and validate the entry type of a map field of `owner`.
    pub fn map_entry(&self, owner: TypeId, field: &Field) -> GenResult<MapEntry<'a>> {
        let entry_id = self.resolve_message(owner, field)?;
        let entry = self.get(entry_id).message;

        let malformed = |reason: String| GenError::MalformedMapEntry {
            message: self.get(owner).full_name.clone(),
            field: field.name.clone(),
            reason,
        };

        if !entry.map_entry {
            return Err(malformed(format!(
                "{} is not a map entry type",
                self.get(entry_id).full_name
            )));
        }
        let [key, value] = entry.fields.as_slice() else {
            return Err(malformed(format!(
                "expected 2 fields, found {}",
                entry.fields.len()
            )));
        };
        if key.number != 1 || value.number != 2 {
            return Err(malformed("key must be field 1 and value field 2".to_string()));
        }
        if key.cardinality != Cardinality::Singular || value.cardinality != Cardinality::Singular {
            return Err(malformed("key and value must be singular".to_string()));
        }

        Ok(MapEntry {
            id: entry_id,
            key,
            value,
        })
    }

    fn type_name_of<'f>(&self, owner: TypeId, field: &'f Field) -> GenResult<&'f str> {
        field
            .type_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| GenError::MissingTypeName {
                message: self.get(owner).full_name.clone(),
                field: field.name.clone(),
            })
    }

    fn unresolved(&self, owner: TypeId, field: &Field, type_name: &str) -> GenError {
        GenError::UnresolvedType {
            message: self.get(owner).full_name.clone(),
            field: field.name.clone(),
            type_name: type_name.to_string(),
        }
    }
}

/// Candidate fully-qualified names for `name` referenced from `scope`,
/// innermost scope first (protobuf scoping rules).
fn candidates<'s>(scope: &'s str, name: &'s str) -> impl Iterator<Item = String> + 's {
    let absolute = name.starts_with('.');
    let mut current = Some(scope);

    std::iter::from_fn(move || {
        if absolute {
            return current.take().map(|_| name.to_string());
        }
        let scope = current?;
        let candidate = format!("{scope}.{name}");
        current = if scope.is_empty() {
            None
        } else {
            Some(scope.rfind('.').map_or("", |pos| &scope[..pos]))
        };
        Some(candidate)
    })
}
