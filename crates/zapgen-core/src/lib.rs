//! zapgen-core - Schema-to-encoder mapping engine for protoc-gen-zap
//!
//! Given protobuf message schemas, this crate generates Go
//! `MarshalLogObject` methods that write every field into a zap
//! `zapcore.ObjectEncoder`.
//!
//! # Architecture
//!
//! ```text
//! SchemaFile (IR)
//!     ↓
//!  [Registry]          identity-keyed arena of message types
//!     ↓
//!  [Emitter]           reachable set, one procedure per type
//!     ├─ [strategy]    direct / array wrapper / object wrapper
//!     ├─ [classify]    field kind → encoder method + accessor
//!     └─ [map_key]     map key kind → string expression
//!     ↓
//!  GeneratedUnit → [render] / [file] → *.zap.go
//! ```
//!
//! # Usage
//!
//! ```rust
//! use zapgen_core::{Field, FieldKind, GeneratorConfig, HeaderInfo, MessageType, Registry, SchemaFile};
//!
//! let files = vec![SchemaFile::new("user.proto", "acme").with_message(
//!     MessageType::new("User").with_field(Field::scalar("id", 1, FieldKind::Int32)),
//! )];
//! let registry = Registry::build(&files)?;
//! let out = zapgen_core::generate_file(
//!     &registry,
//!     &files[0],
//!     &GeneratorConfig::default(),
//!     &HeaderInfo::new("0.2.0"),
//! )?;
//! assert!(out.content.contains(r#"enc.AddInt32("Id", x.Id)"#));
//! # Ok::<(), zapgen_core::GenError>(())
//! ```

pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod file;
pub mod map_key;
pub mod naming;
pub mod registry;
pub mod render;
pub mod schema;
pub mod strategy;

pub use classify::{Classification, EncoderMethod, ValueTransform, classify};
pub use config::{GeneratorConfig, PathsMode};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use emitter::{EmitScope, Emitter, GeneratedProcedure, GeneratedUnit, generate};
pub use error::{GenError, GenResult};
pub use file::{GENERATOR_NAME, GeneratedFile, HeaderInfo, assemble_file, generate_file};
pub use map_key::{KeyExpression, stringify_key};
pub use registry::{Registry, TypeId};
pub use schema::{
    Cardinality, EnumType, Field, FieldKind, MessageType, SchemaBundle, SchemaFile,
};
pub use strategy::{FieldPlan, Statement, plan_field};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Diagnostics, EmitScope, Field, FieldKind, GenError, GenResult, GeneratorConfig,
        MessageType, Registry, SchemaFile, generate, generate_file,
    };
}
