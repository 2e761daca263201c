//! Host type-graph interface for the phero model extractor.
//!
//! The extractor never talks to a type checker directly. Hosts describe their
//! program as a graph of [`TypeNode`]s, [`SymbolInfo`]s and [`Declaration`]s and
//! expose it through [`TypeResolutionService`].
//!
//! - **Identifiers**: `TypeId`, `SymbolId`, `DeclId` (dense `u32` indices)
//! - **Classification**: one closed [`TypeKind`] per node, matched exhaustively
//! - **Declarations**: interfaces, type aliases, enums and the sites that point
//!   at them (enum members, type parameters, import bindings)
//! - **In-memory host**: [`TypeGraph`], a serializable store with a builder

pub mod decl;
pub mod graph;
pub mod service;
pub mod types;

pub use decl::{DeclKind, Declaration, EnumMember, MemberSignature, SymbolInfo, SymbolKind};
pub use graph::TypeGraph;
pub use service::{BUILTIN_TYPE_NAMES, TypeResolutionService, is_builtin_name};
pub use types::{
    DeclId, IntrinsicKind, LiteralValue, ObjectFlags, ObjectShape, Property, SymbolId, TypeId,
    TypeKind, TypeNode,
};

#[cfg(test)]
#[path = "../tests/graph_tests.rs"]
mod graph_tests;
