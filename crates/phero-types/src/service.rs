//! The capability the extractor needs from a host type system.

use crate::decl::{Declaration, SymbolInfo};
use crate::types::{DeclId, Property, SymbolId, TypeId, TypeKind, TypeNode};

/// Names that are never expanded into declarations.
///
/// Primitive wrappers, promise-like containers and the structural utility
/// types shipped with the standard library. References to them still have
/// their type arguments walked.
pub const BUILTIN_TYPE_NAMES: &[&str] = &[
    // Primitive wrappers
    "String",
    "Number",
    "Boolean",
    "Object",
    "Symbol",
    "BigInt",
    "Date",
    // Containers
    "Array",
    "ReadonlyArray",
    "Promise",
    "PromiseLike",
    "Map",
    "Set",
    "Record",
    // Utility types
    "Partial",
    "Required",
    "Readonly",
    "Pick",
    "Omit",
    "Exclude",
    "Extract",
    "NonNullable",
];

/// Names whose instances are array-shaped.
pub const ARRAY_CONTAINER_NAMES: &[&str] = &["Array", "ReadonlyArray"];

/// Names whose instances are promise-like and unwrap to their first argument.
pub const PROMISE_CONTAINER_NAMES: &[&str] = &["Promise", "PromiseLike"];

pub fn is_builtin_name(name: &str) -> bool {
    BUILTIN_TYPE_NAMES.contains(&name)
}

/// Read-only view of a host type graph.
///
/// Implementations must be deterministic: the same query returns the same
/// answer for the lifetime of the service. The extractor never mutates the
/// graph and never caches across top-level calls.
pub trait TypeResolutionService {
    /// Structural classification of a node.
    fn resolve(&self, id: TypeId) -> Option<&TypeNode>;

    fn symbol(&self, id: SymbolId) -> Option<&SymbolInfo>;

    fn declaration(&self, id: DeclId) -> Option<&Declaration>;

    /// Declaration sites of a symbol, in source order.
    fn declarations_of(&self, symbol: SymbolId) -> &[DeclId] {
        self.symbol(symbol)
            .map(|info| info.declarations.as_slice())
            .unwrap_or(&[])
    }

    /// Properties of a type in declaration order, including inherited ones.
    fn properties_of(&self, id: TypeId) -> Vec<Property>;

    /// Generic type arguments of a node (empty for non-generic nodes).
    fn type_arguments_of(&self, id: TypeId) -> Vec<TypeId> {
        match self.resolve(id).map(|node| &node.kind) {
            Some(TypeKind::Reference { args, .. }) => args.clone(),
            Some(TypeKind::Array { element }) => vec![*element],
            _ => Vec::new(),
        }
    }

    fn is_builtin(&self, name: &str) -> bool {
        is_builtin_name(name)
    }
}
