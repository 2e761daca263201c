//! Parser model synthesis.
//!
//! A recursive-descent pass over the host type graph. Each node is matched
//! against an ordered rule list and the first rule that applies produces the
//! model:
//!
//! | # | Node | Model |
//! |---|------|-------|
//! | 1 | string/number/boolean literal | literal model |
//! | 2 | written `undefined` / `null` | `Undefined` / `Null` |
//! | 3 | `string` / `number` | `String` / `Number` |
//! | 4 | `boolean`, or a union of exactly `true` and `false` | `Boolean` |
//! | 5 | `undefined` keyword (strict null mode) | `Undefined` |
//! | 6 | named type already in the memo | `Reference` |
//! | 7 | type alias | `Reference`, body in deps |
//! | 8 | union | members, then [`normalize`] |
//! | 9 | `T[]`, `Array<T>`, `ReadonlyArray<T>` | `Array` |
//! | 10 | interface or class | `Reference`, body in deps |
//! | 11 | object literal, intersection of object shapes, interface body | `Object` |
//! | 12 | anything else | `UnsupportedTypeShape` |
//!
//! Rules 7 and 10 re-enter the same node with `resolving_named` set, which
//! skips them and produces the body.

use crate::error::{ModelExtractionError, Result};
use crate::memo::SymbolMemo;
use crate::naming::NameRegistry;
use crate::options::ExtractOptions;
use crate::parser_model::{DependencyMap, Member, ParserModel, ParserModelMap};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::union::{normalize, strip_optional};
use phero_common::limits::MAX_REFERENCE_HOPS;
use phero_types::service::ARRAY_CONTAINER_NAMES;
use phero_types::{
    IntrinsicKind, LiteralValue, SymbolId, SymbolKind, TypeId, TypeKind, TypeNode,
    TypeResolutionService,
};
use rustc_hash::FxHashSet;
use tracing::{debug, debug_span, trace};

/// Synthesize the parser model of `entry` and every named model it depends on.
pub fn synthesize<S>(service: &S, entry: TypeId, options: &ExtractOptions) -> Result<ParserModelMap>
where
    S: TypeResolutionService + ?Sized,
{
    let _span = debug_span!("synthesize", entry = %entry).entered();
    let mut generator = ModelGenerator::new(service, options);
    let root = generator.generate_root(entry)?;
    let deps = generator.finish();
    debug!(deps = deps.len(), "synthesized parser model");
    Ok(ParserModelMap { root, deps })
}

/// Synthesis state for one top-level call.
///
/// Several roots may be generated against the same generator; they then share
/// one memo and one dependency map.
pub struct ModelGenerator<'a, S: TypeResolutionService + ?Sized> {
    service: &'a S,
    options: &'a ExtractOptions,
    memo: SymbolMemo,
    names: NameRegistry,
    guard: RecursionGuard<(TypeId, bool)>,
}

impl<'a, S: TypeResolutionService + ?Sized> ModelGenerator<'a, S> {
    pub fn new(service: &'a S, options: &'a ExtractOptions) -> Self {
        let profile = options.recursion_profile(RecursionProfile::Synthesis);
        Self {
            service,
            options,
            memo: SymbolMemo::new(),
            names: NameRegistry::new(options.name_policy),
            guard: RecursionGuard::with_profile(profile),
        }
    }

    pub fn generate_root(&mut self, id: TypeId) -> Result<ParserModel> {
        self.generate(id, false)
    }

    pub fn finish(self) -> DependencyMap {
        self.memo.into_dependencies()
    }

    fn node(&self, id: TypeId) -> Result<&'a TypeNode> {
        let service = self.service;
        service
            .resolve(id)
            .ok_or_else(|| ModelExtractionError::dangling_type(id))
    }

    /// Follow written references to the type they denote.
    ///
    /// References to array containers are kept: rule 9 reads their argument.
    fn apparent(&self, mut id: TypeId) -> Result<(TypeId, &'a TypeNode)> {
        for _ in 0..MAX_REFERENCE_HOPS {
            let node = self.node(id)?;
            let TypeKind::Reference {
                name,
                target: Some(target),
                ..
            } = &node.kind
            else {
                return Ok((id, node));
            };
            if self.is_array_container(*name) {
                return Ok((id, node));
            }
            id = *target;
        }
        Err(ModelExtractionError::recursion_limit(
            id,
            "reference chain too long",
        ))
    }

    fn is_array_container(&self, symbol: SymbolId) -> bool {
        self.service.symbol(symbol).is_some_and(|info| {
            info.kind == SymbolKind::Builtin && ARRAY_CONTAINER_NAMES.contains(&info.name.as_str())
        })
    }

    fn generate(&mut self, id: TypeId, resolving_named: bool) -> Result<ParserModel> {
        let (id, node) = self.apparent(id)?;

        if let Some(model) = self.generate_leaf(node) {
            return Ok(model);
        }
        if self.is_boolean_type(id)? {
            return Ok(ParserModel::Boolean);
        }
        if self.options.strict_null_checks
            && matches!(
                node.kind,
                TypeKind::Intrinsic {
                    intrinsic: IntrinsicKind::Undefined
                }
            )
        {
            return Ok(ParserModel::Undefined);
        }
        if !resolving_named {
            if let Some(name) = node.identity().and_then(|sym| self.memo.lookup(sym)) {
                trace!(type_id = %id, name, "memo hit");
                return Ok(ParserModel::reference(name));
            }
        }

        let key = (id, resolving_named);
        match self.guard.enter(key) {
            RecursionResult::Entered => {}
            denied => {
                debug!(type_id = %id, reason = denied.reason(), "recursion guard denied entry");
                return Err(ModelExtractionError::recursion_limit(id, denied.reason()));
            }
        }
        let result = self.generate_structured(id, node, resolving_named);
        self.guard.leave(key);
        result
    }

    /// Rules 1 to 3.
    fn generate_leaf(&self, node: &TypeNode) -> Option<ParserModel> {
        match &node.kind {
            TypeKind::Literal { literal } => Some(match literal {
                LiteralValue::String(value) => ParserModel::string_literal(value.as_str()),
                LiteralValue::Number(value) => ParserModel::NumberLiteral { literal: *value },
                LiteralValue::Boolean(value) => ParserModel::BooleanLiteral { literal: *value },
                LiteralValue::Undefined => ParserModel::Undefined,
                LiteralValue::Null => ParserModel::Null,
            }),
            TypeKind::Intrinsic { intrinsic } => match intrinsic {
                IntrinsicKind::Null => Some(ParserModel::Null),
                IntrinsicKind::String => Some(ParserModel::String),
                IntrinsicKind::Number => Some(ParserModel::Number),
                _ => None,
            },
            _ => None,
        }
    }

    /// `boolean`, or a union whose leaves are exactly one `true` and one `false`.
    fn is_boolean_type(&self, id: TypeId) -> Result<bool> {
        let node = self.node(id)?;
        match &node.kind {
            TypeKind::Intrinsic {
                intrinsic: IntrinsicKind::Boolean,
            } => Ok(true),
            TypeKind::Union { .. } => {
                let mut leaves = Vec::new();
                if !self.collect_boolean_leaves(id, &mut leaves, 0)? {
                    return Ok(false);
                }
                leaves.sort_unstable();
                Ok(leaves == [false, true])
            }
            _ => Ok(false),
        }
    }

    fn collect_boolean_leaves(&self, id: TypeId, out: &mut Vec<bool>, depth: u32) -> Result<bool> {
        if depth > MAX_REFERENCE_HOPS {
            return Ok(false);
        }
        let node = self.node(id)?;
        if let Some(value) = node.boolean_literal() {
            out.push(value);
            return Ok(true);
        }
        let TypeKind::Union { members } = &node.kind else {
            return Ok(false);
        };
        for member in members {
            if !self.collect_boolean_leaves(*member, out, depth + 1)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Rules 7 to 12.
    fn generate_structured(
        &mut self,
        id: TypeId,
        node: &'a TypeNode,
        resolving_named: bool,
    ) -> Result<ParserModel> {
        if !resolving_named {
            if let Some(alias) = node.alias {
                return self.generate_named(id, alias);
            }
        }

        match &node.kind {
            TypeKind::Union { members } => {
                let one_of = members
                    .iter()
                    .map(|member| self.generate(*member, false))
                    .collect::<Result<Vec<_>>>()?;
                let model = normalize(ParserModel::Union { one_of });
                trace!(type_id = %id, "normalized union");
                Ok(model)
            }
            TypeKind::Array { element } => Ok(ParserModel::array(self.generate(*element, false)?)),
            TypeKind::Reference { name, .. } if self.is_array_container(*name) => {
                let Some(element) = self.service.type_arguments_of(id).first().copied() else {
                    let container = self
                        .service
                        .symbol(*name)
                        .map_or("Array", |info| info.name.as_str());
                    return Err(ModelExtractionError::missing_type_argument(id, container));
                };
                Ok(ParserModel::array(self.generate(element, false)?))
            }
            TypeKind::Object { shape } => {
                if !resolving_named && shape.is_class_or_interface() {
                    if let Some(symbol) = node.symbol {
                        return self.generate_named(id, symbol);
                    }
                }
                self.check_mergeable(id, &mut FxHashSet::default())?;
                self.generate_object(id)
            }
            TypeKind::Intersection { .. } => {
                self.check_mergeable(id, &mut FxHashSet::default())?;
                self.generate_object(id)
            }
            TypeKind::Intrinsic { .. }
            | TypeKind::Literal { .. }
            | TypeKind::Tuple { .. }
            | TypeKind::Reference { .. }
            | TypeKind::IndexAccess { .. }
            | TypeKind::TypeParameter { .. }
            | TypeKind::Function { .. }
            | TypeKind::Mapped { .. } => Err(ModelExtractionError::unsupported_type(
                id,
                node.kind.describe(),
            )),
        }
    }

    /// Every part `properties_of` reads must be an object shape without an
    /// index signature.
    fn check_mergeable(&self, id: TypeId, seen: &mut FxHashSet<TypeId>) -> Result<()> {
        let (id, node) = self.apparent(id)?;
        if !seen.insert(id) {
            return Ok(());
        }
        match &node.kind {
            TypeKind::Object { shape } => {
                if shape.string_index.is_some() {
                    return Err(ModelExtractionError::unsupported_type(
                        id,
                        "index signature in",
                    ));
                }
                for parent in &shape.heritage {
                    self.check_mergeable(*parent, seen)?;
                }
                Ok(())
            }
            TypeKind::Intersection { members } => {
                for member in members {
                    self.check_mergeable(*member, seen)?;
                }
                Ok(())
            }
            other => {
                trace!(type_id = %id, "part cannot be merged into an object");
                Err(ModelExtractionError::unsupported_type(id, other.describe()))
            }
        }
    }

    /// Rule 11: members in declaration order, inherited members after own.
    fn generate_object(&mut self, id: TypeId) -> Result<ParserModel> {
        let properties = self.service.properties_of(id);
        let mut members = Vec::with_capacity(properties.len());
        for property in properties {
            let mut model = self.generate(property.ty, false)?;
            if property.optional {
                model = strip_optional(model);
            }
            members.push(Member::new(property.name, property.optional, model));
        }
        Ok(ParserModel::Object { members })
    }

    /// Synthesize a named type's body into the memo and return a reference.
    fn generate_named(&mut self, id: TypeId, symbol: SymbolId) -> Result<ParserModel> {
        let service = self.service;
        let info = service
            .symbol(symbol)
            .ok_or_else(|| ModelExtractionError::dangling_symbol(symbol))?;
        let name = self.names.name_for(symbol, info)?;

        debug!(type_id = %id, symbol = %symbol, name = %name, "synthesizing named type");
        self.memo.begin(symbol, name.clone());
        let body = self.generate(id, true)?;
        self.memo.complete(symbol, body);
        Ok(ParserModel::reference(name))
    }
}

#[cfg(test)]
#[path = "../tests/synthesize_tests.rs"]
mod tests;
