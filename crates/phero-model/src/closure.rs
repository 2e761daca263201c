//! Declaration closure.
//!
//! Starting from a set of root types, collect every named declaration the
//! roots depend on so a renderer can re-emit them next to the generated code.
//! Entries come out in first-visit depth-first order; a symbol is expanded at
//! most once.

use crate::error::{ModelExtractionError, Result};
use crate::naming::NameRegistry;
use crate::options::ExtractOptions;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use phero_types::{
    DeclId, DeclKind, Declaration, MemberSignature, SymbolId, SymbolInfo, SymbolKind, TypeId,
    TypeKind, TypeNode, TypeResolutionService,
};
use rustc_hash::FxHashSet;
use tracing::{debug, debug_span, trace};

/// One re-emitted declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClosureEntry {
    pub declaration: DeclId,
    pub symbol: SymbolId,
    /// Name the declaration is emitted under.
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Closure {
    pub entries: Vec<ClosureEntry>,
}

impl Closure {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn declarations(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.entries.iter().map(|e| e.declaration)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn contains(&self, symbol: SymbolId) -> bool {
        self.entries.iter().any(|e| e.symbol == symbol)
    }
}

/// Collect the declarations reachable from `roots`.
pub fn closure<S>(service: &S, roots: &[TypeId], options: &ExtractOptions) -> Result<Closure>
where
    S: TypeResolutionService + ?Sized,
{
    let _span = debug_span!("closure", roots = roots.len()).entered();
    let mut walker = ClosureWalker::new(service, options);
    for root in roots {
        walker.walk_type(*root)?;
    }
    debug!(entries = walker.entries.len(), "collected declaration closure");
    Ok(Closure {
        entries: walker.entries,
    })
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum WalkKey {
    Type(TypeId),
    Decl(DeclId),
}

struct ClosureWalker<'a, S: TypeResolutionService + ?Sized> {
    service: &'a S,
    options: &'a ExtractOptions,
    guard: RecursionGuard<WalkKey>,
    expanded: FxHashSet<SymbolId>,
    names: NameRegistry,
    entries: Vec<ClosureEntry>,
}

impl<'a, S: TypeResolutionService + ?Sized> ClosureWalker<'a, S> {
    fn new(service: &'a S, options: &'a ExtractOptions) -> Self {
        let profile = options.recursion_profile(RecursionProfile::Closure);
        Self {
            service,
            options,
            guard: RecursionGuard::with_profile(profile),
            expanded: FxHashSet::default(),
            names: NameRegistry::new(options.name_policy),
            entries: Vec::new(),
        }
    }

    fn symbol(&self, id: SymbolId) -> Result<&'a SymbolInfo> {
        let service = self.service;
        service
            .symbol(id)
            .ok_or_else(|| ModelExtractionError::dangling_symbol(id))
    }

    fn is_builtin(&self, info: &SymbolInfo) -> bool {
        info.kind == SymbolKind::Builtin
            || self.service.is_builtin(&info.name)
            || self.options.is_extra_builtin(&info.name)
    }

    /// Enter `key` on the walk path. `Ok(false)` means it is already there.
    fn enter(&mut self, key: WalkKey) -> Result<bool> {
        match self.guard.enter(key) {
            RecursionResult::Entered => Ok(true),
            RecursionResult::Cycle => Ok(false),
            denied => Err(match key {
                WalkKey::Type(id) => ModelExtractionError::recursion_limit(id, denied.reason()),
                WalkKey::Decl(id) => {
                    ModelExtractionError::declaration_recursion_limit(id, denied.reason())
                }
            }),
        }
    }

    fn walk_type(&mut self, id: TypeId) -> Result<()> {
        let service = self.service;
        let node = service
            .resolve(id)
            .ok_or_else(|| ModelExtractionError::dangling_type(id))?;

        let key = WalkKey::Type(id);
        if !self.enter(key)? {
            return Ok(());
        }
        let result = self.walk_node(id, node);
        self.guard.leave(key);
        result
    }

    fn walk_all(&mut self, ids: &[TypeId]) -> Result<()> {
        for id in ids {
            self.walk_type(*id)?;
        }
        Ok(())
    }

    fn walk_node(&mut self, id: TypeId, node: &'a TypeNode) -> Result<()> {
        if let TypeKind::Reference { name, target, args } = &node.kind {
            return self.walk_reference(id, *name, *target, args);
        }

        // A named type met directly (not through a written reference).
        if let Some(identity) = node.identity() {
            return self.expand_symbol(identity);
        }

        match &node.kind {
            TypeKind::Intrinsic { .. } | TypeKind::Literal { .. } => Ok(()),
            TypeKind::Union { members } | TypeKind::Intersection { members } => {
                self.walk_all(members)
            }
            TypeKind::Array { element } => self.walk_type(*element),
            TypeKind::Tuple { elements } => self.walk_all(elements),
            TypeKind::Object { shape } => {
                for property in &shape.properties {
                    self.walk_type(property.ty)?;
                }
                if let Some(value) = shape.string_index {
                    self.walk_type(value)?;
                }
                self.walk_all(&shape.heritage)
            }
            TypeKind::IndexAccess { object, index } => {
                self.walk_type(*object)?;
                self.walk_type(*index)
            }
            TypeKind::TypeParameter {
                constraint,
                default,
            } => {
                if let Some(constraint) = constraint {
                    self.walk_type(*constraint)?;
                }
                if let Some(default) = default {
                    self.walk_type(*default)?;
                }
                Ok(())
            }
            TypeKind::Function { .. } | TypeKind::Mapped { .. } => Err(
                ModelExtractionError::unsupported_type(id, node.kind.describe()),
            ),
            TypeKind::Reference { .. } => Ok(()),
        }
    }

    fn walk_reference(
        &mut self,
        id: TypeId,
        name: SymbolId,
        target: Option<TypeId>,
        args: &[TypeId],
    ) -> Result<()> {
        self.walk_all(args)?;

        let info = self.symbol(name)?;
        if self.is_builtin(info) {
            trace!(type_id = %id, name = %info.name, "builtin reference not expanded");
            return Ok(());
        }

        let Some(target) = target else {
            if self.service.declarations_of(name).is_empty() {
                return Err(ModelExtractionError::dangling_type(id));
            }
            return self.expand_symbol(name);
        };

        let service = self.service;
        let resolved = service
            .resolve(target)
            .ok_or_else(|| ModelExtractionError::dangling_type(target))?;
        match resolved.identity() {
            Some(identity) => self.expand_symbol(identity),
            // Alias of an alias, or an import of one: the written name carries
            // the declaration, the target leads to the inner one.
            None => {
                self.expand_symbol(name)?;
                self.walk_type(target)
            }
        }
    }

    fn expand_symbol(&mut self, symbol: SymbolId) -> Result<()> {
        if !self.expanded.insert(symbol) {
            return Ok(());
        }
        let info = self.symbol(symbol)?;
        if self.is_builtin(info) {
            return Ok(());
        }
        trace!(symbol = %symbol, name = %info.name, "expanding symbol");
        let service = self.service;
        for decl in service.declarations_of(symbol) {
            self.walk_declaration(*decl)?;
        }
        Ok(())
    }

    fn walk_declaration(&mut self, decl_id: DeclId) -> Result<()> {
        let service = self.service;
        let decl = service
            .declaration(decl_id)
            .ok_or_else(|| ModelExtractionError::dangling_declaration(decl_id))?;
        if decl.external {
            trace!(declaration = %decl_id, "external declaration skipped");
            return Ok(());
        }

        let key = WalkKey::Decl(decl_id);
        if !self.enter(key)? {
            return Ok(());
        }
        let result = self.walk_declaration_kind(decl_id, decl);
        self.guard.leave(key);
        result
    }

    fn walk_declaration_kind(&mut self, decl_id: DeclId, decl: &'a Declaration) -> Result<()> {
        match &decl.kind {
            DeclKind::Interface {
                members,
                heritage,
                type_params,
            } => {
                self.push(decl_id, decl)?;
                for member in members {
                    match member {
                        MemberSignature::Property { ty, .. } | MemberSignature::Index { ty } => {
                            self.walk_type(*ty)?;
                        }
                        MemberSignature::Method { .. } => {}
                    }
                }
                self.walk_all(heritage)?;
                self.walk_type_params(type_params)
            }
            DeclKind::TypeAlias { ty, type_params } => {
                self.push(decl_id, decl)?;
                self.walk_type(*ty)?;
                self.walk_type_params(type_params)
            }
            DeclKind::Enum { .. } => self.push(decl_id, decl),
            DeclKind::EnumMember { parent } => {
                let service = self.service;
                let parent_decl = service
                    .declaration(*parent)
                    .ok_or_else(|| ModelExtractionError::dangling_declaration(*parent))?;
                self.expand_symbol(parent_decl.symbol)
            }
            DeclKind::TypeParameter {
                constraint,
                default,
            } => {
                if let Some(constraint) = constraint {
                    self.walk_type(*constraint)?;
                }
                if let Some(default) = default {
                    self.walk_type(*default)?;
                }
                Ok(())
            }
            DeclKind::ImportBinding => Ok(()),
            DeclKind::Class | DeclKind::Function => {
                let info = self.symbol(decl.symbol)?;
                Err(ModelExtractionError::unsupported_declaration(
                    decl_id,
                    &info.name,
                    decl.kind.describe(),
                ))
            }
        }
    }

    fn walk_type_params(&mut self, params: &[DeclId]) -> Result<()> {
        for param in params {
            self.walk_declaration(*param)?;
        }
        Ok(())
    }

    fn push(&mut self, decl_id: DeclId, decl: &Declaration) -> Result<()> {
        let info = self.symbol(decl.symbol)?;
        let name = self.names.name_for(decl.symbol, info)?;
        trace!(declaration = %decl_id, name = %name, "closure entry");
        self.entries.push(ClosureEntry {
            declaration: decl_id,
            symbol: decl.symbol,
            name,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/closure_tests.rs"]
mod tests;
