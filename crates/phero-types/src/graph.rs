//! In-memory host type graph.
//!
//! `TypeGraph` is the reference [`TypeResolutionService`]: hosts that cannot
//! answer queries live (e.g. a type checker in another process) serialize a
//! snapshot of their program into this shape, and every test in the workspace
//! builds its fixtures through the builder methods below.
//!
//! ## Usage
//!
//! ```ignore
//! let mut g = TypeGraph::new();
//! let name = g.string();
//! let user = g.interface("User", vec![Property::new("name", name)], vec![]);
//! let root = g.reference(user);
//! ```
//!
//! Named types are created in two steps (`declare` + `define_*`) so that
//! mutually recursive declarations can reference each other before their
//! bodies exist.

use crate::decl::{DeclKind, Declaration, EnumMember, MemberSignature, SymbolInfo, SymbolKind};
use crate::service::TypeResolutionService;
use crate::types::{
    DeclId, IntrinsicKind, LiteralValue, ObjectFlags, ObjectShape, Property, SymbolId, TypeId,
    TypeKind, TypeNode,
};
use phero_common::limits::MAX_REFERENCE_HOPS;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TypeGraph {
    nodes: Vec<TypeNode>,
    symbols: Vec<SymbolInfo>,
    declarations: Vec<Declaration>,

    #[serde(skip)]
    intrinsics: FxHashMap<IntrinsicKind, TypeId>,
    #[serde(skip)]
    builtins: FxHashMap<String, SymbolId>,
    #[serde(skip)]
    current_module: Option<String>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // -------------------------------------------------------------------------
    // Raw allocation
    // -------------------------------------------------------------------------

    pub fn add_node(&mut self, node: TypeNode) -> TypeId {
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn add_symbol(&mut self, mut info: SymbolInfo) -> SymbolId {
        if info.module.is_none() {
            info.module.clone_from(&self.current_module);
        }
        let id = SymbolId(self.symbols.len() as u32);
        trace!(symbol = %id, name = %info.name, kind = ?info.kind, "TypeGraph::add_symbol");
        self.symbols.push(info);
        id
    }

    /// Register a declaration and attach it to its symbol.
    pub fn add_declaration(&mut self, declaration: Declaration) -> DeclId {
        let id = DeclId(self.declarations.len() as u32);
        if let Some(info) = self.symbols.get_mut(declaration.symbol.0 as usize) {
            info.declarations.push(id);
        }
        self.declarations.push(declaration);
        id
    }

    /// Module assigned to symbols declared from now on.
    pub fn set_module(&mut self, module: Option<&str>) {
        self.current_module = module.map(str::to_owned);
    }

    /// Mark every declaration of `symbol` as coming from an ambient library.
    pub fn mark_external(&mut self, symbol: SymbolId) {
        let decls = self.declarations_of(symbol).to_vec();
        for decl in decls {
            if let Some(d) = self.declarations.get_mut(decl.0 as usize) {
                d.external = true;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Keyword and literal types
    // -------------------------------------------------------------------------

    pub fn intrinsic(&mut self, kind: IntrinsicKind) -> TypeId {
        if let Some(&id) = self.intrinsics.get(&kind) {
            return id;
        }
        let id = self.add_node(TypeNode::new(TypeKind::Intrinsic { intrinsic: kind }));
        self.intrinsics.insert(kind, id);
        id
    }

    pub fn string(&mut self) -> TypeId {
        self.intrinsic(IntrinsicKind::String)
    }

    pub fn number(&mut self) -> TypeId {
        self.intrinsic(IntrinsicKind::Number)
    }

    pub fn boolean(&mut self) -> TypeId {
        self.intrinsic(IntrinsicKind::Boolean)
    }

    pub fn undefined(&mut self) -> TypeId {
        self.intrinsic(IntrinsicKind::Undefined)
    }

    pub fn literal(&mut self, literal: LiteralValue) -> TypeId {
        self.add_node(TypeNode::new(TypeKind::Literal { literal }))
    }

    pub fn string_literal(&mut self, value: &str) -> TypeId {
        self.literal(LiteralValue::String(value.to_owned()))
    }

    pub fn number_literal(&mut self, value: f64) -> TypeId {
        self.literal(LiteralValue::Number(value))
    }

    pub fn boolean_literal(&mut self, value: bool) -> TypeId {
        self.literal(LiteralValue::Boolean(value))
    }

    pub fn undefined_literal(&mut self) -> TypeId {
        self.literal(LiteralValue::Undefined)
    }

    pub fn null_literal(&mut self) -> TypeId {
        self.literal(LiteralValue::Null)
    }

    // -------------------------------------------------------------------------
    // Structural types
    // -------------------------------------------------------------------------

    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        self.add_node(TypeNode::new(TypeKind::Union { members }))
    }

    pub fn intersection(&mut self, members: Vec<TypeId>) -> TypeId {
        self.add_node(TypeNode::new(TypeKind::Intersection { members }))
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.add_node(TypeNode::new(TypeKind::Array { element }))
    }

    pub fn tuple(&mut self, elements: Vec<TypeId>) -> TypeId {
        self.add_node(TypeNode::new(TypeKind::Tuple { elements }))
    }

    /// Anonymous object type literal.
    pub fn object(&mut self, properties: Vec<Property>) -> TypeId {
        self.add_node(TypeNode::new(TypeKind::Object {
            shape: ObjectShape {
                flags: ObjectFlags::ANONYMOUS,
                properties,
                string_index: None,
                heritage: Vec::new(),
            },
        }))
    }

    /// Anonymous object type literal with a string index signature.
    pub fn object_with_index(&mut self, properties: Vec<Property>, value: TypeId) -> TypeId {
        self.add_node(TypeNode::new(TypeKind::Object {
            shape: ObjectShape {
                flags: ObjectFlags::ANONYMOUS,
                properties,
                string_index: Some(value),
                heritage: Vec::new(),
            },
        }))
    }

    pub fn index_access(&mut self, object: TypeId, index: TypeId) -> TypeId {
        self.add_node(TypeNode::new(TypeKind::IndexAccess { object, index }))
    }

    pub fn function(&mut self, params: Vec<TypeId>, ret: TypeId) -> TypeId {
        self.add_node(TypeNode::new(TypeKind::Function { params, ret }))
    }

    pub fn mapped(&mut self, key: TypeId, template: TypeId) -> TypeId {
        self.add_node(TypeNode::new(TypeKind::Mapped { key, template }))
    }

    // -------------------------------------------------------------------------
    // Named types
    // -------------------------------------------------------------------------

    /// Create a symbol and reserve the node its references resolve to.
    ///
    /// The reserved node is an empty shape until the matching `define_*` call.
    pub fn declare(&mut self, name: &str, kind: SymbolKind) -> SymbolId {
        let sym = self.add_symbol(SymbolInfo::new(name, kind));
        let flags = match kind {
            SymbolKind::Class => ObjectFlags::CLASS,
            SymbolKind::Interface => ObjectFlags::INTERFACE,
            _ => ObjectFlags::ANONYMOUS,
        };
        let mut node = TypeNode::new(TypeKind::Object {
            shape: ObjectShape {
                flags,
                ..ObjectShape::default()
            },
        });
        match kind {
            SymbolKind::TypeAlias => node.alias = Some(sym),
            _ => node.symbol = Some(sym),
        }
        let slot = self.add_node(node);
        self.set_declared_type(sym, slot);
        sym
    }

    pub fn define_interface(
        &mut self,
        sym: SymbolId,
        properties: Vec<Property>,
        heritage: Vec<TypeId>,
    ) -> TypeId {
        let members = properties
            .iter()
            .map(|p| MemberSignature::Property {
                name: p.name.clone(),
                ty: p.ty,
                optional: p.optional,
            })
            .collect();
        self.add_declaration(Declaration::new(
            sym,
            DeclKind::Interface {
                members,
                heritage: heritage.clone(),
                type_params: Vec::new(),
            },
        ));
        self.fill_slot(
            sym,
            TypeKind::Object {
                shape: ObjectShape {
                    flags: ObjectFlags::INTERFACE,
                    properties,
                    string_index: None,
                    heritage,
                },
            },
        )
    }

    /// Declare and define an interface in one step.
    pub fn interface(
        &mut self,
        name: &str,
        properties: Vec<Property>,
        heritage: Vec<TypeId>,
    ) -> SymbolId {
        let sym = self.declare(name, SymbolKind::Interface);
        self.define_interface(sym, properties, heritage);
        sym
    }

    pub fn define_class(&mut self, sym: SymbolId, properties: Vec<Property>) -> TypeId {
        self.add_declaration(Declaration::new(sym, DeclKind::Class));
        self.fill_slot(
            sym,
            TypeKind::Object {
                shape: ObjectShape {
                    flags: ObjectFlags::CLASS,
                    properties,
                    string_index: None,
                    heritage: Vec::new(),
                },
            },
        )
    }

    pub fn class(&mut self, name: &str, properties: Vec<Property>) -> SymbolId {
        let sym = self.declare(name, SymbolKind::Class);
        self.define_class(sym, properties);
        sym
    }

    /// Give a declared type alias its body.
    ///
    /// The body's structure is copied into the alias slot and tagged with the
    /// alias identity. A body that is itself a reference (`type X = Y`) stays
    /// untagged, so `X` resolves to `Y`'s type and keeps `Y`'s identity.
    /// Returns `None` and records nothing when `body` is not in the graph.
    pub fn define_alias(&mut self, sym: SymbolId, body: TypeId) -> Option<TypeId> {
        let kind = self.nodes.get(body.0 as usize)?.kind.clone();
        self.add_declaration(Declaration::new(
            sym,
            DeclKind::TypeAlias {
                ty: body,
                type_params: Vec::new(),
            },
        ));
        let is_reference = matches!(kind, TypeKind::Reference { .. });
        let slot = self.fill_slot(sym, kind);
        if is_reference {
            if let Some(node) = self.nodes.get_mut(slot.0 as usize) {
                node.alias = None;
            }
        }
        Some(slot)
    }

    pub fn type_alias(&mut self, name: &str, body: TypeId) -> SymbolId {
        let sym = self.declare(name, SymbolKind::TypeAlias);
        self.define_alias(sym, body);
        sym
    }

    /// Attach type parameter declarations to a generic interface or alias.
    pub fn add_type_params(&mut self, sym: SymbolId, params: &[SymbolId]) {
        let param_decls: Vec<DeclId> = params
            .iter()
            .flat_map(|p| self.declarations_of(*p).to_vec())
            .collect();
        let decls = self.declarations_of(sym).to_vec();
        for decl in decls {
            match self.declarations.get_mut(decl.0 as usize).map(|d| &mut d.kind) {
                Some(
                    DeclKind::Interface { type_params, .. } | DeclKind::TypeAlias { type_params, .. },
                ) => {
                    type_params.extend(param_decls.iter().copied());
                }
                _ => {}
            }
        }
    }

    pub fn type_parameter(
        &mut self,
        name: &str,
        constraint: Option<TypeId>,
        default: Option<TypeId>,
    ) -> SymbolId {
        let sym = self.add_symbol(SymbolInfo::new(name, SymbolKind::TypeParameter));
        self.add_declaration(Declaration::new(
            sym,
            DeclKind::TypeParameter {
                constraint,
                default,
            },
        ));
        let mut node = TypeNode::new(TypeKind::TypeParameter {
            constraint,
            default,
        });
        node.symbol = Some(sym);
        let id = self.add_node(node);
        self.set_declared_type(sym, id);
        sym
    }

    /// Declare an enum; its type is the union of its member literal types.
    pub fn enumeration(&mut self, name: &str, members: Vec<(&str, LiteralValue)>) -> SymbolId {
        let enum_sym = self.add_symbol(SymbolInfo::new(name, SymbolKind::Enum));
        let enum_decl = DeclId(self.declarations.len() as u32);
        self.add_declaration(Declaration::new(
            enum_sym,
            DeclKind::Enum {
                members: Vec::new(),
            },
        ));

        let mut enum_members = Vec::with_capacity(members.len());
        let mut member_types = Vec::with_capacity(members.len());
        for (member_name, value) in members {
            let member_sym = self.add_symbol(SymbolInfo::new(
                format!("{name}.{member_name}"),
                SymbolKind::EnumMember,
            ));
            self.add_declaration(Declaration::new(
                member_sym,
                DeclKind::EnumMember { parent: enum_decl },
            ));
            let mut node = TypeNode::new(TypeKind::Literal { literal: value });
            node.symbol = Some(member_sym);
            let ty = self.add_node(node);
            self.set_declared_type(member_sym, ty);
            enum_members.push(EnumMember {
                name: member_name.to_owned(),
                symbol: member_sym,
            });
            member_types.push(ty);
        }

        if let Some(DeclKind::Enum { members }) = self
            .declarations
            .get_mut(enum_decl.0 as usize)
            .map(|d| &mut d.kind)
        {
            *members = enum_members;
        }
        let mut node = TypeNode::new(TypeKind::Union {
            members: member_types,
        });
        node.symbol = Some(enum_sym);
        let ty = self.add_node(node);
        self.set_declared_type(enum_sym, ty);
        enum_sym
    }

    /// Symbol of a named enum member.
    pub fn enum_member(&self, enum_sym: SymbolId, member: &str) -> Option<SymbolId> {
        self.declarations_of(enum_sym)
            .iter()
            .filter_map(|d| self.declaration(*d))
            .find_map(|d| match &d.kind {
                DeclKind::Enum { members } => members
                    .iter()
                    .find(|m| m.name == member)
                    .map(|m| m.symbol),
                _ => None,
            })
    }

    /// `import { name } from "..."` binding that resolves to `target`.
    pub fn import_binding(&mut self, name: &str, target: SymbolId) -> SymbolId {
        let sym = self.add_symbol(SymbolInfo::new(name, SymbolKind::Import));
        self.add_declaration(Declaration::new(sym, DeclKind::ImportBinding));
        if let Some(declared) = self.declared_type(target) {
            self.set_declared_type(sym, declared);
        }
        sym
    }

    /// A symbol that is never expanded (`Array`, `Promise`, ...).
    pub fn builtin(&mut self, name: &str) -> SymbolId {
        if let Some(&sym) = self.builtins.get(name) {
            return sym;
        }
        let existing = self
            .symbols
            .iter()
            .position(|s| s.kind == SymbolKind::Builtin && s.name == name);
        let sym = match existing {
            Some(index) => SymbolId(index as u32),
            None => {
                let saved = self.current_module.take();
                let sym = self.add_symbol(SymbolInfo::new(name, SymbolKind::Builtin));
                self.current_module = saved;
                sym
            }
        };
        self.builtins.insert(name.to_owned(), sym);
        sym
    }

    // -------------------------------------------------------------------------
    // References
    // -------------------------------------------------------------------------

    /// A written reference to a named type.
    pub fn reference(&mut self, sym: SymbolId) -> TypeId {
        self.generic_reference(sym, Vec::new())
    }

    pub fn generic_reference(&mut self, sym: SymbolId, args: Vec<TypeId>) -> TypeId {
        let target = self.symbols.get(sym.0 as usize).and_then(|s| s.declared_type);
        self.add_node(TypeNode::new(TypeKind::Reference {
            name: sym,
            target,
            args,
        }))
    }

    pub fn builtin_reference(&mut self, name: &str, args: Vec<TypeId>) -> TypeId {
        let sym = self.builtin(name);
        self.generic_reference(sym, args)
    }

    /// `Array<element>`.
    pub fn array_of(&mut self, element: TypeId) -> TypeId {
        self.builtin_reference("Array", vec![element])
    }

    /// `Promise<inner>`.
    pub fn promise_of(&mut self, inner: TypeId) -> TypeId {
        self.builtin_reference("Promise", vec![inner])
    }

    /// Type a symbol's references resolve to.
    pub fn declared_type(&self, sym: SymbolId) -> Option<TypeId> {
        self.symbols.get(sym.0 as usize).and_then(|s| s.declared_type)
    }

    fn fill_slot(&mut self, sym: SymbolId, kind: TypeKind) -> TypeId {
        let slot = match self.declared_type(sym) {
            Some(slot) => slot,
            None => {
                let id = self.add_node(TypeNode::new(kind.clone()));
                self.set_declared_type(sym, id);
                id
            }
        };
        if let Some(node) = self.nodes.get_mut(slot.0 as usize) {
            node.kind = kind;
        }
        slot
    }

    fn set_declared_type(&mut self, sym: SymbolId, ty: TypeId) {
        if let Some(info) = self.symbols.get_mut(sym.0 as usize) {
            info.declared_type = Some(ty);
        }
    }

    /// Follow written references to the type they denote.
    fn apparent(&self, mut id: TypeId) -> TypeId {
        for _ in 0..MAX_REFERENCE_HOPS {
            match self.resolve(id).map(|n| &n.kind) {
                Some(TypeKind::Reference {
                    target: Some(target),
                    ..
                }) => id = *target,
                _ => break,
            }
        }
        id
    }

    fn collect_properties(
        &self,
        id: TypeId,
        out: &mut Vec<Property>,
        visited: &mut FxHashSet<TypeId>,
    ) {
        let id = self.apparent(id);
        if !visited.insert(id) {
            return;
        }
        let Some(node) = self.resolve(id) else {
            return;
        };
        match &node.kind {
            TypeKind::Object { shape } => {
                for prop in &shape.properties {
                    if !out.iter().any(|p| p.name == prop.name) {
                        out.push(prop.clone());
                    }
                }
                for parent in &shape.heritage {
                    self.collect_properties(*parent, out, visited);
                }
            }
            TypeKind::Intersection { members } => {
                for member in members {
                    self.collect_properties(*member, out, visited);
                }
            }
            _ => {}
        }
    }
}

impl TypeResolutionService for TypeGraph {
    fn resolve(&self, id: TypeId) -> Option<&TypeNode> {
        self.nodes.get(id.0 as usize)
    }

    fn symbol(&self, id: SymbolId) -> Option<&SymbolInfo> {
        self.symbols.get(id.0 as usize)
    }

    fn declaration(&self, id: DeclId) -> Option<&Declaration> {
        self.declarations.get(id.0 as usize)
    }

    fn properties_of(&self, id: TypeId) -> Vec<Property> {
        let mut out = Vec::new();
        let mut visited = FxHashSet::default();
        self.collect_properties(id, &mut out, &mut visited);
        out
    }
}
