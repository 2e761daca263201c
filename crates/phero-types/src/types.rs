//! Type graph nodes and their closed classification.
//!
//! Every node the host hands to the extractor resolves to exactly one
//! [`TypeKind`]. Both traversals match on it exhaustively, so an unsupported
//! shape is a visible match arm rather than a fall-through.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

/// Index of a node in the host type graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

/// Stable identity of a named type-level entity.
///
/// Two symbols may share a name (e.g. `User` declared in two modules); they
/// never share a `SymbolId`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

/// Index of a declaration site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclId(pub u32);

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sym#{}", self.0)
    }
}

impl std::fmt::Display for DeclId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "decl#{}", self.0)
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Keyword types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntrinsicKind {
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    /// The `undefined` type as classified by the checker (not a written literal).
    Undefined,
    Null,
    Void,
    Any,
    Unknown,
    Never,
    Object,
}

impl IntrinsicKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::BigInt => "bigint",
            Self::Symbol => "symbol",
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Void => "void",
            Self::Any => "any",
            Self::Unknown => "unknown",
            Self::Never => "never",
            Self::Object => "object",
        }
    }
}

/// Literal types as written in source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    /// A written `undefined` in type position.
    Undefined,
    /// A written `null` in type position.
    Null,
}

bitflags! {
    /// Flags describing where an object shape came from.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ObjectFlags: u8 {
        /// Declared with `interface`.
        const INTERFACE = 1 << 0;
        /// Declared with `class`.
        const CLASS = 1 << 1;
        /// A type literal (`{ a: string }`) without a declaration of its own.
        const ANONYMOUS = 1 << 2;
    }
}

/// A named property of an object shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeId,
    #[serde(default)]
    pub optional: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: true,
        }
    }
}

/// Structural shape of an object, interface or class instance type.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectShape {
    #[serde(default)]
    pub flags: ObjectFlags,
    /// Own properties in declaration order.
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Value type of a `[key: string]: T` index signature.
    #[serde(default)]
    pub string_index: Option<TypeId>,
    /// `extends` clause types (references to parent interfaces).
    #[serde(default)]
    pub heritage: Vec<TypeId>,
}

impl ObjectShape {
    pub fn is_class_or_interface(&self) -> bool {
        self.flags
            .intersects(ObjectFlags::INTERFACE | ObjectFlags::CLASS)
    }
}

/// Closed structural classification of a type graph node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeKind {
    Intrinsic {
        intrinsic: IntrinsicKind,
    },
    Literal {
        literal: LiteralValue,
    },
    /// Union members exactly as written; nested unions are not flattened.
    Union {
        members: Vec<TypeId>,
    },
    Intersection {
        members: Vec<TypeId>,
    },
    /// `T[]` syntax.
    Array {
        element: TypeId,
    },
    Tuple {
        elements: Vec<TypeId>,
    },
    Object {
        shape: ObjectShape,
    },
    /// A named reference as written (`User`, `Array<T>`, `ns.Color`,
    /// `Color.Red`). `name` is the symbol the written name binds to; `target`
    /// is the type it resolves to, absent for builtins without a body.
    Reference {
        name: SymbolId,
        target: Option<TypeId>,
        #[serde(default)]
        args: Vec<TypeId>,
    },
    /// `T[K]`.
    IndexAccess {
        object: TypeId,
        index: TypeId,
    },
    /// A use of a type parameter.
    TypeParameter {
        constraint: Option<TypeId>,
        default: Option<TypeId>,
    },
    Function {
        #[serde(default)]
        params: Vec<TypeId>,
        ret: TypeId,
    },
    /// `{ [K in T]: V }`.
    Mapped {
        key: TypeId,
        template: TypeId,
    },
}

impl TypeKind {
    /// Short human-readable description used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Intrinsic { .. } => "keyword type",
            Self::Literal { .. } => "literal type",
            Self::Union { .. } => "union type",
            Self::Intersection { .. } => "intersection type",
            Self::Array { .. } => "array type",
            Self::Tuple { .. } => "tuple type",
            Self::Object { .. } => "object type",
            Self::Reference { .. } => "type reference",
            Self::IndexAccess { .. } => "indexed access type",
            Self::TypeParameter { .. } => "type parameter",
            Self::Function { .. } => "function type",
            Self::Mapped { .. } => "mapped type",
        }
    }
}

/// A node of the host type graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeNode {
    #[serde(flatten)]
    pub kind: TypeKind,
    /// Own symbol (interface, class, enum, enum member, type parameter).
    #[serde(default)]
    pub symbol: Option<SymbolId>,
    /// Alias identity: the type alias this node is the body of.
    #[serde(default)]
    pub alias: Option<SymbolId>,
}

impl TypeNode {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            symbol: None,
            alias: None,
        }
    }

    /// The identity a named type is known by: alias first, then own symbol.
    pub fn identity(&self) -> Option<SymbolId> {
        self.alias.or(self.symbol)
    }

    pub fn object_shape(&self) -> Option<&ObjectShape> {
        match &self.kind {
            TypeKind::Object { shape } => Some(shape),
            _ => None,
        }
    }

    pub fn is_class_or_interface(&self) -> bool {
        self.object_shape()
            .is_some_and(ObjectShape::is_class_or_interface)
    }

    pub fn boolean_literal(&self) -> Option<bool> {
        match &self.kind {
            TypeKind::Literal {
                literal: LiteralValue::Boolean(value),
            } => Some(*value),
            _ => None,
        }
    }
}
