//! Symbols and declaration sites.

use crate::types::{DeclId, SymbolId, TypeId};
use serde::{Deserialize, Serialize};

/// Kind of named entity a symbol stands for.
///
/// | Kind | Closure | Parser model |
/// |------|---------|--------------|
/// | Interface | re-emitted | `Reference`, body in deps |
/// | Class | rejected | `Reference`, body in deps |
/// | TypeAlias | re-emitted | `Reference`, body in deps |
/// | Enum | re-emitted | union of member literals |
/// | EnumMember | redirects to its enum | literal |
/// | TypeParameter | constraint/default walked | unsupported |
/// | Import | ignored | n/a |
/// | Builtin | never expanded | containers only (`Array`) |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Interface,
    Class,
    TypeAlias,
    Enum,
    EnumMember,
    TypeParameter,
    Import,
    Builtin,
    Function,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    /// Module the symbol is declared in, if known.
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub declarations: Vec<DeclId>,
    /// The type a reference to this symbol resolves to.
    #[serde(default)]
    pub declared_type: Option<TypeId>,
}

impl SymbolInfo {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            module: None,
            declarations: Vec::new(),
            declared_type: None,
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Last segment of a qualified name (`ns.Inner.Color` -> `Color`).
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// A member of an interface declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MemberSignature {
    Property {
        name: String,
        #[serde(rename = "type")]
        ty: TypeId,
        #[serde(default)]
        optional: bool,
    },
    /// `[key: string]: T`
    Index {
        #[serde(rename = "type")]
        ty: TypeId,
    },
    /// Method signatures are not part of the data model and are skipped.
    Method { name: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub symbol: SymbolId,
}

/// Declaration payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeclKind {
    Interface {
        #[serde(default)]
        members: Vec<MemberSignature>,
        /// `extends` clause types.
        #[serde(default)]
        heritage: Vec<TypeId>,
        #[serde(default)]
        type_params: Vec<DeclId>,
    },
    TypeAlias {
        #[serde(rename = "type")]
        ty: TypeId,
        #[serde(default)]
        type_params: Vec<DeclId>,
    },
    Enum {
        #[serde(default)]
        members: Vec<EnumMember>,
    },
    EnumMember {
        parent: DeclId,
    },
    TypeParameter {
        constraint: Option<TypeId>,
        default: Option<TypeId>,
    },
    /// `import { User } from "./user"`; the imported symbol is resolved by the
    /// host, the binding itself carries nothing to walk.
    ImportBinding,
    Class,
    Function,
}

impl DeclKind {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Interface { .. } => "interface",
            Self::TypeAlias { .. } => "type alias",
            Self::Enum { .. } => "enum",
            Self::EnumMember { .. } => "enum member",
            Self::TypeParameter { .. } => "type parameter",
            Self::ImportBinding => "import binding",
            Self::Class => "class",
            Self::Function => "function",
        }
    }
}

/// A named definition site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub symbol: SymbolId,
    #[serde(flatten)]
    pub kind: DeclKind,
    /// Declared in a library / ambient file (`lib.d.ts`, `node_modules`).
    #[serde(default)]
    pub external: bool,
}

impl Declaration {
    pub fn new(symbol: SymbolId, kind: DeclKind) -> Self {
        Self {
            symbol,
            kind,
            external: false,
        }
    }
}
