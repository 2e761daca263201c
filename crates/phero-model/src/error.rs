//! The single error kind raised by extraction.
//!
//! Errors are fatal for the top-level call that raised them: no partial
//! closure or dependency map is ever returned alongside one.

use phero_common::DiagnosticCode;
use phero_types::{DeclId, SymbolId, TypeId};
use std::fmt;

pub type Result<T> = std::result::Result<T, ModelExtractionError>;

/// What an error points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorSubject {
    Type(TypeId),
    Declaration(DeclId),
    Symbol(SymbolId),
    /// A name with no graph node behind it (function names, emitted names).
    Name(String),
}

impl fmt::Display for ErrorSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(id) => write!(f, "type {id}"),
            Self::Declaration(id) => write!(f, "declaration {id}"),
            Self::Symbol(id) => write!(f, "symbol {id}"),
            Self::Name(name) => write!(f, "name `{name}`"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("S{}: {}", .code.code(), render(.code, .detail))]
pub struct ModelExtractionError {
    pub code: DiagnosticCode,
    pub subject: ErrorSubject,
    /// Argument substituted into the diagnostic template.
    pub detail: String,
}

fn render(code: &DiagnosticCode, detail: &str) -> String {
    code.render(&[detail])
}

impl ModelExtractionError {
    pub fn new(code: DiagnosticCode, subject: ErrorSubject, detail: impl Into<String>) -> Self {
        Self {
            code,
            subject,
            detail: detail.into(),
        }
    }

    pub fn unsupported_type(id: TypeId, description: &str) -> Self {
        Self::new(
            DiagnosticCode::UnsupportedTypeShape,
            ErrorSubject::Type(id),
            format!("{description} {id}"),
        )
    }

    pub fn unsupported_declaration(id: DeclId, name: &str, description: &str) -> Self {
        Self::new(
            DiagnosticCode::UnsupportedDeclaration,
            ErrorSubject::Declaration(id),
            format!("{name} ({description})"),
        )
    }

    pub fn missing_type_argument(id: TypeId, container: &str) -> Self {
        Self::new(
            DiagnosticCode::MissingTypeArgument,
            ErrorSubject::Type(id),
            container,
        )
    }

    pub fn unresolvable_name(description: &str) -> Self {
        Self::new(
            DiagnosticCode::UnresolvableName,
            ErrorSubject::Name(description.to_owned()),
            description,
        )
    }

    pub fn recursion_limit(id: TypeId, reason: &str) -> Self {
        Self::new(
            DiagnosticCode::RecursionLimit,
            ErrorSubject::Type(id),
            format!("{id} ({reason})"),
        )
    }

    pub fn declaration_recursion_limit(id: DeclId, reason: &str) -> Self {
        Self::new(
            DiagnosticCode::RecursionLimit,
            ErrorSubject::Declaration(id),
            format!("{id} ({reason})"),
        )
    }

    pub fn name_collision(symbol: SymbolId, name: &str, first: &str, second: &str) -> Self {
        Self::new(
            DiagnosticCode::NameCollision,
            ErrorSubject::Symbol(symbol),
            format!("{name} (declared in {first} and {second})"),
        )
    }

    pub fn dangling_type(id: TypeId) -> Self {
        Self::new(DiagnosticCode::DanglingNode, ErrorSubject::Type(id), id.to_string())
    }

    pub fn dangling_symbol(id: SymbolId) -> Self {
        Self::new(
            DiagnosticCode::DanglingNode,
            ErrorSubject::Symbol(id),
            id.to_string(),
        )
    }

    pub fn dangling_declaration(id: DeclId) -> Self {
        Self::new(
            DiagnosticCode::DanglingNode,
            ErrorSubject::Declaration(id),
            id.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_diagnostic_table() {
        let err = ModelExtractionError::missing_type_argument(TypeId(4), "Array");
        assert_eq!(err.to_string(), "S103: Array has no type argument");
    }

    #[test]
    fn unsupported_type_names_the_node() {
        let err = ModelExtractionError::unsupported_type(TypeId(9), "function type");
        assert_eq!(err.code, DiagnosticCode::UnsupportedTypeShape);
        assert_eq!(err.subject, ErrorSubject::Type(TypeId(9)));
        assert_eq!(
            err.to_string(),
            "S101: Model extracting not possible for function type #9"
        );
    }

    #[test]
    fn collision_mentions_both_modules() {
        let err = ModelExtractionError::name_collision(SymbolId(2), "User", "a", "b");
        assert!(err.to_string().contains("declared in a and b"));
    }
}
