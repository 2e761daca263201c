//! Parser-model synthesis and declaration closure extraction.
//!
//! Given a host type graph (see [`phero_types::TypeResolutionService`]), this
//! crate produces the two artifacts a service code generator needs:
//!
//! - **Declaration closure** ([`closure`]): every named interface, type alias
//!   and enum the service's types depend on, in first-visit order
//! - **Parser models** ([`synthesize`]): a validator description for a type,
//!   with one named dependency per interface or alias it reaches
//!
//! Both passes are single-threaded, allocate fresh state per call and fail
//! with a [`ModelExtractionError`] rather than approximate a shape they cannot
//! describe.

pub mod closure;
pub mod domain_errors;
pub mod error;
pub mod functions;
pub mod memo;
pub mod naming;
pub mod options;
pub mod parser_model;
pub mod recursion;
pub mod synthesize;
pub mod union;

#[cfg(test)]
mod test_support;

pub use closure::{Closure, ClosureEntry, closure};
pub use domain_errors::{ErrorFieldModels, ErrorTypeRecord, synthesize_error_fields};
pub use error::{ErrorSubject, ModelExtractionError, Result};
pub use functions::{
    FunctionName, FunctionSignature, Parameter, extract_declarations, service_roots,
    synthesize_parameters, synthesize_return, validate_function_name,
};
pub use memo::{MemoEntry, SymbolMemo};
pub use naming::NameRegistry;
pub use options::{ExtractConfig, ExtractOptions, NamePolicy};
pub use parser_model::{DependencyMap, Member, ParserModel, ParserModelMap};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use synthesize::{ModelGenerator, synthesize};
pub use union::{normalize, strip_optional};
