//! Service-level extraction over exported function signatures.
//!
//! A service is a list of functions. Their parameter and return types seed the
//! declaration closure, and each function gets a parser model for its
//! parameters and one for its (promise-unwrapped) return value.

use crate::closure::{Closure, closure};
use crate::error::{ModelExtractionError, Result};
use crate::options::ExtractOptions;
use crate::parser_model::{Member, ParserModel, ParserModelMap};
use crate::synthesize::{ModelGenerator, synthesize};
use crate::union::strip_optional;
use phero_types::service::PROMISE_CONTAINER_NAMES;
use phero_types::{SymbolKind, TypeId, TypeKind, TypeResolutionService};
use tracing::{debug, trace};

/// How an exported function is named in source.
#[derive(Clone, Debug, PartialEq)]
pub enum FunctionName {
    Identifier(String),
    /// `{ "get-user": ... }`
    StringLiteral(String),
    /// `{ 42: ... }`
    NumericLiteral(String),
    /// `{ [key]: ... }`
    Computed,
    /// `{ #name: ... }`
    PrivateIdentifier(String),
    /// `const { a } = ...`
    BindingPattern,
}

impl FunctionName {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Identifier(_) => "identifier",
            Self::StringLiteral(_) => "string literal",
            Self::NumericLiteral(_) => "numeric literal",
            Self::Computed => "computed property name",
            Self::PrivateIdentifier(_) => "private identifier",
            Self::BindingPattern => "binding pattern",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub optional: bool,
    pub ty: TypeId,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            optional: false,
            ty,
        }
    }

    pub fn optional(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            optional: true,
            ty,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionSignature {
    pub name: FunctionName,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeId,
}

/// The name a function is exposed under.
pub fn validate_function_name(name: &FunctionName) -> Result<&str> {
    match name {
        FunctionName::Identifier(text) | FunctionName::StringLiteral(text) => Ok(text),
        FunctionName::NumericLiteral(_)
        | FunctionName::Computed
        | FunctionName::PrivateIdentifier(_)
        | FunctionName::BindingPattern => {
            Err(ModelExtractionError::unresolvable_name(name.describe()))
        }
    }
}

/// Whether `ty` is a written reference to the request-context type.
fn is_context_type<S>(service: &S, ty: TypeId, options: &ExtractOptions) -> bool
where
    S: TypeResolutionService + ?Sized,
{
    let Some(TypeKind::Reference { name, .. }) = service.resolve(ty).map(|n| &n.kind) else {
        return false;
    };
    service
        .symbol(*name)
        .is_some_and(|info| info.simple_name() == options.context_type_name)
}

/// Parameters that carry request data: a leading context parameter is dropped.
pub fn data_parameters<'f, S>(
    service: &S,
    function: &'f FunctionSignature,
    options: &ExtractOptions,
) -> &'f [Parameter]
where
    S: TypeResolutionService + ?Sized,
{
    match function.parameters.split_first() {
        Some((first, rest)) if is_context_type(service, first.ty, options) => {
            trace!(parameter = %first.name, "skipping context parameter");
            rest
        }
        _ => &function.parameters,
    }
}

/// Closure roots of a service: all parameter types, then all return types.
pub fn service_roots<S>(
    service: &S,
    functions: &[FunctionSignature],
    options: &ExtractOptions,
) -> Vec<TypeId>
where
    S: TypeResolutionService + ?Sized,
{
    let params = functions
        .iter()
        .flat_map(|f| data_parameters(service, f, options))
        .map(|p| p.ty);
    let returns = functions.iter().map(|f| f.return_type);
    params.chain(returns).collect()
}

/// Declarations a service's signatures depend on.
pub fn extract_declarations<S>(
    service: &S,
    functions: &[FunctionSignature],
    options: &ExtractOptions,
) -> Result<Closure>
where
    S: TypeResolutionService + ?Sized,
{
    for function in functions {
        validate_function_name(&function.name)?;
    }
    let roots = service_roots(service, functions, options);
    debug!(
        functions = functions.len(),
        roots = roots.len(),
        "extracting service declarations"
    );
    closure(service, &roots, options)
}

/// The type a function resolves to: `T` for `Promise<T>`, else the return type.
pub fn resolved_return_type<S>(service: &S, function: &FunctionSignature) -> Result<TypeId>
where
    S: TypeResolutionService + ?Sized,
{
    let ty = function.return_type;
    let node = service
        .resolve(ty)
        .ok_or_else(|| ModelExtractionError::dangling_type(ty))?;
    let TypeKind::Reference { name, .. } = &node.kind else {
        return Ok(ty);
    };
    let Some(info) = service.symbol(*name) else {
        return Ok(ty);
    };
    if info.kind != SymbolKind::Builtin || !PROMISE_CONTAINER_NAMES.contains(&info.name.as_str()) {
        return Ok(ty);
    }
    service
        .type_arguments_of(ty)
        .first()
        .copied()
        .ok_or_else(|| ModelExtractionError::missing_type_argument(ty, &info.name))
}

/// Parser model of the value a function returns.
pub fn synthesize_return<S>(
    service: &S,
    function: &FunctionSignature,
    options: &ExtractOptions,
) -> Result<ParserModelMap>
where
    S: TypeResolutionService + ?Sized,
{
    let name = validate_function_name(&function.name)?;
    trace!(function = name, "synthesizing return type");
    let ty = resolved_return_type(service, function)?;
    synthesize(service, ty, options)
}

/// Parser model of a function's data parameters, as one object.
pub fn synthesize_parameters<S>(
    service: &S,
    function: &FunctionSignature,
    options: &ExtractOptions,
) -> Result<ParserModelMap>
where
    S: TypeResolutionService + ?Sized,
{
    let name = validate_function_name(&function.name)?;
    trace!(function = name, "synthesizing parameters");
    let mut generator = ModelGenerator::new(service, options);
    let mut members = Vec::new();
    for parameter in data_parameters(service, function, options) {
        let mut model = generator.generate_root(parameter.ty)?;
        if parameter.optional {
            model = strip_optional(model);
        }
        members.push(Member::new(
            parameter.name.as_str(),
            parameter.optional,
            model,
        ));
    }
    Ok(ParserModelMap {
        root: ParserModel::Object { members },
        deps: generator.finish(),
    })
}

#[cfg(test)]
#[path = "../tests/functions_tests.rs"]
mod tests;
