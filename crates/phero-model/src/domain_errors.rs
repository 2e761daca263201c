//! Parser models for the fields of domain error types.
//!
//! A service declares the errors it may throw as `{ name, fields }` records.
//! The renderer reconstructs the error on the client from its fields, so each
//! field needs a parser model; all fields of one record share a memo and a
//! dependency map.

use crate::error::Result;
use crate::options::ExtractOptions;
use crate::parser_model::{DependencyMap, ParserModel};
use crate::synthesize::ModelGenerator;
use phero_types::{TypeId, TypeResolutionService};
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct ErrorTypeRecord {
    pub name: String,
    /// `(field name, field type)` in declaration order.
    pub fields: Vec<(String, TypeId)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ErrorFieldModels {
    pub name: String,
    pub fields: Vec<(String, ParserModel)>,
    pub deps: DependencyMap,
}

pub fn synthesize_error_fields<S>(
    service: &S,
    record: &ErrorTypeRecord,
    options: &ExtractOptions,
) -> Result<ErrorFieldModels>
where
    S: TypeResolutionService + ?Sized,
{
    debug!(error = %record.name, fields = record.fields.len(), "synthesizing error fields");
    let mut generator = ModelGenerator::new(service, options);
    let fields = record
        .fields
        .iter()
        .map(|(name, ty)| Ok((name.clone(), generator.generate_root(*ty)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(ErrorFieldModels {
        name: record.name.clone(),
        fields,
        deps: generator.finish(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use phero_types::{Property, TypeGraph};

    #[test]
    fn fields_share_one_dependency_map() {
        let mut g = TypeGraph::new();
        let s = g.string();
        let n = g.number();
        let detail = g.interface("Detail", vec![Property::new("code", n)], vec![]);
        let detail_ref = g.reference(detail);
        let detail_ref_again = g.reference(detail);

        let record = ErrorTypeRecord {
            name: "NotFoundError".into(),
            fields: vec![
                ("message".into(), s),
                ("detail".into(), detail_ref),
                ("previous".into(), detail_ref_again),
            ],
        };
        let models = synthesize_error_fields(&g, &record, &ExtractOptions::default()).unwrap();

        assert_eq!(models.name, "NotFoundError");
        assert_eq!(
            models.fields,
            vec![
                ("message".to_owned(), ParserModel::String),
                ("detail".to_owned(), ParserModel::reference("Detail")),
                ("previous".to_owned(), ParserModel::reference("Detail")),
            ]
        );
        assert_eq!(models.deps.len(), 1);
    }

    #[test]
    fn unsupported_field_fails_the_record() {
        let mut g = TypeGraph::new();
        let s = g.string();
        let callback = g.function(vec![], s);
        let record = ErrorTypeRecord {
            name: "BadError".into(),
            fields: vec![("retry".into(), callback)],
        };
        assert!(synthesize_error_fields(&g, &record, &ExtractOptions::default()).is_err());
    }
}
