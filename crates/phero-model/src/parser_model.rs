//! The parser model: a language-neutral description of how to validate a
//! runtime value against a type.
//!
//! Downstream generators turn a [`ParserModelMap`] into one validator for the
//! root plus one named validator per dependency. `Reference` is the only way a
//! model points at another named model, which keeps recursive types finite.

use indexmap::IndexMap;
use serde::Serialize;

/// Named parser models, in the order they finished synthesizing.
pub type DependencyMap = IndexMap<String, ParserModel>;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ParserModel {
    String,
    Number,
    Boolean,
    StringLiteral {
        literal: String,
    },
    NumberLiteral {
        literal: f64,
    },
    BooleanLiteral {
        literal: bool,
    },
    Undefined,
    Null,
    Array {
        element: Box<ParserModel>,
    },
    Object {
        members: Vec<Member>,
    },
    Union {
        #[serde(rename = "oneOf")]
        one_of: Vec<ParserModel>,
    },
    Reference {
        #[serde(rename = "typeName")]
        name: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Member {
    pub name: String,
    pub optional: bool,
    #[serde(rename = "parser")]
    pub model: ParserModel,
}

impl ParserModel {
    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::StringLiteral {
            literal: value.into(),
        }
    }

    pub fn array(element: ParserModel) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference { name: name.into() }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn as_boolean_literal(&self) -> Option<bool> {
        match self {
            Self::BooleanLiteral { literal } => Some(*literal),
            _ => None,
        }
    }

    /// Visit every `Reference` name in this model, depth first.
    pub fn for_each_reference<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Self::Reference { name } => f(name),
            Self::Array { element } => element.for_each_reference(f),
            Self::Object { members } => {
                for member in members {
                    member.model.for_each_reference(f);
                }
            }
            Self::Union { one_of } => {
                for model in one_of {
                    model.for_each_reference(f);
                }
            }
            Self::String
            | Self::Number
            | Self::Boolean
            | Self::StringLiteral { .. }
            | Self::NumberLiteral { .. }
            | Self::BooleanLiteral { .. }
            | Self::Undefined
            | Self::Null => {}
        }
    }

    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.for_each_reference(&mut |name| out.push(name));
        out
    }
}

impl Member {
    pub fn new(name: impl Into<String>, optional: bool, model: ParserModel) -> Self {
        Self {
            name: name.into(),
            optional,
            model,
        }
    }
}

/// Result of one synthesis: the entry model and its named dependencies.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParserModelMap {
    pub root: ParserModel,
    pub deps: DependencyMap,
}

impl ParserModelMap {
    /// `Reference` names that have no entry in `deps`.
    ///
    /// Always empty for a map produced by the synthesizer.
    pub fn dangling_references(&self) -> Vec<String> {
        let mut missing = Vec::new();
        let mut check = |name: &str| {
            if !self.deps.contains_key(name) && !missing.iter().any(|m: &String| m == name) {
                missing.push(name.to_owned());
            }
        };
        self.root.for_each_reference(&mut check);
        for model in self.deps.values() {
            model.for_each_reference(&mut check);
        }
        missing
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_are_collected_through_nesting() {
        let model = ParserModel::Object {
            members: vec![
                Member::new("owner", false, ParserModel::reference("User")),
                Member::new(
                    "tags",
                    true,
                    ParserModel::array(ParserModel::Union {
                        one_of: vec![ParserModel::reference("Tag"), ParserModel::Null],
                    }),
                ),
            ],
        };
        assert_eq!(model.references(), vec!["User", "Tag"]);
    }

    #[test]
    fn dangling_references_reports_each_name_once() {
        let map = ParserModelMap {
            root: ParserModel::Union {
                one_of: vec![ParserModel::reference("A"), ParserModel::reference("B")],
            },
            deps: IndexMap::from([("A".to_owned(), ParserModel::reference("B"))]),
        };
        assert_eq!(map.dangling_references(), vec!["B".to_owned()]);
    }

    #[test]
    fn serializes_in_downstream_shape() {
        let model = ParserModel::Union {
            one_of: vec![
                ParserModel::string_literal("x"),
                ParserModel::reference("User"),
            ],
        };
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "Union",
                "oneOf": [
                    { "type": "StringLiteral", "literal": "x" },
                    { "type": "Reference", "typeName": "User" }
                ]
            })
        );
    }
}
