//! Algebraic clean-up of synthesized unions.
//!
//! The host type system represents `boolean` as the union of its two literal
//! types, so a written `true | false | "x"` arrives as three members.
//! [`normalize`] folds the literal pair back into a single `Boolean`;
//! [`strip_optional`] removes the `undefined` an optional member carries.

use crate::parser_model::ParserModel;
use tracing::trace;

/// Collapse a `true`/`false` literal pair in a union into `Boolean`.
///
/// Remaining members keep their relative order and `Boolean` goes last. Other
/// members are never deduplicated or reordered. Non-union models are returned
/// unchanged, which makes the pass idempotent.
pub fn normalize(model: ParserModel) -> ParserModel {
    let ParserModel::Union { one_of } = model else {
        return model;
    };

    let true_index = one_of
        .iter()
        .position(|m| m.as_boolean_literal() == Some(true));
    let false_index = one_of
        .iter()
        .position(|m| m.as_boolean_literal() == Some(false));

    let (Some(true_index), Some(false_index)) = (true_index, false_index) else {
        return ParserModel::Union { one_of };
    };

    if one_of.len() == 2 {
        trace!("normalize: union of true and false is boolean");
        return ParserModel::Boolean;
    }

    let mut rest: Vec<ParserModel> = one_of
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i != true_index && *i != false_index)
        .map(|(_, m)| m)
        .collect();
    rest.push(ParserModel::Boolean);
    ParserModel::Union { one_of: rest }
}

/// Remove the `undefined` an optional member's type carries.
///
/// Only a top-level `Union` is unwrapped, and only its first `Undefined`
/// member is removed; a single survivor is returned bare. Anything else,
/// including a `Reference` to an alias that is itself optional, is returned
/// unchanged. A union of `undefined` alone becomes an empty `Union`.
pub fn strip_optional(model: ParserModel) -> ParserModel {
    let ParserModel::Union { mut one_of } = model else {
        return model;
    };

    let Some(index) = one_of.iter().position(ParserModel::is_undefined) else {
        return ParserModel::Union { one_of };
    };
    one_of.remove(index);
    if one_of.len() == 1 {
        return one_of.pop().unwrap_or(ParserModel::Undefined);
    }
    ParserModel::Union { one_of }
}

#[cfg(test)]
#[path = "../tests/union_tests.rs"]
mod tests;
