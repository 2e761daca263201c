use serde::Serialize;

/// Diagnostic codes raised while extracting models.
///
/// Every failure is fatal for the compile unit; the code tells the caller
/// which grammar boundary was hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    /// A type node kind the extractor has no rule for.
    UnsupportedTypeShape,
    /// A declaration kind the closure walker cannot re-emit.
    UnsupportedDeclaration,
    /// An array-like or promise-like container without its type argument.
    MissingTypeArgument,
    /// A function or binding name that cannot be turned into an identifier.
    UnresolvableName,
    /// Recursion depth, iteration budget or an unbounded anonymous cycle.
    RecursionLimit,
    /// Two distinct symbols would be emitted under the same name.
    NameCollision,
    /// The host graph refers to a node, symbol or declaration it does not have.
    DanglingNode,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub message: &'static str,
}

pub const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: 101,
        message: "Model extracting not possible for {0}",
    },
    DiagnosticMessage {
        code: 102,
        message: "Declaration {0} cannot be part of a model closure",
    },
    DiagnosticMessage {
        code: 103,
        message: "{0} has no type argument",
    },
    DiagnosticMessage {
        code: 117,
        message: "Function name should have a clear identifier, no support for computed names or binding patterns ({0})",
    },
    DiagnosticMessage {
        code: 130,
        message: "Type {0} is excessively deep or circular without a named type",
    },
    DiagnosticMessage {
        code: 131,
        message: "Name {0} is used by more than one type",
    },
    DiagnosticMessage {
        code: 140,
        message: "Type graph has no entry for {0}",
    },
];

impl DiagnosticCode {
    pub const fn code(self) -> u32 {
        match self {
            Self::UnsupportedTypeShape => 101,
            Self::UnsupportedDeclaration => 102,
            Self::MissingTypeArgument => 103,
            Self::UnresolvableName => 117,
            Self::RecursionLimit => 130,
            Self::NameCollision => 131,
            Self::DanglingNode => 140,
        }
    }

    /// Message template for this code, with `{0}` placeholders.
    pub fn template(self) -> &'static str {
        get_message_template(self.code()).unwrap_or("{0}")
    }

    /// Render the message for this code with the given arguments.
    pub fn render(self, args: &[&str]) -> String {
        format_message(self.template(), args)
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_a_template() {
        for code in [
            DiagnosticCode::UnsupportedTypeShape,
            DiagnosticCode::UnsupportedDeclaration,
            DiagnosticCode::MissingTypeArgument,
            DiagnosticCode::UnresolvableName,
            DiagnosticCode::RecursionLimit,
            DiagnosticCode::NameCollision,
            DiagnosticCode::DanglingNode,
        ] {
            assert!(get_message_template(code.code()).is_some(), "{code:?}");
        }
    }

    #[test]
    fn format_message_replaces_positional_args() {
        assert_eq!(
            format_message("{0} has no type argument ({1})", &["Array", "x"]),
            "Array has no type argument (x)"
        );
    }

    #[test]
    fn render_uses_table_template() {
        assert_eq!(
            DiagnosticCode::MissingTypeArgument.render(&["Array"]),
            "Array has no type argument"
        );
    }
}
