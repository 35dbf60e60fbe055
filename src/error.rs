use std::fmt;

#[derive(Debug)]
pub enum ScopeSheetError {
    StylesheetSyntax {
        message: String,
        filename: String,
        line: u32,
        column: u32,
    },
    EscapeGrammar {
        production: &'static str,
        found: String,
    },
    StructuralInvariant(String),
    Print(String),
}

impl fmt::Display for ScopeSheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeSheetError::StylesheetSyntax {
                message,
                filename,
                line,
                column,
            } => {
                write!(
                    f,
                    "stylesheet failed to parse at {}:{}:{}: {}",
                    filename, line, column, message
                )
            }
            ScopeSheetError::EscapeGrammar { production, found } => {
                write!(f, "unexpected {} while parsing {}", found, production)
            }
            ScopeSheetError::StructuralInvariant(message) => {
                write!(f, "structural invariant violated: {}", message)
            }
            ScopeSheetError::Print(message) => {
                write!(f, "stylesheet serialization failed: {}", message)
            }
        }
    }
}

impl std::error::Error for ScopeSheetError {}
