//! Chemical formula parsing.
//!
//! Turns formulas such as `Ca9Si6O18(OH)6·8H2O` into element counts. Groups
//! may be written with `()` or `[]`, carry a repeat count before or after the
//! brackets, and hydrate dots (`·`, `•`, `∙`) introduce a further part of the
//! formula with its own optional count.
//!
//! ```
//! let hydrate = chemparse::parse_formula("CaO·2(H2O)").unwrap();
//! assert_eq!(hydrate.get("O"), Some(3.0));
//! assert_eq!(hydrate.get("H"), Some(4.0));
//! ```

pub mod composition;
pub mod error;
pub mod frame;
pub mod lex;
pub mod parse;

pub use composition::Composition;
pub use error::FormulaError;
pub use lex::Lexer;
pub use parse::Parser;

/// Parses `formula` into its element counts.
pub fn parse_formula(formula: &str) -> Result<Composition, FormulaError> {
    Parser::new(None, formula).parse()
}
