use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Everything that can go wrong while parsing a formula.
///
/// Each variant wraps a diagnostic that points into the formula, so it can be
/// rendered with `miette` or matched on directly.
#[derive(Error, Debug, Diagnostic)]
pub enum FormulaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidArgument(#[from] EmptyFormulaError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    UnrecognizedToken(#[from] UnrecognizedTokenError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    UnbalancedRightDelimiter(#[from] UnbalancedRightError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    UnbalancedLeftDelimiter(#[from] UnbalancedLeftError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ConflictingMultiplier(#[from] ConflictingMultiplierError),
}

pub(crate) fn source(name: Option<&str>, whole: &str) -> NamedSource<String> {
    NamedSource::new(name.unwrap_or("<formula>"), whole.to_string())
}

#[derive(Error, Debug, Diagnostic)]
#[error("expected a non-empty formula")]
#[diagnostic(
    code(chemparse::invalid_argument),
    help("a formula needs at least one element symbol, e.g. `H2O`")
)]
pub struct EmptyFormulaError;

#[derive(Error, Debug, Diagnostic)]
#[error("the head of `{head}` does not match any token")]
#[diagnostic(
    code(chemparse::unrecognized_token),
    help("formulas use element symbols, numbers, brackets and the dots `·` `•` `∙`")
)]
pub struct UnrecognizedTokenError {
    #[source_code]
    pub(crate) src: NamedSource<String>,

    #[label("this character")]
    pub(crate) bad_bit: SourceSpan,

    pub token: char,
    /// The unconsumed input, starting at `token`.
    pub head: String,
}

#[derive(Error, Debug, Diagnostic)]
#[error("unmatched right parenthesis")]
#[diagnostic(
    code(chemparse::unbalanced_right),
    help("remove it or open the group with `(` or `[`")
)]
pub struct UnbalancedRightError {
    #[source_code]
    pub(crate) src: NamedSource<String>,

    #[label("nothing to close here")]
    pub(crate) bad_bit: SourceSpan,
}

#[derive(Error, Debug, Diagnostic)]
#[error("unmatched left parenthesis")]
#[diagnostic(
    code(chemparse::unbalanced_left),
    help("close the group with `)` or `]`")
)]
pub struct UnbalancedLeftError {
    #[source_code]
    pub(crate) src: NamedSource<String>,

    #[label("this group is never closed")]
    pub(crate) bad_bit: SourceSpan,
}

#[derive(Error, Debug, Diagnostic)]
#[error("numbers before and after parenthesis ({before} and {after})")]
#[diagnostic(
    code(chemparse::conflicting_multiplier),
    help("give the repeat count of a group on one side only, e.g. `2(H2O)` or `(H2O)2`")
)]
pub struct ConflictingMultiplierError {
    #[source_code]
    pub(crate) src: NamedSource<String>,

    #[label("multiplier before")]
    pub(crate) before_span: SourceSpan,

    #[label("multiplier after")]
    pub(crate) after_span: SourceSpan,

    pub before: f64,
    pub after: f64,
}

impl UnbalancedRightError {
    /// Byte offset of the stray delimiter.
    pub fn offset(&self) -> usize {
        self.bad_bit.offset()
    }
}

impl UnbalancedLeftError {
    /// Byte offset of the innermost bracket left open.
    pub fn offset(&self) -> usize {
        self.bad_bit.offset()
    }
}
