use log::{debug, trace};

use crate::{
    Composition, Lexer,
    error::{
        ConflictingMultiplierError, EmptyFormulaError, FormulaError, UnbalancedLeftError,
        UnbalancedRightError, source,
    },
    frame::{Frame, FrameKind, Stack},
    lex::{LeftForm, Token, TokenKind},
};

/// Turns a formula into its element counts.
///
/// The formula is scanned once, left to right, with a stack of frames: a
/// bracket pushes a group frame, a bare dot or number pushes a segment frame,
/// and closing either merges its counts into the frame beneath, scaled by its
/// multiplier. The scan is a plain loop, so nesting depth is bounded only by
/// memory.
pub struct Parser<'de> {
    name: Option<&'de str>,
    whole: &'de str,
}

impl<'de> Parser<'de> {
    /// `name` labels diagnostics, e.g. the file a formula was read from.
    pub fn new(name: Option<&'de str>, whole: &'de str) -> Self {
        Parser { name, whole }
    }

    pub fn parse(self) -> Result<Composition, FormulaError> {
        if self.whole.is_empty() {
            return Err(EmptyFormulaError.into());
        }

        let mut stack = Stack::new();
        let mut depth = 0usize;

        for token in Lexer::new(self.name, self.whole) {
            let token = token?;
            match token.kind {
                TokenKind::Atom { symbol, count } => {
                    stack.current_mut().add(symbol, count);
                    trace!("atom {symbol} x{count} at depth {}", stack.len());
                }
                TokenKind::LeftDelimiter { form, multiplier } => {
                    self.open(&mut stack, &mut depth, token, form, multiplier);
                }
                TokenKind::RightDelimiter { count } => {
                    self.close(&mut stack, &mut depth, token, count)?;
                }
            }
        }

        stack.close_segment();
        if depth > 0 {
            return Err(self.unclosed(&stack).into());
        }

        let composition: Composition = stack
            .into_root()
            .into_counts()
            .into_iter()
            .map(|(symbol, count)| (symbol.to_string(), count))
            .collect();
        debug!("{} => {composition}", self.whole);
        Ok(composition)
    }

    fn open(
        &self,
        stack: &mut Stack<'de>,
        depth: &mut usize,
        token: Token<'de>,
        form: LeftForm,
        multiplier: f64,
    ) {
        // a bare multiplier only reaches up to the next delimiter of any kind
        stack.close_segment();

        if form.opens_group() {
            *depth += 1;
            let span = token.span();
            stack.push(Frame::new(FrameKind::Group { span }, multiplier));
        } else {
            stack.push(Frame::new(FrameKind::Segment, multiplier));
        }
        trace!(
            "open {form} `{}` x{multiplier}, {} open bracket(s)",
            token.literal, depth
        );
    }

    fn close(
        &self,
        stack: &mut Stack<'de>,
        depth: &mut usize,
        token: Token<'de>,
        count: f64,
    ) -> Result<(), FormulaError> {
        let unbalanced = || UnbalancedRightError {
            src: source(self.name, self.whole),
            bad_bit: token.span().into(),
        };

        stack.close_segment();
        *depth = depth.checked_sub(1).ok_or_else(unbalanced)?;
        let group = stack.pop().ok_or_else(unbalanced)?;
        let FrameKind::Group { span } = &group.kind else {
            return Err(unbalanced().into());
        };

        if group.multiplier > 1.0 && count > 1.0 {
            return Err(ConflictingMultiplierError {
                src: source(self.name, self.whole),
                before_span: span.clone().into(),
                after_span: token.span().into(),
                before: group.multiplier,
                after: count,
            }
            .into());
        }

        let factor = group.multiplier * count;
        stack.current_mut().absorb(group, factor);
        trace!(
            "close `{}` x{factor}, {} open bracket(s)",
            token.literal, depth
        );
        Ok(())
    }

    fn unclosed(&self, stack: &Stack<'de>) -> UnbalancedLeftError {
        let span = stack.innermost_group().unwrap_or(0..0);
        UnbalancedLeftError {
            src: source(self.name, self.whole),
            bad_bit: span.into(),
        }
    }
}
