use std::collections::HashMap;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub enum FrameKind {
    /// The whole formula. Always at the bottom of the stack.
    Root,
    /// Opened by a bracket; `span` is the opening delimiter.
    Group { span: Range<usize> },
    /// Opened by a bracket-less dot or number and closed implicitly.
    Segment,
}

/// Element counts accumulated for one level of nesting.
#[derive(Debug)]
pub struct Frame<'de> {
    pub kind: FrameKind,
    /// Applied to every count when the frame is merged into its parent.
    pub multiplier: f64,
    counts: HashMap<&'de str, f64>,
}

impl<'de> Frame<'de> {
    pub fn new(kind: FrameKind, multiplier: f64) -> Self {
        Frame {
            kind,
            multiplier,
            counts: HashMap::new(),
        }
    }

    pub fn add(&mut self, symbol: &'de str, count: f64) {
        *self.counts.entry(symbol).or_insert(0.0) += count;
    }

    /// Adds every count of `child`, scaled by `factor`.
    pub fn absorb(&mut self, child: Frame<'de>, factor: f64) {
        for (symbol, count) in child.counts {
            self.add(symbol, count * factor);
        }
    }

    pub fn is_segment(&self) -> bool {
        self.kind == FrameKind::Segment
    }

    pub fn into_counts(self) -> HashMap<&'de str, f64> {
        self.counts
    }
}

#[derive(Debug)]
pub struct Stack<'de> {
    values: Vec<Frame<'de>>,
}

impl<'de> Stack<'de> {
    /// A stack holding a single empty root frame.
    pub fn new() -> Self {
        Stack {
            values: vec![Frame::new(FrameKind::Root, 1.0)],
        }
    }

    pub fn push(&mut self, frame: Frame<'de>) {
        self.values.push(frame);
    }

    /// Pops the top frame. The root frame is never popped.
    pub fn pop(&mut self) -> Option<Frame<'de>> {
        if self.values.len() > 1 {
            self.values.pop()
        } else {
            None
        }
    }

    pub fn current(&self) -> &Frame<'de> {
        &self.values[self.values.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Frame<'de> {
        let last = self.values.len() - 1;
        &mut self.values[last]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Frames from innermost to outermost.
    pub fn iter(&self) -> impl Iterator<Item = &Frame<'de>> {
        self.values.iter().rev()
    }

    /// Span of the innermost bracket that is still open.
    pub fn innermost_group(&self) -> Option<Range<usize>> {
        self.iter().find_map(|frame| match &frame.kind {
            FrameKind::Group { span } => Some(span.clone()),
            _ => None,
        })
    }

    /// Merges the top frame into the one beneath it if it is a segment.
    pub fn close_segment(&mut self) -> bool {
        if !self.current().is_segment() {
            return false;
        }
        match self.pop() {
            Some(segment) => {
                let factor = segment.multiplier;
                self.current_mut().absorb(segment, factor);
                true
            }
            None => false,
        }
    }

    /// The root frame. Anything still open above it is dropped.
    pub fn into_root(mut self) -> Frame<'de> {
        self.values.truncate(1);
        self.values.swap_remove(0)
    }
}
