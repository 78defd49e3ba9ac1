//! Byte-range source positions and the [`Spanned`] node wrapper.

use std::ops::Range;

use derive_more::derive::{AsMut, AsRef, Deref, DerefMut, From};

#[derive(Default, Clone, Debug, PartialEq, Eq, Hash, Deref, DerefMut, AsRef, AsMut, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span(Range<usize>);

impl Span {
    pub fn new(range: Range<usize>) -> Self {
        Self(range)
    }
    /// An empty span positioned at `offset`.
    pub fn at(offset: usize) -> Self {
        Self(offset..offset)
    }
    pub fn range(&self) -> Range<usize> {
        self.0.clone()
    }
    /// The span covering `self` up to the end of `other`.
    pub fn extend(&self, other: &Span) -> Self {
        Self(self.start..other.end.max(self.end))
    }

    /// 1-based line and column of the span start, columns counted in chars.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let start = self.start.min(source.len());
        let before = &source[..start];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let col = before[line_start..].chars().count() + 1;
        (line, col)
    }
}

/// A syntax node together with the source range it was parsed from.
///
/// Spans are ignored by equality: two trees parsed from differently formatted
/// sources compare equal when their structure is the same.
#[derive(Default, Clone, Debug, Deref, DerefMut, AsRef, AsMut)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spanned<T> {
    pub span: Span,
    #[deref(forward)]
    #[deref_mut(forward)]
    #[as_ref(T)]
    #[as_mut(T)]
    pub node: Box<T>,
}

impl<T: PartialEq> PartialEq for Spanned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node.eq(&other.node)
    }
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self {
            span,
            node: Box::new(node),
        }
    }
    pub fn span(&self) -> &Span {
        &self.span
    }
    pub fn node(&self) -> &T {
        self
    }
    pub fn node_mut(&mut self) -> &mut T {
        self
    }
    pub fn into_inner(self) -> T {
        *self.node
    }
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned::new(f(*self.node), self.span)
    }
}

impl<T> From<T> for Spanned<T> {
    fn from(value: T) -> Self {
        Self::new(value, Span::default())
    }
}
