use std::iter::Peekable;
use std::vec;

/// Forward only cursor over a finite sequence.
///
/// Supports consuming the next item and looking exactly one item ahead.
#[derive(Debug)]
pub struct Cursor<T> {
    items: Peekable<vec::IntoIter<T>>,
    /// Number of items consumed so far.
    consumed: usize,
}

impl<T> Cursor<T> {
    pub fn new(items: Vec<T>) -> Self {
        Cursor {
            items: items.into_iter().peekable(),
            consumed: 0,
        }
    }

    /// Look at the next item without consuming it.
    pub fn peek(&mut self) -> Option<&T> {
        self.items.peek()
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl<T> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.next()?;
        self.consumed += 1;
        Some(item)
    }
}
