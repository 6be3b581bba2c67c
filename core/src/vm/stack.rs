use core::fmt;

/// Operand stack with a maximum size enforced in debug builds.
///
/// The compiler records the exact maximum depth of every program, so the
/// bound only catches compiler bugs; release builds skip the check.
pub struct Stack<T> {
    items: Vec<T>,
    max_size: usize,
}

impl<T> Stack<T> {
    pub fn new(max_size: usize) -> Self {
        Self {
            items: Vec::with_capacity(max_size.min(256)),
            max_size,
        }
    }

    /// # Panics
    ///
    /// Panics in debug mode if the stack is already at maximum capacity.
    #[inline]
    pub fn push(&mut self, value: T) {
        debug_assert!(
            self.items.len() < self.max_size,
            "Stack overflow: attempted to push beyond maximum size of {}",
            self.max_size
        );
        self.items.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum size; only enforced in debug builds.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Removes the top `n` elements, or all of them if there are fewer.
    #[inline]
    pub fn pop_n(&mut self, n: usize) {
        let new_len = self.len().saturating_sub(n);
        self.items.truncate(new_len);
    }

    /// The top `n` elements, bottom to top, or `None` if there are fewer.
    #[inline]
    pub fn top_n(&self, n: usize) -> Option<&[T]> {
        let len = self.items.len();
        if n > len {
            None
        } else {
            Some(&self.items[len - n..])
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("items", &self.items)
            .field("max_size", &self.max_size)
            .finish()
    }
}
