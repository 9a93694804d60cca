/// A simple slab allocator.
///
/// A `Slab` stores values of type `T` in a contiguous vector and hands out
/// indices that stay valid until the value is removed. Freed slots are
/// reused by later insertions.
///
/// Lookups with a stale index are not an error: they return `None`, or the
/// value that now lives in the reused slot. Callers that keep indices
/// around after removal (wakers, completion queues) must tolerate this.
pub(crate) struct Slab<T> {
    /// Slots; `None` marks a free slot.
    items: Vec<Option<T>>,

    /// Stack of free indices that can be reused.
    free: Vec<usize>,

    /// Number of occupied slots.
    len: usize,
}

impl<T> Slab<T> {
    /// Creates an empty slab without allocating.
    pub(crate) const fn new() -> Self {
        Self {
            items: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Index the next [`insert`](Self::insert) will use.
    pub(crate) fn next_index(&self) -> usize {
        self.free.last().copied().unwrap_or(self.items.len())
    }

    /// Inserts a value and returns its index.
    ///
    /// If a free slot is available it is reused, otherwise the slab grows.
    pub(crate) fn insert(&mut self, item: T) -> usize {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            self.items[index] = Some(item);
            return index;
        }

        self.items.push(Some(item));
        self.items.len() - 1
    }

    /// Removes and returns the value stored at `index`, if any.
    pub(crate) fn remove(&mut self, index: usize) -> Option<T> {
        let item = self.items.get_mut(index)?.take()?;

        self.free.push(index);
        self.len -= 1;

        Some(item)
    }

    /// Returns a mutable reference to the value at `index`, if occupied.
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)?.as_mut()
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every value, yielding them in index order.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.free.clear();
        self.len = 0;

        self.items.drain(..).flatten()
    }
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self::new()
    }
}
