pub const DEFAULT_MAX_ITEMS: usize = 200;

/// One page of history. Pages are never chained at this layer; callers that
/// want more issue another query with a larger offset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HistoryQuery {
    pub max_items: usize,
    pub offset: usize,
}

impl HistoryQuery {
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items,
            offset: 0,
        }
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEMS)
    }
}
