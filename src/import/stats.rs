//! Import run tally.

/// Counters accumulated over one import invocation and returned to the
/// caller. `vehicles_added` reflects logical acceptance at queue time, not
/// confirmed durability of the final batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub manufacturers_added: usize,
    pub vehicles_added: usize,
}
