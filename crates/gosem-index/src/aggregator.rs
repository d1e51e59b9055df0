//! Grouping of classified spans by category.

use gosem_core::{CategoryTable, Span};

/// Bucket `spans` by category, keeping their order within each bucket.
pub fn aggregate(spans: &[Span]) -> CategoryTable {
    let mut table = CategoryTable::new();
    for span in spans {
        table.push(span);
    }
    table
}
