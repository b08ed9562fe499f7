//! Display ordering shared by every collection.
//!
//! Records carry an optional dense `order`. Records written before the
//! field existed have none and fall back to their identifier. Ties on the
//! effective order are broken by identifier, which keeps the sort stable
//! and idempotent.

use std::cmp::Ordering;

/// A record that can be placed in display order.
pub trait Ordered {
    /// The explicit display position, if the record has one.
    fn display_order(&self) -> Option<i64>;

    /// The store-assigned identifier used as fallback and tie-break.
    fn sort_id(&self) -> i64;

    /// Effective sort key: `(order or id, id)`.
    fn sort_key(&self) -> (i64, i64) {
        let id = self.sort_id();
        (self.display_order().unwrap_or(id), id)
    }
}

/// Compare two records by their effective sort key.
pub fn compare_ordered<T: Ordered>(a: &T, b: &T) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}

/// Sort records in place by display order (stable).
pub fn sort_ordered<T: Ordered>(items: &mut [T]) {
    items.sort_by(compare_ordered);
}

/// Whether a slice is already in display order.
pub fn is_display_sorted<T: Ordered>(items: &[T]) -> bool {
    items
        .windows(2)
        .all(|pair| compare_ordered(&pair[0], &pair[1]) != Ordering::Greater)
}
