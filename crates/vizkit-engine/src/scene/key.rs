/// Z-ordering layer for draw items. Higher values paint on top.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}

/// Stable sort key for draw items: `z` first, then insertion `order`.
///
/// Field order matters, the derived `Ord` is lexicographic.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, order: u32) -> Self {
        Self { z, order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_dominates_insertion_order() {
        let back = SortKey::new(ZIndex::new(-1), 10);
        let front = SortKey::new(ZIndex::new(0), 0);
        assert!(back < front);
        assert!(SortKey::new(ZIndex::new(0), 1) > front);
    }
}
