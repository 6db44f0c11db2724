use std::collections::HashSet;
use std::hash::Hash;

/// Dedup bookkeeping for candidate pairs.
///
/// Keys are order-sensitive `(tree 1 handle, tree 2 handle)` tuples. A key
/// lives in at most one of the two sets, and once admitted it is never
/// admitted again.
#[derive(Debug)]
pub struct DedupLedger<H> {
    queued: HashSet<(H, H)>,
    checked: HashSet<(H, H)>,
}

impl<H> Default for DedupLedger<H> {
    fn default() -> Self {
        Self {
            queued: HashSet::new(),
            checked: HashSet::new(),
        }
    }
}

impl<H: Copy + Eq + Hash> DedupLedger<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as queued. Returns false if it was already seen.
    pub fn admit(&mut self, key: (H, H)) -> bool {
        if self.checked.contains(&key) {
            return false;
        }
        self.queued.insert(key)
    }

    /// Move `key` from queued to checked.
    pub fn check(&mut self, key: (H, H)) {
        self.queued.remove(&key);
        self.checked.insert(key);
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub fn checked_len(&self) -> usize {
        self.checked.len()
    }

    pub fn checked(&self) -> &HashSet<(H, H)> {
        &self.checked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admit_once_then_check() {
        let mut ledger = DedupLedger::new();
        assert!(ledger.admit((1, 2)));
        assert!(!ledger.admit((1, 2)));
        assert_eq!(ledger.queued_len(), 1);

        ledger.check((1, 2));
        assert!(ledger.checked().contains(&(1, 2)));
        assert_eq!(ledger.queued_len(), 0);
        assert_eq!(ledger.checked_len(), 1);
        assert!(!ledger.admit((1, 2)));
    }

    #[test]
    fn keys_are_order_sensitive() {
        let mut ledger = DedupLedger::new();
        assert!(ledger.admit((1, 2)));
        assert!(ledger.admit((2, 1)));
        assert_eq!(ledger.queued_len(), 2);
    }
}
