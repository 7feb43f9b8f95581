// ── Active payment method cache ──
//
// Last successfully fetched active-method set. A freshly opened flow
// seeds its selector from here while its own fetch is in flight.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::model::PaymentMethod;

/// Lock-free holder for the last known active payment methods.
///
/// Failed fetches do not touch the cache, so a transient outage does not
/// wipe the methods a later dialog can show.
#[derive(Debug)]
pub struct MethodCache {
    methods: ArcSwap<Vec<PaymentMethod>>,
}

impl MethodCache {
    pub fn new() -> Self {
        Self {
            methods: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<PaymentMethod>> {
        self.methods.load_full()
    }

    pub fn store(&self, methods: Vec<PaymentMethod>) {
        self.methods.store(Arc::new(methods));
    }

    pub fn is_empty(&self) -> bool {
        self.methods.load().is_empty()
    }
}

impl Default for MethodCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_replaces_on_store() {
        let cache = MethodCache::new();
        assert!(cache.is_empty());

        cache.store(vec![PaymentMethod::Crypto]);
        let first = cache.snapshot();
        cache.store(vec![PaymentMethod::MtnMomo, PaymentMethod::Wallet]);

        assert_eq!(*first, vec![PaymentMethod::Crypto]);
        assert_eq!(
            *cache.snapshot(),
            vec![PaymentMethod::MtnMomo, PaymentMethod::Wallet]
        );
    }
}
