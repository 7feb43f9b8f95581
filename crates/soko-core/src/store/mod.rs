// ── Shared client-side state ──

mod method_cache;

pub use method_cache::MethodCache;
