//! The process-wide dialect registry
//!
//! Keys are trimmed and lower-cased. The ANSI default is pre-registered;
//! embedders add vendor dialects at startup, and lookup is safe for
//! concurrent readers thereafter.

use crate::dialect::Dialect;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

static DIALECTS: LazyLock<RwLock<HashMap<String, Arc<Dialect>>>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("ansi".to_string(), Arc::new(Dialect::ansi()));
    RwLock::new(map)
});

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn register(name: &str, dialect: Dialect) {
    DIALECTS.write().insert(key(name), Arc::new(dialect));
}

pub fn lookup(name: &str) -> Option<Arc<Dialect>> {
    DIALECTS.read().get(&key(name)).cloned()
}

pub fn unregister(name: &str) -> Option<Arc<Dialect>> {
    DIALECTS.write().remove(&key(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::LimitStyle;

    #[test]
    fn ansi_is_preregistered() {
        assert!(lookup("ansi").is_some());
        assert!(lookup("  ANSI  ").is_some());
    }

    #[test]
    fn register_lookup_unregister_round_trip() {
        register(
            "Test-Limit",
            Dialect::named("test-limit").with_limit_style(LimitStyle::LimitOffset),
        );
        let found = lookup("test-limit").expect("registered dialect");
        assert_eq!(found.limit_style(), LimitStyle::LimitOffset);

        assert!(unregister("TEST-LIMIT ").is_some());
        assert!(lookup("test-limit").is_none());
    }
}
