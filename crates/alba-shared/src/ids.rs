//! Identifier generation.
//!
//! Persisted entities get random v4 UUIDs. Transient UI correlation ids are
//! short base-36 strings where an occasional collision is harmless.

use chrono::Utc;
use rand::Rng;

use crate::types::TeaId;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const EPHEMERAL_LEN: usize = 9;

/// Globally unique id for a long-lived entity.
pub fn new_entity_id() -> TeaId {
    TeaId::new()
}

/// Short pseudo-random id for form elements and other transient UI state,
/// optionally namespaced as `{prefix}-{id}`.
pub fn new_ephemeral_id(prefix: Option<&str>) -> String {
    let id = random_base36(EPHEMERAL_LEN);
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}-{id}"),
        _ => id,
    }
}

/// Millisecond timestamp plus a short random suffix; sorts by creation time.
pub fn new_timestamp_id() -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), random_base36(4))
}

fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_entity_ids_are_distinct() {
        let ids: HashSet<TeaId> = (0..1000).map(|_| new_entity_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_ephemeral_id_shape() {
        let id = new_ephemeral_id(None);
        assert_eq!(id.len(), EPHEMERAL_LEN);
        assert!(id.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_ephemeral_id_prefix() {
        let id = new_ephemeral_id(Some("field"));
        assert!(id.starts_with("field-"));
        assert_eq!(id.len(), "field-".len() + EPHEMERAL_LEN);

        let bare = new_ephemeral_id(Some(""));
        assert_eq!(bare.len(), EPHEMERAL_LEN);
    }

    #[test]
    fn test_timestamp_id_shape() {
        let id = new_timestamp_id();
        let (millis, suffix) = id.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 4);
    }
}
