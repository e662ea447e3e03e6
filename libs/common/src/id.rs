use ulid::Ulid;

/// Generates a new ULID-based ID with the given prefix.
///
/// # Examples
/// ```
/// let id = portal_common::id::prefixed_ulid("mem");
/// assert!(id.starts_with("mem_"));
/// ```
pub fn prefixed_ulid(prefix: &str) -> String {
    format!("{}_{}", prefix, Ulid::new())
}

/// Marker trait for types that represent a prefixed ID.
pub trait PrefixedId {
    const PREFIX: &'static str;

    fn generate() -> String {
        prefixed_ulid(Self::PREFIX)
    }
}

/// Well-known ID prefixes.
pub mod prefix {
    pub const PARTNER: &str = "ptn";
    pub const EVENT: &str = "evt";
    pub const MEMBER: &str = "mem";
    pub const HOTEL: &str = "htl";
    pub const USER: &str = "usr";
    pub const SESSION: &str = "ses";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_ulid_format() {
        let id = prefixed_ulid("mem");
        assert!(id.starts_with("mem_"));
        // ULID is 26 chars, plus prefix + underscore
        assert_eq!(id.len(), 4 + 26);
    }

    #[test]
    fn test_uniqueness() {
        let a = prefixed_ulid("evt");
        let b = prefixed_ulid("evt");
        assert_ne!(a, b);
    }
}
