use thiserror::Error;

/// Errors returned by rule registration and lookup.
///
/// # Examples
/// ```
/// use codecmap_core::RegistryError;
///
/// let err = RegistryError::Unresolved { gid: 116, sid: 417 };
/// assert!(err.to_string().contains("unresolved rule"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate rule {gid}:{sid}: already registered as \"{existing}\"")]
    DuplicateRule {
        gid: u32,
        sid: u32,
        existing: &'static str,
    },
    #[error("unresolved rule {gid}:{sid}")]
    Unresolved { gid: u32, sid: u32 },
}
