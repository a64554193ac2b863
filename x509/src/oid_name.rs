/// Types whose OID has a conventional name.
///
/// For example an algorithm identifier carrying `1.2.840.10045.4.3.2` is
/// conventionally called `ecdsa-with-SHA256`.
pub trait OidName {
    /// Returns the conventional name for this value's OID, if it has one
    fn oid_name(&self) -> Option<&'static str>;
}
