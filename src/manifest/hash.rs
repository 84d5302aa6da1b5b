use crate::error::Result;
use git2::{ObjectType, Oid};

/// Content hash of a byte sequence, identical to git's blob object id
///
/// This is the SHA-1 of `"blob " + <decimal length> + NUL + bytes`, so a
/// file hashes to the same id git would store it under and can be matched
/// against blobs a remote already holds.
pub fn blob_hash(bytes: &[u8]) -> Result<String> {
    Ok(Oid::hash_object(ObjectType::Blob, bytes)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_blob() {
        // SHA-1 of "blob 0\0"
        assert_eq!(
            blob_hash(b"").unwrap(),
            "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391"
        );
    }

    #[test]
    fn test_known_blob() {
        // `printf 'hello world\n' | git hash-object --stdin`
        assert_eq!(
            blob_hash(b"hello world\n").unwrap(),
            "3b18e512dba79e4c8300dd08aeb37f8e728b8dad"
        );
    }

    #[test]
    fn test_hash_is_stable() {
        let bytes = b"<h1>deploy me</h1>";
        assert_eq!(blob_hash(bytes).unwrap(), blob_hash(bytes).unwrap());
        assert_ne!(blob_hash(bytes).unwrap(), blob_hash(b"<h1>deploy me</h1>\n").unwrap());
    }

    #[test]
    fn test_hash_shape() {
        let hash = blob_hash(b"x").unwrap();
        assert_eq!(hash.len(), 40);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
