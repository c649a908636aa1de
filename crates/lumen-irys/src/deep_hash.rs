//! Arweave deep-hash over blob/list trees
//!
//! Data items are signed over a SHA-384 digest of a nested structure rather
//! than a flat byte concatenation, so reordering or re-chunking the fields
//! always changes the signature.

use sha2::{Digest, Sha384};

/// One node of the structure being hashed
pub enum DeepHashChunk<'a> {
    /// A raw byte string
    Blob(&'a [u8]),
    /// An ordered list of child chunks
    List(Vec<DeepHashChunk<'a>>),
}

/// Compute the 48-byte deep hash of a chunk tree
pub fn deep_hash(chunk: &DeepHashChunk<'_>) -> [u8; 48] {
    match chunk {
        DeepHashChunk::Blob(data) => {
            let tag = format!("blob{}", data.len());
            let tag_hash = Sha384::digest(tag.as_bytes());
            let data_hash = Sha384::digest(data);

            let mut hasher = Sha384::new();
            hasher.update(tag_hash);
            hasher.update(data_hash);
            hasher.finalize().into()
        }
        DeepHashChunk::List(items) => {
            let tag = format!("list{}", items.len());
            let mut acc: [u8; 48] = Sha384::digest(tag.as_bytes()).into();
            for item in items {
                let mut hasher = Sha384::new();
                hasher.update(acc);
                hasher.update(deep_hash(item));
                acc = hasher.finalize().into();
            }
            acc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_hash_is_deterministic() {
        let a = deep_hash(&DeepHashChunk::Blob(b"hello"));
        let b = deep_hash(&DeepHashChunk::Blob(b"hello"));
        assert_eq!(a, b);
        assert_ne!(a, deep_hash(&DeepHashChunk::Blob(b"hello!")));
    }

    #[test]
    fn test_blob_differs_from_singleton_list() {
        let blob = deep_hash(&DeepHashChunk::Blob(b"data"));
        let list = deep_hash(&DeepHashChunk::List(vec![DeepHashChunk::Blob(b"data")]));
        assert_ne!(blob, list);
    }

    #[test]
    fn test_list_order_matters() {
        let ab = deep_hash(&DeepHashChunk::List(vec![
            DeepHashChunk::Blob(b"a"),
            DeepHashChunk::Blob(b"b"),
        ]));
        let ba = deep_hash(&DeepHashChunk::List(vec![
            DeepHashChunk::Blob(b"b"),
            DeepHashChunk::Blob(b"a"),
        ]));
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_chunk_boundaries_matter() {
        // ["ab"] and ["a", "b"] must not collide
        let joined = deep_hash(&DeepHashChunk::List(vec![DeepHashChunk::Blob(b"ab")]));
        let split = deep_hash(&DeepHashChunk::List(vec![
            DeepHashChunk::Blob(b"a"),
            DeepHashChunk::Blob(b"b"),
        ]));
        assert_ne!(joined, split);
    }

    #[test]
    fn test_empty_blob() {
        let hash = deep_hash(&DeepHashChunk::Blob(b""));
        assert_eq!(hash.len(), 48);
    }
}
