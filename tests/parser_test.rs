// Integration tests for the hashsplit parse pipeline
// Tests cover: reconstruction, determinism, locality, size cap, tiered store

use std::io::Cursor;

use bytes::Bytes;
use hashsplit::{
    BlobStore, ContentHash, MemoryBlobStore, MemoryHashStore, MultipleBlobStore, ParseConfig,
    Parser,
};

/// Pseudo-random but deterministic test data (Knuth multiplicative hash).
fn test_data(len: usize) -> Vec<u8> {
    (0..len as u32)
        .map(|i| (i.wrapping_mul(2654435761) >> 24) as u8)
        .collect()
}

/// Small masks so tests see many boundaries without megabytes of input.
fn small_config() -> ParseConfig {
    ParseConfig::new(0xFF, 0xFFF, Some(4096)).unwrap()
}

/// Walks root -> chunk-fanouts -> blobs and concatenates the blob bytes in
/// order.
fn reconstruct(
    root: ContentHash,
    blobs: &MemoryBlobStore,
    fanouts: &MemoryHashStore,
) -> Vec<u8> {
    let file = fanouts.get_file_fanout(root).expect("file fanout missing");
    let mut out = Vec::with_capacity(file.length as usize);
    for chunk_hash in &file.children {
        let chunk = fanouts
            .get_chunk_fanout(*chunk_hash)
            .expect("chunk fanout missing");
        for blob_hash in &chunk.children {
            let blob = blobs
                .get_blob(*blob_hash)
                .expect("store failed")
                .expect("blob missing");
            out.extend_from_slice(&blob);
        }
    }
    out
}

/// Ordered blob hashes of a parsed stream, read back through the tree.
fn ordered_blob_hashes(root: ContentHash, fanouts: &MemoryHashStore) -> Vec<ContentHash> {
    let file = fanouts.get_file_fanout(root).unwrap();
    file.children
        .iter()
        .flat_map(|h| fanouts.get_chunk_fanout(*h).unwrap().children)
        .collect()
}

// ============================================================================
// Reconstruction and Tree Invariants
// ============================================================================

#[test]
fn test_lossless_reconstruction() {
    let data = test_data(200_000);
    let blobs = MemoryBlobStore::new();
    let fanouts = MemoryHashStore::new();

    let root = Parser::new(small_config())
        .parse(Cursor::new(data.clone()), &blobs, &fanouts)
        .unwrap();

    assert_eq!(reconstruct(root, &blobs, &fanouts), data);
}

#[test]
fn test_lengths_are_consistent_across_levels() {
    let data = test_data(150_000);
    let blobs = MemoryBlobStore::new();
    let fanouts = MemoryHashStore::new();

    let root = Parser::new(small_config())
        .parse(Cursor::new(data.clone()), &blobs, &fanouts)
        .unwrap();

    let file = fanouts.get_file_fanout(root).unwrap();
    assert_eq!(file.length, data.len() as u64);

    let mut chunk_total = 0u64;
    for chunk_hash in &file.children {
        let chunk = fanouts.get_chunk_fanout(*chunk_hash).unwrap();
        let blob_total: u64 = chunk
            .children
            .iter()
            .map(|h| blobs.get_blob(*h).unwrap().unwrap().len() as u64)
            .sum();
        assert_eq!(blob_total, chunk.length, "blob lengths must sum to chunk length");
        chunk_total += chunk.length;
    }
    assert_eq!(chunk_total, file.length, "chunk lengths must sum to file length");
}

#[test]
fn test_empty_stream_tree_shape() {
    let blobs = MemoryBlobStore::new();
    let fanouts = MemoryHashStore::new();

    let root = Parser::default()
        .parse(Cursor::new(&b""[..]), &blobs, &fanouts)
        .unwrap();

    let file = fanouts.get_file_fanout(root).unwrap();
    assert_eq!((file.children.len(), file.length), (1, 0));

    let chunk = fanouts.get_chunk_fanout(file.children[0]).unwrap();
    assert_eq!((chunk.children.len(), chunk.length), (1, 0));
    assert_eq!(blobs.get_blob(chunk.children[0]).unwrap(), Some(Bytes::new()));

    assert!(reconstruct(root, &blobs, &fanouts).is_empty());
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_same_stream_same_root() {
    let data = test_data(100_000);

    let root1 = Parser::new(small_config())
        .parse(
            Cursor::new(data.clone()),
            &MemoryBlobStore::new(),
            &MemoryHashStore::new(),
        )
        .unwrap();
    let root2 = Parser::new(small_config())
        .parse(
            Cursor::new(data),
            &MemoryBlobStore::new(),
            &MemoryHashStore::new(),
        )
        .unwrap();

    assert_eq!(root1, root2);
}

#[test]
fn test_root_independent_of_store_implementation() {
    let data = test_data(100_000);

    let plain = MemoryBlobStore::new();
    let root1 = Parser::new(small_config())
        .parse(Cursor::new(data.clone()), &plain, &MemoryHashStore::new())
        .unwrap();

    // Same stream through a tiered store must yield the identical root.
    let tiered = MultipleBlobStore::new(MemoryBlobStore::new(), MemoryBlobStore::new());
    let root2 = Parser::new(small_config())
        .parse(Cursor::new(data), &tiered, &MemoryHashStore::new())
        .unwrap();

    assert_eq!(root1, root2);
}

// ============================================================================
// Stability Under Edit (locality)
// ============================================================================

#[test]
fn test_appending_only_perturbs_the_tail() {
    let v1 = test_data(64 * 1024);
    let mut v2 = v1.clone();
    v2.extend_from_slice(&test_data(100));

    let fanouts1 = MemoryHashStore::new();
    let root1 = Parser::new(small_config())
        .parse(Cursor::new(v1), &MemoryBlobStore::new(), &fanouts1)
        .unwrap();

    let fanouts2 = MemoryHashStore::new();
    let root2 = Parser::new(small_config())
        .parse(Cursor::new(v2), &MemoryBlobStore::new(), &fanouts2)
        .unwrap();

    assert_ne!(root1, root2);

    // Every blob except v1's terminal one must reappear unchanged, in
    // order, at the front of v2's blob list.
    let blobs1 = ordered_blob_hashes(root1, &fanouts1);
    let blobs2 = ordered_blob_hashes(root2, &fanouts2);
    assert!(blobs1.len() > 2, "test needs multiple blobs to be meaningful");
    assert_eq!(blobs1[..blobs1.len() - 1], blobs2[..blobs1.len() - 1]);

    // Same at the fanout level: only the last chunk-fanout may differ.
    let file1 = fanouts1.get_file_fanout(root1).unwrap();
    let file2 = fanouts2.get_file_fanout(root2).unwrap();
    let shared = file1.children.len() - 1;
    assert_eq!(file1.children[..shared], file2.children[..shared]);
}

// ============================================================================
// Size Cap
// ============================================================================

#[test]
fn test_size_cap_bounds_blobs_on_pathological_input() {
    // All-zero input never matches the boundary mask (the rolling window
    // stays in its initial state), so only the cap produces boundaries.
    let data = vec![0u8; 2_000_000];
    let blobs = MemoryBlobStore::new();
    let fanouts = MemoryHashStore::new();

    let root = Parser::default()
        .parse(Cursor::new(data.clone()), &blobs, &fanouts)
        .unwrap();

    let hashes = ordered_blob_hashes(root, &fanouts);
    for hash in &hashes {
        let blob = blobs.get_blob(*hash).unwrap().unwrap();
        assert!(blob.len() <= 500_000, "blob of {} bytes exceeds cap", blob.len());
    }
    assert_eq!(reconstruct(root, &blobs, &fanouts), data);
}

#[test]
fn test_cap_plus_one_forces_boundary_at_cap() {
    let data = vec![0u8; 500_001];
    let blobs = MemoryBlobStore::new();
    let fanouts = MemoryHashStore::new();

    let root = Parser::default()
        .parse(Cursor::new(data), &blobs, &fanouts)
        .unwrap();

    let hashes = ordered_blob_hashes(root, &fanouts);
    let sizes: Vec<usize> = hashes
        .iter()
        .map(|h| blobs.get_blob(*h).unwrap().unwrap().len())
        .collect();
    assert_eq!(sizes, vec![500_000, 1]);
}

// ============================================================================
// Tiered Store Behavior
// ============================================================================

#[test]
fn test_tiered_store_serves_fallback_without_promotion() {
    let fallback = MemoryBlobStore::new();
    let fanouts = MemoryHashStore::new();
    let data = test_data(50_000);

    // Populate only the fallback tier by parsing into it directly.
    let root = Parser::new(small_config())
        .parse(Cursor::new(data), &fallback, &fanouts)
        .unwrap();

    let store = MultipleBlobStore::new(MemoryBlobStore::new(), fallback);
    let hashes = ordered_blob_hashes(root, &fanouts);

    for hash in &hashes {
        assert!(store.get_blob(*hash).unwrap().is_some());
    }
    assert_eq!(store.preferred_hits(), 0);
    assert_eq!(store.fallback_hits(), hashes.len() as u64);
    // No promotion happened.
    assert!(store.preferred().is_empty());
}

#[test]
fn test_parse_through_tiered_store_fills_preferred_only() {
    let store = MultipleBlobStore::new(MemoryBlobStore::new(), MemoryBlobStore::new());
    let fanouts = MemoryHashStore::new();
    let data = test_data(50_000);

    let root = Parser::new(small_config())
        .parse(Cursor::new(data.clone()), &store, &fanouts)
        .unwrap();

    assert!(!store.preferred().is_empty());
    assert!(store.fallback().is_empty());

    // Reads come back from the preferred tier.
    let hashes = ordered_blob_hashes(root, &fanouts);
    for hash in &hashes {
        assert!(store.get_blob(*hash).unwrap().is_some());
    }
    assert_eq!(store.preferred_hits(), hashes.len() as u64);
    assert_eq!(store.fallback_hits(), 0);
}

// ============================================================================
// Deduplication
// ============================================================================

#[test]
fn test_identical_ranges_share_blob_hashes() {
    // Two copies of the same content back to back: once the checksum
    // resets at a boundary inside the first copy, the second copy repeats
    // the same boundaries and the same blob hashes.
    let unit = test_data(32 * 1024);
    let mut data = unit.clone();
    data.extend_from_slice(&unit);

    let blobs = MemoryBlobStore::new();
    let fanouts = MemoryHashStore::new();
    let root = Parser::new(small_config())
        .parse(Cursor::new(data.clone()), &blobs, &fanouts)
        .unwrap();

    let hashes = ordered_blob_hashes(root, &fanouts);
    let distinct: std::collections::HashSet<_> = hashes.iter().collect();
    assert!(
        distinct.len() < hashes.len(),
        "doubled content should reuse blob hashes ({} blobs, {} distinct)",
        hashes.len(),
        distinct.len()
    );
    assert_eq!(reconstruct(root, &blobs, &fanouts), data);
}
