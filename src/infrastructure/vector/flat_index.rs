//! Flat file-backed vector index
//!
//! Exact (non-approximate) squared-L2 nearest-neighbor search over an
//! append-only vector file, with chunk metadata persisted in a parallel
//! JSON file at `<path>.meta.json`. Exactness is preferred over query
//! latency at this scale; an approximate index can replace this behind
//! the same [`VectorIndex`] trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ChunkRecord, ScoredChunk};
use crate::domain::ports::VectorIndex;

/// Magic bytes identifying the vector file format.
const MAGIC: &[u8; 4] = b"FVI1";

/// Header: magic + u32 dimension + u32 count, all little-endian.
const HEADER_LEN: usize = 12;

/// In-memory image of the persisted vector file.
#[derive(Debug, Clone)]
struct IndexState {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

/// File-backed flat L2 index with aligned metadata store.
///
/// Both files are created lazily on the first upsert. Each operation
/// re-reads the persisted state, so a single `FlatIndex` instance must
/// own a given index path: its internal `RwLock` serializes upserts
/// against each other and against in-flight searches, which the bare
/// filesystem cannot do.
pub struct FlatIndex {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FlatIndex {
    /// Create a handle for the index at `path`. No I/O happens until the
    /// first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Path of the vector file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the metadata file, next to the vector file.
    fn meta_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".meta.json");
        PathBuf::from(name)
    }

    fn corrupt(&self, detail: impl Into<String>) -> DomainError {
        DomainError::CorruptIndex {
            path: self.path.clone(),
            detail: detail.into(),
        }
    }

    /// Read both files, or `None` when the index does not exist yet.
    ///
    /// A vector file without its metadata file (or the other way around),
    /// or any length disagreement between the two, is corruption: the
    /// row-id alignment invariant no longer holds.
    async fn load(&self) -> DomainResult<Option<(IndexState, Vec<ChunkRecord>)>> {
        let vector_bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let state = self.decode_vectors(&vector_bytes)?;

        let meta_bytes = match tokio::fs::read(self.meta_path()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(self.corrupt("vector file exists but metadata file is missing"));
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<ChunkRecord> = serde_json::from_slice(&meta_bytes)
            .map_err(|e| self.corrupt(format!("metadata is not a valid record array: {e}")))?;

        if records.len() != state.vectors.len() {
            return Err(self.corrupt(format!(
                "metadata has {} records but index has {} vectors",
                records.len(),
                state.vectors.len()
            )));
        }

        Ok(Some((state, records)))
    }

    fn decode_vectors(&self, bytes: &[u8]) -> DomainResult<IndexState> {
        if bytes.len() < HEADER_LEN {
            return Err(self.corrupt("vector file shorter than header"));
        }

        if &bytes[0..4] != MAGIC {
            return Err(self.corrupt("bad magic bytes in vector file"));
        }

        let dimension = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
        let count = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;

        if count > 0 && dimension == 0 {
            return Err(self.corrupt("zero dimension with non-zero vector count"));
        }

        let payload = &bytes[HEADER_LEN..];
        let expected = count
            .checked_mul(dimension)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| self.corrupt("vector count overflows"))?;

        if payload.len() != expected {
            return Err(self.corrupt(format!(
                "payload is {} bytes, expected {expected} for {count} x {dimension} vectors",
                payload.len()
            )));
        }

        let mut values = payload
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]));

        let vectors = (0..count)
            .map(|_| values.by_ref().take(dimension).collect())
            .collect();

        Ok(IndexState { dimension, vectors })
    }

    fn encode_vectors(state: &IndexState) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + state.vectors.len() * state.dimension * 4);
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&(state.dimension as u32).to_le_bytes());
        bytes.extend_from_slice(&(state.vectors.len() as u32).to_le_bytes());

        for vector in &state.vectors {
            for value in vector {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }

        bytes
    }

    /// Persist both files, temp-file plus rename so a reader never sees a
    /// half-written file. A crash between the two renames can still leave
    /// the stores misaligned; `load` detects that as corruption.
    async fn persist(&self, state: &IndexState, records: &[ChunkRecord]) -> DomainResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let vector_bytes = Self::encode_vectors(state);
        write_atomic(&self.path, &vector_bytes).await?;

        let meta_bytes = serde_json::to_vec(records)
            .map_err(|e| self.corrupt(format!("failed to encode metadata: {e}")))?;
        write_atomic(&self.meta_path(), &meta_bytes).await?;

        Ok(())
    }
}

/// Write `bytes` to a sibling temp file, then rename over `path`.
async fn write_atomic(path: &Path, bytes: &[u8]) -> DomainResult<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Squared Euclidean distance between two equal-length vectors.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[async_trait]
impl VectorIndex for FlatIndex {
    async fn upsert(&self, vectors: Vec<Vec<f32>>, records: Vec<ChunkRecord>) -> DomainResult<()> {
        if vectors.len() != records.len() {
            return Err(DomainError::Alignment {
                vectors: vectors.len(),
                records: records.len(),
            });
        }

        if vectors.is_empty() {
            return Ok(());
        }

        // A zero-dimension vector would establish dimension = 0 and
        // persist a file the decoder refuses to read back.
        if vectors.iter().any(Vec::is_empty) {
            return Err(DomainError::Validation(
                "vectors must have a non-zero dimension".to_string(),
            ));
        }

        let _guard = self.lock.write().await;

        let (mut state, mut existing) = match self.load().await? {
            Some((state, records)) => (state, records),
            None => (
                IndexState {
                    dimension: vectors[0].len(),
                    vectors: Vec::new(),
                },
                Vec::new(),
            ),
        };

        // Validate the whole batch before touching the stores; a failed
        // upsert must leave nothing behind.
        for vector in &vectors {
            if vector.len() != state.dimension {
                return Err(DomainError::DimensionMismatch {
                    expected: state.dimension,
                    got: vector.len(),
                });
            }
        }

        let appended = vectors.len();
        state.vectors.extend(vectors);
        existing.extend(records);

        self.persist(&state, &existing).await?;

        tracing::info!(
            path = %self.path.display(),
            appended,
            total = state.vectors.len(),
            "upserted vectors into index"
        );

        Ok(())
    }

    async fn search(&self, query: &[f32], top_k: usize) -> DomainResult<Vec<ScoredChunk>> {
        if top_k == 0 {
            return Err(DomainError::Validation(
                "top_k must be greater than 0".to_string(),
            ));
        }

        let _guard = self.lock.read().await;

        let (state, records) = self
            .load()
            .await?
            .ok_or_else(|| DomainError::IndexNotFound(self.path.clone()))?;

        if query.len() != state.dimension {
            return Err(DomainError::DimensionMismatch {
                expected: state.dimension,
                got: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = state
            .vectors
            .iter()
            .enumerate()
            .map(|(row_id, vector)| (row_id, squared_l2(query, vector)))
            .collect();

        // Nearest first; ties resolved by insertion order.
        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(row_id, distance)| ScoredChunk {
                row_id,
                distance,
                record: records[row_id].clone(),
            })
            .collect())
    }

    async fn len(&self) -> DomainResult<usize> {
        let _guard = self.lock.read().await;

        match self.load().await? {
            Some((state, _)) => Ok(state.vectors.len()),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(source: &str, page: u32, text: &str, position: usize) -> ChunkRecord {
        ChunkRecord {
            source_file: source.to_string(),
            page,
            text: text.to_string(),
            position,
        }
    }

    fn index_in(dir: &TempDir) -> FlatIndex {
        FlatIndex::new(dir.path().join("index.fvi"))
    }

    #[tokio::test]
    async fn test_search_missing_index_fails() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);

        let err = index.search(&[0.0, 0.0], 3).await.unwrap_err();
        assert!(matches!(err, DomainError::IndexNotFound(_)));
    }

    #[tokio::test]
    async fn test_len_missing_index_is_zero() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);
        assert_eq!(index.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upsert_then_exact_match_is_nearest() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);

        index
            .upsert(
                vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]],
                vec![
                    record("a.pdf", 1, "one", 0),
                    record("a.pdf", 2, "two", 0),
                    record("a.pdf", 3, "three", 0),
                ],
            )
            .await
            .unwrap();

        let hits = index.search(&[0.0, 1.0], 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].row_id, 1);
        assert_eq!(hits[0].distance, 0.0);
        assert_eq!(hits[0].record.page, 2);
    }

    #[tokio::test]
    async fn test_results_ascending_and_bounded() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);

        let vectors: Vec<Vec<f32>> = (0..10).map(|i| vec![i as f32, 0.0]).collect();
        let records = (0..10).map(|i| record("a.pdf", i + 1, "t", 0)).collect();
        index.upsert(vectors, records).await.unwrap();

        let hits = index.search(&[3.2, 0.0], 4).await.unwrap();
        assert_eq!(hits.len(), 4);
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        assert_eq!(hits[0].row_id, 3);
    }

    #[tokio::test]
    async fn test_ties_broken_by_row_id() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);

        // Two identical vectors: the earlier row must win the tie.
        index
            .upsert(
                vec![vec![1.0, 1.0], vec![1.0, 1.0]],
                vec![record("a.pdf", 1, "first", 0), record("a.pdf", 1, "dup", 1)],
            )
            .await
            .unwrap();

        let hits = index.search(&[1.0, 1.0], 2).await.unwrap();
        assert_eq!(hits[0].row_id, 0);
        assert_eq!(hits[1].row_id, 1);
    }

    #[tokio::test]
    async fn test_alignment_mismatch_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);

        let err = index
            .upsert(vec![vec![1.0]], vec![])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Alignment {
                vectors: 1,
                records: 0
            }
        ));
        assert_eq!(index.len().await.unwrap(), 0);
        assert!(!index.path().exists());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_rejected() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);

        index
            .upsert(vec![vec![1.0, 2.0]], vec![record("a.pdf", 1, "t", 0)])
            .await
            .unwrap();

        let err = index
            .upsert(vec![vec![1.0, 2.0, 3.0]], vec![record("a.pdf", 2, "t", 0)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::DimensionMismatch {
                expected: 2,
                got: 3
            }
        ));
        assert_eq!(index.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mixed_dimensions_in_one_batch_rejected() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);

        let err = index
            .upsert(
                vec![vec![1.0, 2.0], vec![1.0]],
                vec![record("a.pdf", 1, "t", 0), record("a.pdf", 2, "t", 0)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DimensionMismatch { .. }));
        assert_eq!(index.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_zero_dimension_vectors_rejected() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);

        let err = index
            .upsert(vec![vec![]], vec![record("a.pdf", 1, "t", 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // Nothing persisted, so a later well-formed upsert starts clean.
        assert!(!index.path().exists());
        index
            .upsert(vec![vec![1.0, 2.0]], vec![record("a.pdf", 1, "t", 0)])
            .await
            .unwrap();
        assert_eq!(index.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_upsert_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);

        index.upsert(vec![], vec![]).await.unwrap();
        assert_eq!(index.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_row_ids_dense_across_upserts() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);

        for batch in 0u32..3 {
            let vectors = (0..4).map(|i| vec![(batch * 4 + i) as f32]).collect();
            let records = (0..4)
                .map(|i| record("a.pdf", batch + 1, &format!("b{batch}c{i}"), i as usize))
                .collect();
            index.upsert(vectors, records).await.unwrap();
        }

        assert_eq!(index.len().await.unwrap(), 12);

        // Each row's nearest hit must be itself, in insertion order.
        for row in 0..12 {
            let hits = index.search(&[row as f32], 1).await.unwrap();
            assert_eq!(hits[0].row_id, row);
            assert_eq!(hits[0].record.text, format!("b{}c{}", row / 4, row % 4));
        }
    }

    #[tokio::test]
    async fn test_index_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.fvi");

        {
            let index = FlatIndex::new(&path);
            index
                .upsert(vec![vec![0.25, 0.75]], vec![record("a.pdf", 7, "persisted", 0)])
                .await
                .unwrap();
        }

        let reopened = FlatIndex::new(&path);
        let hits = reopened.search(&[0.25, 0.75], 1).await.unwrap();
        assert_eq!(hits[0].distance, 0.0);
        assert_eq!(hits[0].record.page, 7);
    }

    #[tokio::test]
    async fn test_garbage_vector_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.fvi");
        tokio::fs::write(&path, b"not an index").await.unwrap();

        let index = FlatIndex::new(&path);
        let err = index.search(&[0.0], 1).await.unwrap_err();
        assert!(matches!(err, DomainError::CorruptIndex { .. }));
    }

    #[tokio::test]
    async fn test_truncated_payload_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.fvi");

        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"FVI1");
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]); // 3 x 2 vectors need 24 bytes
        tokio::fs::write(&path, &bytes).await.unwrap();

        let index = FlatIndex::new(&path);
        let err = index.len().await.unwrap_err();
        assert!(matches!(err, DomainError::CorruptIndex { .. }));
    }

    #[tokio::test]
    async fn test_missing_metadata_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);

        index
            .upsert(vec![vec![1.0]], vec![record("a.pdf", 1, "t", 0)])
            .await
            .unwrap();
        tokio::fs::remove_file(index.meta_path()).await.unwrap();

        let err = index.search(&[1.0], 1).await.unwrap_err();
        assert!(matches!(err, DomainError::CorruptIndex { .. }));
    }

    #[tokio::test]
    async fn test_misaligned_metadata_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);

        index
            .upsert(
                vec![vec![1.0], vec![2.0]],
                vec![record("a.pdf", 1, "t", 0), record("a.pdf", 2, "t", 0)],
            )
            .await
            .unwrap();

        // Drop one record behind the index's back.
        let meta = index.meta_path();
        let records: Vec<ChunkRecord> =
            serde_json::from_slice(&tokio::fs::read(&meta).await.unwrap()).unwrap();
        tokio::fs::write(&meta, serde_json::to_vec(&records[..1]).unwrap())
            .await
            .unwrap();

        let err = index.search(&[1.0], 1).await.unwrap_err();
        assert!(matches!(err, DomainError::CorruptIndex { .. }));
    }

    #[tokio::test]
    async fn test_zero_top_k_rejected() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir);

        let err = index.search(&[0.0], 0).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
