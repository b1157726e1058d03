//! Exact nearest-neighbour search over a flat list of vectors.
//!
//! [`FlatL2Index`] keeps every vector in one contiguous buffer and answers
//! queries by scanning all of them with squared Euclidean distance. Vectors
//! can only be appended; any other change means rebuilding the index.

use std::io::{Read, Write};

use crate::error::{RagError, Result};

const BACKEND: &str = "FlatL2";

/// Magic bytes at the start of a serialized index.
const MAGIC: &[u8; 4] = b"KRIX";

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// Index position returned for missing neighbours when fewer than `k` vectors exist.
pub const MISSING_NEIGHBOR: i64 = -1;

/// The raw outcome of a k-nearest-neighbour query.
///
/// Both vectors always have length `k`. Slots beyond the number of stored
/// vectors hold [`MISSING_NEIGHBOR`] with a distance of `f32::MAX`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHits {
    /// Squared L2 distances, ascending.
    pub distances: Vec<f32>,
    /// Positions of the matching vectors.
    pub indices: Vec<i64>,
}

impl SearchHits {
    /// Iterate over `(position, distance)` pairs, skipping missing neighbours.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices
            .iter()
            .zip(&self.distances)
            .filter(|(idx, _)| **idx != MISSING_NEIGHBOR)
            .map(|(idx, distance)| (*idx as usize, *distance))
    }
}

/// A flat index using squared Euclidean (L2) distance.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatL2Index {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    /// Create an empty index for vectors of `dimension` components.
    pub fn new(dimension: usize) -> Self {
        Self { dimension, data: Vec::new() }
    }

    /// Build an index over `vectors`, taking the dimension from the first one.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStoreError`] if `vectors` is empty or the
    /// vectors do not all share one dimension.
    pub fn build(vectors: &[Vec<f32>]) -> Result<Self> {
        let first = vectors.first().ok_or_else(|| store_error("cannot build an empty index"))?;
        let mut index = Self::new(first.len());
        index.data.reserve(vectors.len() * first.len());
        for vector in vectors {
            index.add(vector)?;
        }
        Ok(index)
    }

    /// Append one vector.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStoreError`] on a dimension mismatch.
    pub fn add(&mut self, vector: &[f32]) -> Result<()> {
        self.check_dimension(vector)?;
        self.data.extend_from_slice(vector);
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        if self.dimension == 0 { 0 } else { self.data.len() / self.dimension }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The vector stored at `position`.
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    /// Return the `k` stored vectors closest to `query`, nearest first.
    ///
    /// Ties keep insertion order. The result always has `k` entries, so
    /// callers taking `k` from untrusted input should bound it by [`len`](Self::len).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStoreError`] if `query` has the wrong dimension.
    pub fn search(&self, query: &[f32], k: usize) -> Result<SearchHits> {
        self.check_dimension(query)?;

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimension.max(1))
            .take(self.len())
            .enumerate()
            .map(|(position, vector)| (position, squared_l2(vector, query)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        let capacity = k.min(self.len());
        let mut hits =
            SearchHits { distances: Vec::with_capacity(capacity), indices: Vec::with_capacity(capacity) };
        for (position, distance) in scored {
            hits.indices.push(position as i64);
            hits.distances.push(distance);
        }
        while hits.indices.len() < k {
            hits.indices.push(MISSING_NEIGHBOR);
            hits.distances.push(f32::MAX);
        }
        Ok(hits)
    }

    /// Serialize the index as `KRIX | version | dimension | count | rows`, little-endian.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
        writer.write_all(&(self.dimension as u32).to_le_bytes())?;
        writer.write_all(&(self.len() as u64).to_le_bytes())?;
        for value in &self.data {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Deserialize an index written by [`write_to`](Self::write_to).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStoreError`] for a bad header or truncated data.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 4];
        read_exact(&mut reader, &mut magic)?;
        if &magic != MAGIC {
            return Err(store_error("not a vector index file (bad magic)"));
        }

        let version = u32::from_le_bytes(read_array(&mut reader)?);
        if version != FORMAT_VERSION {
            return Err(store_error(format!("unsupported index format version {version}")));
        }

        let dimension = u32::from_le_bytes(read_array(&mut reader)?) as usize;
        let count = u64::from_le_bytes(read_array(&mut reader)?) as usize;
        let expected_bytes = count
            .checked_mul(dimension)
            .and_then(|total| total.checked_mul(4))
            .ok_or_else(|| store_error("index header declares an impossible size"))?;

        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        if bytes.len() != expected_bytes {
            return Err(store_error(format!(
                "index data holds {} bytes, expected {expected_bytes} for {count} vectors of dimension {dimension}",
                bytes.len()
            )));
        }

        let data = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        Ok(Self { dimension, data })
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(store_error(format!(
                "vector has dimension {}, index expects {}",
                vector.len(),
                self.dimension
            )));
        }
        Ok(())
    }
}

/// Squared Euclidean distance between two equal-length vectors.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn store_error(message: impl Into<String>) -> RagError {
    RagError::VectorStoreError { backend: BACKEND.to_string(), message: message.into() }
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => store_error("index file is truncated"),
        _ => RagError::Io(e),
    })
}

fn read_array<R: Read, const N: usize>(reader: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    read_exact(reader, &mut buf)?;
    Ok(buf)
}
