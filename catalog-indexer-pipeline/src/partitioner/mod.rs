//! Partitioner for the catalog indexer pipeline.
//!
//! Splits the ordered dataset into contiguous chunks, one per bulk request.
//!
//! For a dataset of `len` items and `P` partitions the chunk size is
//! `ceil(len / P)`. Chunks are emitted back to back and the last one takes
//! the remainder, so the number of chunks is `ceil(len / chunk_size)`, which
//! can be lower than `P`:
//!
//! | len | P | chunk size | chunk lengths |
//! |-----|---|------------|---------------|
//! | 23  | 4 | 6          | 6, 6, 6, 5    |
//! | 9   | 4 | 3          | 3, 3, 3       |
//! | 3   | 8 | 1          | 1, 1, 1       |
//! | 0   | 4 | 0          | (none)        |
//!
//! An empty dataset yields no chunks. Every emitted chunk is non-empty.

use std::fmt;
use std::num::NonZeroUsize;
use std::ops::{Deref, Range};
use std::sync::Arc;

/// A contiguous, read-only view into a shared dataset.
pub struct Chunk<T> {
    dataset: Arc<[T]>,
    range: Range<usize>,
    index: usize,
}

impl<T> Chunk<T> {
    /// Position of this chunk in dispatch order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Dataset positions covered by this chunk.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.dataset[self.range.clone()]
    }
}

impl<T> Deref for Chunk<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> Clone for Chunk<T> {
    fn clone(&self) -> Self {
        Self {
            dataset: Arc::clone(&self.dataset),
            range: self.range.clone(),
            index: self.index,
        }
    }
}

impl<T> fmt::Debug for Chunk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("index", &self.index)
            .field("range", &self.range)
            .finish()
    }
}

/// Splits datasets into at most `partitions` contiguous chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    partitions: NonZeroUsize,
}

impl Partitioner {
    pub fn new(partitions: NonZeroUsize) -> Self {
        Self { partitions }
    }

    /// One partition per available processor, or one if that is unknown.
    pub fn from_available_parallelism() -> Self {
        Self::new(std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN))
    }

    /// Requested number of partitions.
    pub fn partitions(&self) -> usize {
        self.partitions.get()
    }

    /// `ceil(len / partitions)`; zero for an empty dataset.
    pub fn chunk_size(&self, len: usize) -> usize {
        len.div_ceil(self.partitions.get())
    }

    /// Index ranges of the chunks for a dataset of `len` items.
    pub fn ranges(&self, len: usize) -> Vec<Range<usize>> {
        let size = self.chunk_size(len);
        if size == 0 {
            return Vec::new();
        }

        (0..len)
            .step_by(size)
            .map(|start| start..(start + size).min(len))
            .collect()
    }

    /// Borrow the chunks of a slice.
    pub fn split<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        self.ranges(items.len())
            .into_iter()
            .map(|range| &items[range])
            .collect()
    }

    /// Chunks sharing ownership of the dataset, suitable for moving into tasks.
    pub fn chunks<T>(&self, dataset: Arc<[T]>) -> Vec<Chunk<T>> {
        self.ranges(dataset.len())
            .into_iter()
            .enumerate()
            .map(|(index, range)| Chunk {
                dataset: Arc::clone(&dataset),
                range,
                index,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partitioner(partitions: usize) -> Partitioner {
        Partitioner::new(NonZeroUsize::new(partitions).unwrap())
    }

    fn lengths<T>(chunks: &[&[T]]) -> Vec<usize> {
        chunks.iter().map(|chunk| chunk.len()).collect()
    }

    #[test]
    fn test_remainder_goes_to_last_chunk() {
        let items: Vec<u32> = (0..23).collect();
        let p = partitioner(4);

        assert_eq!(p.chunk_size(23), 6);
        assert_eq!(lengths(&p.split(&items)), vec![6, 6, 6, 5]);
    }

    #[test]
    fn test_fewer_chunks_than_partitions() {
        let items: Vec<u32> = (0..9).collect();
        assert_eq!(lengths(&partitioner(4).split(&items)), vec![3, 3, 3]);

        let items = [1, 2, 3];
        let chunks = partitioner(8).split(&items);
        assert_eq!(lengths(&chunks), vec![1, 1, 1]);
        assert_eq!(chunks.concat(), items);
    }

    #[test]
    fn test_empty_dataset_yields_no_chunks() {
        let items: Vec<u32> = Vec::new();

        assert_eq!(partitioner(4).chunk_size(0), 0);
        assert!(partitioner(4).split(&items).is_empty());
        assert!(partitioner(1).ranges(0).is_empty());
        assert!(partitioner(3).chunks(Arc::<[u32]>::from(items)).is_empty());
    }

    #[test]
    fn test_single_partition() {
        let items: Vec<u32> = (0..5).collect();
        assert_eq!(lengths(&partitioner(1).split(&items)), vec![5]);
    }

    #[test]
    fn test_concatenation_reconstructs_dataset() {
        for len in 0..64usize {
            let items: Vec<usize> = (0..len).collect();
            for partitions in 1..=12 {
                let p = partitioner(partitions);
                let chunks = p.split(&items);

                assert_eq!(chunks.concat(), items, "len={} p={}", len, partitions);
                assert!(chunks.len() <= partitions);
                assert!(chunks.len() <= len);
                assert!(chunks.iter().all(|chunk| !chunk.is_empty()));
            }
        }
    }

    #[test]
    fn test_shared_chunks_view_dataset() {
        let dataset: Arc<[u32]> = (0..10).collect::<Vec<_>>().into();
        let chunks = partitioner(3).chunks(Arc::clone(&dataset));

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].index(), 0);
        assert_eq!(chunks[2].range(), 8..10);
        assert_eq!(&*chunks[1], &[4, 5, 6, 7]);

        let rebuilt: Vec<u32> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        assert_eq!(&rebuilt[..], &dataset[..]);
    }

    #[test]
    fn test_available_parallelism_is_positive() {
        assert!(Partitioner::from_available_parallelism().partitions() >= 1);
    }
}
