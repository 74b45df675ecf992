//! Static work partitioning
//!
//! Splits an ordered collection into contiguous chunks whose sizes differ by at
//! most one, the first `len % n` chunks taking the extra element.

use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("Cannot split work into zero chunks")]
    ZeroChunks,
}

/// Index range of chunk `i` when `len` items are split `n` ways
///
/// Callers must ensure `n > 0` and `i < n`.
#[must_use]
pub fn chunk_bounds(len: usize, n: usize, i: usize) -> Range<usize> {
    let (quotient, remainder) = (len / n, len % n);
    let lower = i * quotient + i.min(remainder);
    let upper = (i + 1) * quotient + (i + 1).min(remainder);
    lower..upper
}

/// Split `items` into exactly `n` contiguous chunks
///
/// When `n` exceeds the number of items the trailing chunks are empty.
///
/// # Errors
///
/// Returns `PartitionError::ZeroChunks` if `n == 0`.
///
/// # Examples
/// ```
/// use spelling_bee::batch::partition::split;
///
/// let chunks = split(&[1, 2, 3, 4, 5], 3).unwrap();
/// assert_eq!(chunks, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);
/// ```
pub fn split<T>(items: &[T], n: usize) -> Result<Vec<&[T]>, PartitionError> {
    if n == 0 {
        return Err(PartitionError::ZeroChunks);
    }
    Ok((0..n).map(|i| &items[chunk_bounds(items.len(), n, i)]).collect())
}
