//! Rayon-parallel variants of map, zip and reduce.
//!
//! The buffers are cut into disjoint [`PARALLEL_CHUNK_SIZE`] pieces and each piece
//! runs the single-threaded harness on the rayon pool. Results equal the sequential
//! functions exactly. Inputs shorter than [`PARALLEL_THRESHOLD`] skip the pool.

use rayon::prelude::*;

use crate::{
    error::{ensure_destination, length_mismatch, Result},
    map::{map, map_kernel},
    reduce::reduce,
    simd::traits::{BinaryVector, Isa, Reduction, UnaryVector},
    zip::{zip, zip_kernel},
    PARALLEL_CHUNK_SIZE, PARALLEL_THRESHOLD,
};

/// Parallel [`map`]: `dst[i] = O::scalar(src[i])`.
pub fn par_map<I, O>(src: &[i32], dst: &mut [i32]) -> Result<()>
where
    I: Isa,
    O: UnaryVector<I>,
{
    let n = src.len();
    if n < PARALLEL_THRESHOLD {
        return map::<I, O>(src, dst);
    }

    ensure_destination(n, dst)?;

    log::trace!("parallel map over {n} elements in chunks of {PARALLEL_CHUNK_SIZE}");

    dst[..n]
        .par_chunks_mut(PARALLEL_CHUNK_SIZE)
        .zip(src.par_chunks(PARALLEL_CHUNK_SIZE))
        .for_each(|(d, s)| map_kernel::<I, O>(s, d));

    Ok(())
}

/// Parallel [`zip`]: `dst[i] = O::scalar(lhs[i], rhs[i])`.
///
/// Operands are validated once, up front, with the same errors as [`zip`].
pub fn par_zip<I, O>(lhs: &[i32], rhs: &[i32], dst: &mut [i32]) -> Result<()>
where
    I: Isa,
    O: BinaryVector<I>,
{
    let n = lhs.len();
    if n < PARALLEL_THRESHOLD {
        return zip::<I, O>(lhs, rhs, dst);
    }

    if n != rhs.len() {
        return Err(length_mismatch(n, rhs.len()));
    }
    ensure_destination(n, dst)?;
    O::validate(lhs, rhs)?;

    log::trace!("parallel zip over {n} elements in chunks of {PARALLEL_CHUNK_SIZE}");

    dst[..n]
        .par_chunks_mut(PARALLEL_CHUNK_SIZE)
        .zip(lhs.par_chunks(PARALLEL_CHUNK_SIZE))
        .zip(rhs.par_chunks(PARALLEL_CHUNK_SIZE))
        .for_each(|((c, a), b)| zip_kernel::<I, O>(a, b, c));

    Ok(())
}

/// Parallel [`reduce`]. Chunk results are combined with the scalar rule.
pub fn par_reduce<I, O>(src: &[i32]) -> i32
where
    I: Isa,
    O: Reduction + BinaryVector<I>,
{
    if src.len() < PARALLEL_THRESHOLD {
        return reduce::<I, O>(src);
    }

    log::trace!(
        "parallel reduce over {} elements in chunks of {PARALLEL_CHUNK_SIZE}",
        src.len()
    );

    src.par_chunks(PARALLEL_CHUNK_SIZE)
        .map(reduce::<I, O>)
        .reduce(|| O::IDENTITY, O::scalar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::LanewiseError,
        ops::{Div, Max, Square, Sub, Sum},
        simd::portable::{Portable4, Portable8},
    };

    fn data(len: usize, seed: i32) -> Vec<i32> {
        (0..len as i32)
            .map(|i| i.wrapping_mul(2_654_435_761u32 as i32).wrapping_add(seed) >> 8)
            .collect()
    }

    #[test]
    fn test_par_map_matches_sequential() {
        let src = data(PARALLEL_THRESHOLD * 2 + 5, 1);
        let mut par = vec![0; src.len()];
        let mut seq = vec![0; src.len()];

        par_map::<Portable8, Square>(&src, &mut par).unwrap();
        map::<Portable8, Square>(&src, &mut seq).unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_par_zip_matches_sequential() {
        let a = data(PARALLEL_THRESHOLD + 3, 2);
        let b = data(PARALLEL_THRESHOLD + 3, 3);
        let mut par = vec![0; a.len()];
        let mut seq = vec![0; a.len()];

        par_zip::<Portable4, Sub>(&a, &b, &mut par).unwrap();
        zip::<Portable4, Sub>(&a, &b, &mut seq).unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_par_zip_validates_before_writing() {
        let a = data(PARALLEL_THRESHOLD + 3, 4);
        let mut b = vec![1; a.len()];
        b[PARALLEL_THRESHOLD] = 0;
        let mut out = vec![-1; a.len()];

        assert_eq!(
            par_zip::<Portable8, Div>(&a, &b, &mut out),
            Err(LanewiseError::DivisionByZero {
                index: PARALLEL_THRESHOLD
            })
        );
        assert!(out.iter().all(|&x| x == -1));
    }

    #[test]
    fn test_par_reduce_matches_sequential() {
        let src = data(PARALLEL_THRESHOLD * 3 + 11, 5);
        assert_eq!(
            par_reduce::<Portable8, Sum>(&src),
            reduce::<Portable8, Sum>(&src)
        );
        assert_eq!(
            par_reduce::<Portable4, Max>(&src),
            *src.iter().max().unwrap()
        );
    }

    #[test]
    fn test_small_inputs_fall_back() {
        let src = [1, 2, 3];
        let mut dst = [0; 3];
        par_map::<Portable4, Square>(&src, &mut dst).unwrap();
        assert_eq!(dst, [1, 4, 9]);
        assert_eq!(par_reduce::<Portable4, Sum>(&src), 6);
    }
}
