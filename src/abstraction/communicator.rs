// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module defines the `Communicator` trait: the collective operations
//! through which the ranks of a distributed search cooperate.

use bytes::Bytes;

use crate::{wire, CommError};

/// A communicator connects one rank to all the other ranks participating to
/// the same distributed search. Ranks share no memory: the only way for them
/// to exchange information is to send frames of bytes to each other.
///
/// All operations are collective. Every rank must call them in the very same
/// order, and each call blocks until all ranks have joined it. A rank that
/// never joins blocks the others forever.
pub trait Communicator {
    /// The index of this rank, in `0..size()`
    fn rank(&self) -> usize;
    /// The number of participating ranks
    fn size(&self) -> usize;
    /// Sends `frame` to every rank and returns the frames contributed by all
    /// ranks (this one included), indexed by rank.
    fn all_gather(&self, frame: Bytes) -> Result<Vec<Bytes>, CommError>;
    /// Returns the frame of rank `root` on every rank. The `frame` argument
    /// is ignored on all other ranks.
    fn broadcast(&self, root: usize, frame: Bytes) -> Result<Bytes, CommError>;

    /// The maximum of the values contributed by all ranks
    fn all_reduce_max(&self, value: f32) -> Result<f32, CommError> {
        let mut max = f32::NEG_INFINITY;
        for frame in self.all_gather(wire::encode_f32(value))? {
            max = max.max(wire::decode_f32(&frame)?);
        }
        Ok(max)
    }
    /// The maximum of the values contributed by all ranks along with the rank
    /// contributing it. When several ranks contribute the maximum, the lowest
    /// of them wins.
    fn all_reduce_max_loc(&self, value: f32) -> Result<(f32, usize), CommError> {
        let mut best = (f32::NEG_INFINITY, 0);
        for (rank, frame) in self.all_gather(wire::encode_f32(value))?.iter().enumerate() {
            let value = wire::decode_f32(frame)?;
            if value > best.0 {
                best = (value, rank);
            }
        }
        Ok(best)
    }
    /// The sum of the counters contributed by all ranks
    fn all_reduce_sum(&self, value: u64) -> Result<u64, CommError> {
        let mut sum = 0;
        for frame in self.all_gather(wire::encode_u64(value))? {
            sum += wire::decode_u64(&frame)?;
        }
        Ok(sum)
    }
}
