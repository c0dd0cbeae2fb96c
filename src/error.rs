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

//! The errors that may be reported by the explorers.
//!
//! An empty catalogue is *not* an error: it yields a degraded outcome with
//! an optimal value of zero. Negative weights and a negative capacity are
//! preconditions the caller must check; they are not reported here.

use crate::SearchConfigBuilderError;

/// Everything that can go wrong when running a search
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("communication failure {0}")]
    Comm(#[from] CommError),
    #[error("could not build the worker pool {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("invalid configuration {0}")]
    Config(#[from] SearchConfigBuilderError),
    #[error("a distributed search needs at least one rank")]
    NoRank,
}
impl From<WireError> for Error {
    fn from(e: WireError) -> Self {
        Error::Comm(CommError::Wire(e))
    }
}

/// A collective operation could not complete
#[derive(Debug, thiserror::Error)]
pub enum CommError {
    /// The endpoint of that rank has been dropped (its process is gone)
    #[error("rank {peer} is unreachable")]
    Disconnected { peer: usize },
    #[error("malformed frame {0}")]
    Wire(#[from] WireError),
}

/// A frame does not follow the wire layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("frame holds {actual} bytes, {expected} expected")]
    Truncated { expected: usize, actual: usize },
    #[error("negative item count {0}")]
    NegativeCount(i32),
    #[error("{0} items cannot be counted on 32 bits")]
    CountOverflow(usize),
}
