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

//! This module defines the `Explorer` trait.

use crate::{Error, SearchOutcome};

/// This is the explorer abstraction. It is implemented by the structures that
/// carry out the branch-and-bound search of an optimal selection of items,
/// under one given concurrency regime.
///
/// All explorers share the same tree semantics: nodes are created in the
/// decision order of the ratio-sorted catalogue, the bound of a node is the
/// fractional relaxation of its residual problem, and a node is never
/// expanded when its bound does not exceed the incumbent. Hence, all
/// explorers agree on the optimal value they report. Their exploration
/// counters, however, may differ.
pub trait Explorer {
    /// Searches the decision space to exhaustion and returns the optimal
    /// value, an optimal selection of items and the tree which witnesses it.
    ///
    /// Every call runs a fresh search from a fresh root.
    fn explore(&mut self) -> Result<SearchOutcome, Error>;
}
