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

//! This module provides the explorers: the sequential depth-first one, the
//! fork-join parallel one and the distributed one.

use crate::NodeId;

mod sequential;
mod parallel;
mod distributed;

pub use sequential::*;
pub use parallel::*;
pub use distributed::*;

/// The work remaining on the explicit stack of a depth first exploration.
/// Popping `Exclude` after the whole include subtree has been developed keeps
/// the include-first order of a recursive descent without using the call
/// stack (decision trees are as deep as the catalogue is long).
#[derive(Debug, Clone, Copy)]
enum Pending {
    /// Check the bound of this (already created) node and develop it
    Branch(NodeId),
    /// Create the exclude child of this node and branch on it
    Exclude(NodeId),
}
