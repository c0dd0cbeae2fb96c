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

//! This module provides an in-process cluster: every rank runs on its own
//! thread and owns a private copy of its data. The ranks share no memory;
//! they only exchange frames of bytes through channels.

use bytes::Bytes;
use crossbeam::channel::{unbounded, Receiver, Sender};

use crate::{CommError, Communicator};

/// The endpoint through which one rank of a `LocalCluster` talks to the others.
///
/// There is one FIFO channel per ordered pair of ranks (self loops included).
/// Because all ranks call the collectives in the same order, the k-th frame
/// received from a given peer always belongs to the k-th collective.
pub struct LocalEndpoint {
    rank  : usize,
    /// outbox[peer] sends frames to `peer`
    outbox: Vec<Sender<Bytes>>,
    /// inbox[peer] receives the frames sent by `peer`
    inbox : Vec<Receiver<Bytes>>,
}

/// A cluster of ranks living in the same process.
///
/// # Example
/// ```
/// # use knapsack_bnb::*;
/// let maxima = LocalCluster::run(3, |endpoint| {
///     let mine = endpoint.rank() as f32 * 10.0;
///     endpoint.all_reduce_max(mine).unwrap()
/// });
/// assert_eq!(vec![20.0, 20.0, 20.0], maxima);
/// ```
pub struct LocalCluster;
impl LocalCluster {
    /// Creates the `size` interconnected endpoints of a cluster
    pub fn endpoints(size: usize) -> Vec<LocalEndpoint> {
        let mut outboxes: Vec<Vec<Sender<Bytes>>>   = (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut inboxes : Vec<Vec<Receiver<Bytes>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        for outbox in outboxes.iter_mut() {
            for inbox in inboxes.iter_mut() {
                let (tx, rx) = unbounded();
                outbox.push(tx);
                inbox.push(rx);
            }
        }
        outboxes.into_iter().zip(inboxes).enumerate()
            .map(|(rank, (outbox, inbox))| LocalEndpoint { rank, outbox, inbox })
            .collect()
    }

    /// Runs `f` on every rank of a cluster of `size` ranks (each of them on a
    /// dedicated thread) and returns their results, indexed by rank. This
    /// returns when all ranks have completed.
    ///
    /// # Note
    /// When a rank panics, its endpoint is dropped and the peers waiting on
    /// it fail with `CommError::Disconnected`. The panic is then propagated
    /// to the caller.
    pub fn run<F, T>(size: usize, f: F) -> Vec<T>
    where
        F: Fn(LocalEndpoint) -> T + Sync,
        T: Send,
    {
        let endpoints = Self::endpoints(size);
        std::thread::scope(|s| {
            let f = &f;
            let handles: Vec<_> = endpoints.into_iter()
                .map(|endpoint| s.spawn(move || f(endpoint)))
                .collect();

            handles.into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

impl LocalEndpoint {
    fn send(&self, peer: usize, frame: Bytes) -> Result<(), CommError> {
        self.outbox[peer].send(frame).map_err(|_| CommError::Disconnected { peer })
    }
    fn recv(&self, peer: usize) -> Result<Bytes, CommError> {
        self.inbox[peer].recv().map_err(|_| CommError::Disconnected { peer })
    }
}

impl Communicator for LocalEndpoint {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.outbox.len()
    }

    fn all_gather(&self, frame: Bytes) -> Result<Vec<Bytes>, CommError> {
        for peer in 0..self.size() {
            self.send(peer, frame.clone())?;
        }
        (0..self.size()).map(|peer| self.recv(peer)).collect()
    }

    fn broadcast(&self, root: usize, frame: Bytes) -> Result<Bytes, CommError> {
        if self.rank == root {
            for peer in (0..self.size()).filter(|p| *p != root) {
                self.send(peer, frame.clone())?;
            }
            Ok(frame)
        } else {
            self.recv(root)
        }
    }
}

#[cfg(test)]
mod test_local_cluster {
    use bytes::Bytes;
    use crate::*;

    #[test]
    fn ranks_are_numbered_from_zero() {
        let ranks = LocalCluster::run(4, |ep| (ep.rank(), ep.size()));
        assert_eq!(vec![(0, 4), (1, 4), (2, 4), (3, 4)], ranks);
    }
    #[test]
    fn all_gather_collects_the_frames_by_rank() {
        let gathered = LocalCluster::run(3, |ep| {
            let frame = Bytes::from(vec![ep.rank() as u8]);
            ep.all_gather(frame).unwrap()
        });
        for frames in gathered {
            let flat: Vec<u8> = frames.iter().map(|f| f[0]).collect();
            assert_eq!(vec![0, 1, 2], flat);
        }
    }
    #[test]
    fn max_loc_resolves_ties_to_the_lowest_rank() {
        let results = LocalCluster::run(4, |ep| {
            let value = if ep.rank() == 0 { 1.0 } else { 5.0 };
            ep.all_reduce_max_loc(value).unwrap()
        });
        assert!(results.iter().all(|r| *r == (5.0, 1)));
    }
    #[test]
    fn sum_adds_all_contributions() {
        let results = LocalCluster::run(5, |ep| ep.all_reduce_sum(ep.rank() as u64 + 1).unwrap());
        assert!(results.iter().all(|r| *r == 15));
    }
    #[test]
    fn broadcast_delivers_the_root_frame_everywhere() {
        let results = LocalCluster::run(4, |ep| {
            let frame = Bytes::from(format!("from {}", ep.rank()));
            ep.broadcast(2, frame).unwrap()
        });
        assert!(results.iter().all(|f| &f[..] == b"from 2"));
    }
    #[test]
    fn successive_collectives_do_not_mix_up() {
        let results = LocalCluster::run(3, |ep| {
            let mut acc = vec![];
            for round in 0..10 {
                let v = (ep.rank() * 100 + round) as f32;
                acc.push(ep.all_reduce_max(v).unwrap());
                acc.push(ep.all_reduce_sum(round as u64).unwrap() as f32);
            }
            acc
        });
        for acc in results {
            for round in 0..10 {
                assert_eq!((200 + round) as f32, acc[2 * round]);
                assert_eq!((3 * round) as f32, acc[2 * round + 1]);
            }
        }
    }
    #[test]
    fn a_dropped_peer_is_reported_as_disconnected() {
        let results = LocalCluster::run(2, |ep| {
            if ep.rank() == 1 {
                drop(ep);
                None
            } else {
                Some(ep.all_reduce_max(1.0))
            }
        });
        match &results[0] {
            Some(Err(CommError::Disconnected { peer: 1 })) => {},
            other => panic!("unexpected outcome {:?}", other),
        }
    }
    #[test]
    fn a_single_rank_cluster_talks_to_itself() {
        let results = LocalCluster::run(1, |ep| {
            let max = ep.all_reduce_max(3.0).unwrap();
            let bc  = ep.broadcast(0, Bytes::from_static(b"x")).unwrap();
            (max, bc)
        });
        assert_eq!(vec![(3.0, Bytes::from_static(b"x"))], results);
    }
}
