//! Fixed-size worker pool with a ranged parallel-for.
//!
//! Every operation splits its input into at most `threads` contiguous blocks
//! of `⌈len / threads⌉` elements and returns only once all blocks are done, so
//! each call doubles as a barrier. Blocks never overlap, which is what lets
//! workers write into shared buffers without locks.
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::ConfigError;

pub struct WorkerPool {
    pool: ThreadPool,
    threads: usize,
}

impl WorkerPool {
    pub fn new(threads: usize) -> Result<Self, ConfigError> {
        if threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("maxent-worker-{}", i))
            .build()?;
        log::trace!("Started worker pool with {} threads", threads);
        Ok(Self { pool, threads })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Block size used to partition `len` elements across the workers.
    pub fn block_len(&self, len: usize) -> usize {
        len.div_ceil(self.threads).max(1)
    }

    /// Run `f(start, block)` on every contiguous block of `data`, where `start`
    /// is the offset of the block's first element.
    pub fn for_each_block<F>(&self, data: &mut [f64], f: F)
    where
        F: Fn(usize, &mut [f64]) + Sync + Send,
    {
        let block_len = self.block_len(data.len());
        self.pool.install(|| {
            data.par_chunks_mut(block_len)
                .enumerate()
                .for_each(|(b, block)| f(b * block_len, block))
        });
    }

    /// Like [`for_each_block`](Self::for_each_block), collecting one result per
    /// block in block order.
    pub fn map_blocks<R, F>(&self, data: &mut [f64], f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize, &mut [f64]) -> R + Sync + Send,
    {
        let block_len = self.block_len(data.len());
        self.pool.install(|| {
            data.par_chunks_mut(block_len)
                .enumerate()
                .map(|(b, block)| f(b * block_len, block))
                .collect()
        })
    }

    /// Hand each pre-partitioned work item to a worker.
    pub fn for_each<T, F>(&self, items: Vec<T>, f: F)
    where
        T: Send,
        F: Fn(T) + Sync + Send,
    {
        self.pool.install(|| items.into_par_iter().for_each(f));
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads)
            .finish()
    }
}
