//! Concurrent signature scanning implementation.
//!
//! The work is split across a fixed set of shards, each owning part of
//! the signature set, running on a thread pool built once per engine.
//!
//! # .NET vs Rust Parallelism
//!
//! A .NET implementation would reach for TPL, spawning a task per worker
//! and collecting into a shared set under a lock (or firing a callback
//! per worker as results arrive):
//!
//! ```csharp
//! Parallel.ForEach(shards, shard => {
//!     var found = shard.Scan(data);
//!     lock (collected) { collected.UnionWith(found); }
//! });
//! ```
//!
//! Here rayon's work distribution replaces TPL and ownership replaces the
//! lock: each shard returns its own owned match set, and the sets are
//! unioned only after the parallel section has joined. The borrow checker
//! guarantees no shard can touch another's results, so the merge needs no
//! synchronization at all:
//!
//! ```rust,ignore
//! let shard_matches: Vec<BTreeSet<String>> = pool.install(|| {
//!     shards.par_iter().map(|shard| shard.scan(data)).collect()
//! });
//! ```

pub mod engine;
pub mod shard;
pub mod signature;

pub use engine::ScanEngine;
pub use shard::ScanShard;
pub use signature::Signature;
