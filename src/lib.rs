//! Page-reference cache simulator.
//!
//! A [`controller::Controller`] maps a stream of page references into a
//! fixed-capacity [`cache::CacheStore`] using direct, fully associative or
//! two-way set associative placement, and once the store is full picks
//! victims with FIFO, LRU, LFU, MRU or random replacement.

pub mod assign;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod replace;
pub mod sim;
pub mod trace;
