#![forbid(unsafe_code)]
//! Ordered maps with order statistics. See the map and multimap modules for details.

pub(crate) mod avl;
pub mod error;
pub mod map;
pub mod multimap;
pub mod primes;
pub mod probe;

pub use crate::error::{Error, Result};
