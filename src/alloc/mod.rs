//! Page arena allocation for adjacency and property blocks.
//!
//! - `address`: the opaque [`Address`] handle and its [`PageLayout`]
//! - `bump`: the shared [`BumpAllocator`] and per-worker [`LocalAllocator`]
//! - `positional`: writes mirrored at addresses from another bump allocator
//! - `pages`: the immutable result of a finalized allocator

pub mod address;
pub mod bump;
pub mod pages;
pub mod positional;

pub use address::{Address, PageLayout};
pub use bump::{BumpAllocator, LocalAllocator, PageElement};
pub use pages::Pages;
pub use positional::LocalPositionalAllocator;
