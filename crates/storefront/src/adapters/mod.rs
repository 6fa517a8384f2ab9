// Rust guideline compliant 2026-02-23

//! Adapters (secondary ports) for the offline `storefront` binary.
//!
//! Each sub-module implements one hexagonal port trait defined in the
//! `domain` crate. The HTTP feed and the file store are loaded by
//! `storefront_http` only, via `#[path]`.

pub mod demo_catalog;
pub mod in_memory_store;
