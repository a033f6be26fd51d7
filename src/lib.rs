//! Back-office data layer for the Cariere student career fair.
//!
//! The heart of the crate is [`table`], the paginated table kit shared by
//! every admin list: page envelopes keyed by [`table::QueryIdentity`], an
//! explicit injected [`table::QueryCache`], the [`table::PagedQuery`] fetch
//! adapter, a renderer-agnostic column projection, pagination controls, and
//! the conservative mutation/invalidation policy. [`repository`] provides
//! the entity stores behind the fetch seam and [`services`] wires the two
//! together per collection.

pub mod domain;
pub mod models;
pub mod repository;
pub mod services;
pub mod table;
