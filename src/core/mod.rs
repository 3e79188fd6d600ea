//! Core of hookwarden's hook pipeline.
//!
//! Event decoding, the verdict algebra, pattern catalogs, pipelines and
//! the external-tool seam live here. Policy checks themselves live in
//! [`crate::plugins`].

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod external;
pub mod logging;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod verdict;
