//! services/api/src/lib.rs
//!
//! The Wingman service: adapters for the remote store, storage bucket and
//! vision model, plus the local HTTP surface the mobile client talks to.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
