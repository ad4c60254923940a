//! Orebi Core - Shared domain types.
//!
//! This crate provides the types used across the Orebi workspace:
//! - `catalog` - Persistence gateway and the catalog seeding workflow
//! - `cli` - Command-line tools for seeding and admin provisioning
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no database access, no HTTP clients.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, discounts, emails, and roles
//! - [`state`] - Storefront session and cart state with a pure reducer

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod state;
pub mod types;

pub use types::*;
