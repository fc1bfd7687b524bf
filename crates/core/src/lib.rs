//! Core business logic for Clinic IMS.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and stock calculations live here.
//!
//! # Modules
//!
//! - `stock` - Stock ledger: receipt merging and first-expiry-first-out issuing
//! - `catalog` - Product and employee input validation
//! - `auth` - Password hashing and user types

pub mod auth;
pub mod catalog;
pub mod stock;
