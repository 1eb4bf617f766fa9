//! Record store implementations for Navbat
//!
//! This crate provides the reservation record store behind the
//! `navbat_common::ReservationStore` trait: a SQL implementation built on
//! SQLx (SQLite by default, PostgreSQL and MySQL through feature flags)
//! and an in-memory implementation for tests and database-less
//! deployments.

pub mod client;
pub mod memory;
pub mod sql;

pub use client::DbClient;
pub use memory::InMemoryReservationStore;
pub use sql::SqlReservationStore;
