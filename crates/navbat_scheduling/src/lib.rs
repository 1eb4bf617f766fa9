// --- File: crates/navbat_scheduling/src/lib.rs ---
// Declare modules within this crate
pub mod doc;
pub mod guard;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
#[cfg(test)]
mod logic_test;
pub mod policy;
pub mod routes;
pub mod timeline;
