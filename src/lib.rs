//! Extraction Audit - reconciliation of machine-extracted document
//! attributes against human review actions.
//!
//! The engine builds a per-attribute ledger and summary statistics for
//! each reviewed document and persists both to a relational store.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
