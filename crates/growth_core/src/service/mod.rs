//! Core use-case services.
//!
//! # Responsibility
//! - Combine the stage engine and item store into journal use-cases.
//! - Keep presentation layers free of gating and storage details.

pub mod journal_service;
