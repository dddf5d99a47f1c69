//! Core business logic for Grand Livre.
//!
//! This crate contains pure journal logic with ZERO web or database dependencies.
//! Entry types, the catalog, validation rules, reference numbering and
//! auto-completion all live here.
//!
//! # Modules
//!
//! - `journal` - Journal entries, validation, references and auto-completion

pub mod journal;
