//! Input decoding for the gun-violence incident dataset
//!
//! This crate turns the raw, loosely formatted dataset files into typed
//! records. Decoding is tolerant throughout: malformed fragments are dropped
//! and the rest of the input is still used.
//!
//! # Data Flow
//!
//! ```text
//! data.csv ──read_incidents──> Incident ──split_incidents──> RoleTable (victims)
//!                                 │                           RoleTable (suspects)
//!                                 └─ packed fields ── field_map::parse_field_mapping
//!
//! victim_data.csv / suspect_data.csv ──RoleTable::read──> RoleTable
//!                                          └─ list literal ── literal::parse_participant_list
//! ```
//!
//! # Modules
//!
//! - [`field_map`]: `key::value||key::value` field decoding
//! - [`literal`]: safe decoding of participant list literals
//! - [`participant`]: participant, gender and role types
//! - [`dataset`]: per-role participant tables (CSV)
//! - [`incident`]: raw incident rows (CSV) and the split into role tables
//!
//! # Examples
//!
//! ```
//! use gvstat_data::{field_map::parse_field_mapping, literal::participants_from_literal};
//!
//! let genders = parse_field_mapping("0::Male||1::Female");
//! assert_eq!(genders.get("1"), Some("Female"));
//!
//! let participants = participants_from_literal("[{'age': 20, 'gender': 'Male'}]");
//! assert_eq!(participants[0].age, Some(20));
//! ```

pub mod dataset;
pub mod field_map;
pub mod incident;
pub mod literal;
pub mod participant;
