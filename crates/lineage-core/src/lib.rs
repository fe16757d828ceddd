//! Lineage Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Lineage genealogy
//! layout engine and its front ends. It includes:
//!
//! - **Identifiers**: Ordered, cheaply clonable person identifiers ([`identifier::PersonId`])
//! - **Persons**: The person record consumed by the engine ([`person::Person`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod person;
