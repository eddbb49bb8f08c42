#![deny(missing_docs)]

//! # controls-core: Foundational Types for the Controls Stack
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies, only `serde`, `chrono`, and
//! `regex` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Every identifier is a
//!    distinct type. You cannot pass an [`EventId`] where a [`FieldId`] is
//!    expected, and control keys are never bare strings.
//!
//! 2. **[`ReferenceNormalizer`] is the sole path from raw author input to
//!    canonical identifiers.** Authors mix structured references with
//!    narrative text and logical expressions; the normalizer extracts what
//!    it can and silently drops the rest. It never errors on data quality.
//!
//! 3. **UTC-only, second-precision [`Timestamp`]s.** The generation time
//!    of a manifest is threaded in as an explicit value, so builds are
//!    pure functions of their inputs and equality tests can hold time
//!    constant.

pub mod identifier;
pub mod normalize;
pub mod temporal;

// Re-export primary types.
pub use identifier::{ControlKey, EventId, FieldId};
pub use normalize::ReferenceNormalizer;
pub use temporal::Timestamp;
