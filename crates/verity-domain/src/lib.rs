//! Verity Domain Layer
//!
//! This crate contains the domain model for Verity: the records produced by the
//! claim-research pipeline and the trait seams the pipeline talks through.
//! It carries no I/O; infrastructure lives in other crates.
//!
//! ## Key Concepts
//!
//! - **Influencer**: a researched public figure with aggregate verification statistics
//! - **Claim**: a single assertion attributed to an influencer, with a trust score
//! - **Trust score**: 0-100 confidence value; 70 and above counts as verified
//! - **Verification stats**: verified/debunked tallies derived from validated claims
//!
//! ## Architecture
//!
//! - Pure data and derivations only
//! - Records are built in memory and handed to a [`traits::DocumentStore`],
//!   which assigns a [`RecordId`]
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod id;
pub mod influencer;
pub mod stats;
pub mod traits;
pub mod trust_score;

// Re-exports for convenience
pub use claim::Claim;
pub use id::RecordId;
pub use influencer::{normalize_handle, Influencer};
pub use stats::{aggregate, VerificationStats};
pub use traits::{Collection, Document, DocumentStore, ResearchProvider};
pub use trust_score::{TrustScore, TrustScoreError, VERIFICATION_THRESHOLD};
