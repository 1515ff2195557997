//! Artifact resolution and readiness for vsum.
//!
//! The analysis pipeline writes its outputs into the shared store without
//! announcing completion. This crate provides:
//! - Freshest-object resolution per artifact role
//! - An all-or-nothing readiness check and an interval poller on top of it
//! - Lenient decoders for summaries, chapters and transcripts
//! - Assembly of the normalized [`AnalysisResult`](vsum_models::AnalysisResult)

pub mod assembler;
pub mod error;
pub mod parsers;
pub mod poller;
pub mod readiness;
pub mod resolver;

pub use assembler::ResultAssembler;
pub use error::{ArtifactError, ArtifactResult};
pub use parsers::{decode_chapters, decode_summary, decode_transcript, strip_code_fence, ParseOutcome};
pub use poller::{ReadinessPoller, DEFAULT_POLL_INTERVAL};
pub use readiness::{Readiness, ReadinessChecker};
pub use resolver::{select_latest, ArtifactResolver, ResolvedArtifacts};
