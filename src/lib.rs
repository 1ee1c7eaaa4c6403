//! How much of the Unicode emoji repertoire can this text stack show?
//!
//! Feed an `emoji-test.txt` [`Corpus`] through a host supplied
//! [`GlyphOracle`] with [`evaluate`], and guess the supported Emoji version
//! from a [`MarkerTable`] with [`estimate`].

#[macro_use]
extern crate derive_new;
#[macro_use]
extern crate derivative;

pub mod corpus;
pub mod error;
pub mod evaluator;
pub mod messager;
pub mod metrics;
pub mod oracle;
pub mod report;
pub mod running_tracker;
pub mod sequence;
pub mod version;

pub use corpus::{Corpus, Qualification, QualificationFilter, TestRecord};
pub use error::{Error, Result};
pub use evaluator::{evaluate, Evaluation, Evaluator, Outcome};
pub use messager::{LatestProgress, Progress, ProgressObserver};
pub use metrics::EvaluationState;
pub use oracle::GlyphOracle;
pub use report::Report;
pub use running_tracker::{RunningTracker, RUNNING_TRACKER};
pub use sequence::Codepoint;
pub use version::{estimate, EmojiVersion, Estimate, MarkerTable, VersionMarker};
