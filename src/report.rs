use std::fmt;

use crate::evaluator::{Evaluation, Outcome};
use crate::version::{EmojiVersion, Estimate};

/// Text summary of one run.
#[derive(Clone, Debug, new)]
pub struct Report<'a> {
    evaluation: &'a Evaluation,
    estimate: Estimate,
    /// what the corpus itself describes
    latest: Option<EmojiVersion>,
}

impl<'a> Report<'a> {
    /// `≈  Emoji 14.0 / 15.1`
    pub fn version_line(&self) -> String {
        match self.latest {
            Some(latest) => format!("≈  Emoji {} / {}", self.estimate, latest),
            None => format!("≈  Emoji {}", self.estimate),
        }
    }
}

impl<'a> fmt::Display for Report<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.evaluation.state())?;
        if self.evaluation.outcome() == Outcome::Cancelled {
            f.write_str(" (cancelled)")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.version_line())?;

        if !self.evaluation.groups().is_empty() {
            writeln!(f)?;
            for (group, state) in self.evaluation.groups() {
                writeln!(f, "  {:<24} {}", group, state)?;
            }
        }
        if !self.evaluation.versions().is_empty() {
            writeln!(f)?;
            for (version, state) in self.evaluation.versions() {
                writeln!(f, "  E{:<23} {}", version.to_string(), state)?;
            }
        }
        Ok(())
    }
}
