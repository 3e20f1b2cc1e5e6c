use std::cmp;

use serde::{Deserialize, Serialize};
use strum::Display;

/// Severity-ordered result of grading a single test case.
///
/// Variants are declared in increasing severity so the derived [`Ord`]
/// implementation *is* the `max_status` combinator: `Ac` is the identity,
/// `Err` is absorbing.
#[derive(
  Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
  /// Accepted.
  Ac,
  /// Not evaluated, but does not fail the subtask (see multi-case batching).
  Ok,
  /// Wrong answer.
  Wa,
  /// Runtime error (non-zero exit or signal).
  Rte,
  /// Time limit exceeded.
  Tle,
  /// Internal grader malfunction.
  Err,
}

impl VerdictStatus {
  /// Returns the higher-severity of the two statuses.
  pub fn max_status(a: VerdictStatus, b: VerdictStatus) -> VerdictStatus {
    cmp::max(a, b)
  }

  /// Returns `Ac` for an empty sequence, otherwise the maximum severity in it.
  pub fn aggregate_statuses(statuses: impl IntoIterator<Item = VerdictStatus>) -> VerdictStatus {
    statuses.into_iter().fold(VerdictStatus::Ac, Self::max_status)
  }
}

/// A verdict status together with an optional point score.
///
/// Two verdicts are equal iff both their status and their points are equal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
  pub status: VerdictStatus,
  pub points: Option<f64>,
}

impl Verdict {
  pub fn new(status: VerdictStatus, points: Option<f64>) -> Self {
    Self { status, points }
  }

  pub fn ac() -> Self {
    Self::new(VerdictStatus::Ac, None)
  }

  pub fn ok() -> Self {
    Self::new(VerdictStatus::Ok, None)
  }

  pub fn wa() -> Self {
    Self::new(VerdictStatus::Wa, None)
  }

  pub fn rte() -> Self {
    Self::new(VerdictStatus::Rte, None)
  }

  pub fn tle() -> Self {
    Self::new(VerdictStatus::Tle, None)
  }

  pub fn err() -> Self {
    Self::new(VerdictStatus::Err, None)
  }

  pub fn with_points(self, points: f64) -> Self {
    Self {
      points: Some(points),
      ..self
    }
  }
}
