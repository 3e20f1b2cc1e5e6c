use serde::{Deserialize, Serialize};

use crate::status::Verdict;

/// Reserved id of the sample group: graded for visibility, never scored.
pub const SAMPLE_ID: i32 = 0;

/// Reserved id of the implicit "main" subtask, used when no subtasks are declared.
pub const MAIN_ID: i32 = -1;

/// Sentinel points awarded to the main subtask; not surfaced as a real score.
pub const MAIN_POINTS: f64 = 0.;

/// A single declared test case.
///
/// `subtasks` is kept sorted and deduplicated: a small label set as a plain
/// sorted vector rather than a hash set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
  pub name: String,
  pub subtasks: Vec<i32>,
  pub sample: bool,
}

impl TestCase {
  pub fn new(name: impl Into<String>, subtasks: Vec<i32>) -> Self {
    let mut subtasks = subtasks;
    subtasks.sort_unstable();
    subtasks.dedup();
    Self {
      name: name.into(),
      subtasks,
      sample: false,
    }
  }

  pub fn sample(name: impl Into<String>, subtasks: Vec<i32>) -> Self {
    Self {
      sample: true,
      ..Self::new(name, subtasks)
    }
  }

  /// Whether this case contributes to the given subtask id, per the
  /// inclusion invariant: a case with label set `L` contributes to every
  /// subtask `s ∈ L`.
  pub fn contributes_to(&self, subtask_id: i32) -> bool {
    self.subtasks.binary_search(&subtask_id).is_ok()
  }
}

/// An ordered group of test cases sharing a group id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestGroup {
  pub id: i32,
  pub cases: Vec<TestCase>,
}

impl TestGroup {
  pub fn new(id: i32, cases: Vec<TestCase>) -> Self {
    Self { id, cases }
  }

  pub fn is_sample(&self) -> bool {
    self.id == SAMPLE_ID
  }
}

/// An ordered sequence of test groups: first the sample group (if present),
/// then the main group or the positive-id subtask groups in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TestSuite {
  pub groups: Vec<TestGroup>,
}

impl TestSuite {
  pub fn new(groups: Vec<TestGroup>) -> Self {
    Self { groups }
  }
}

/// The verdict of a single test case, plus the 1-based ordinal of the case
/// within its group (used to disambiguate multi-case batch reports).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestCaseVerdict {
  pub verdict: Verdict,
  pub test_case_index: usize,
}

impl TestCaseVerdict {
  pub fn new(verdict: Verdict, test_case_index: usize) -> Self {
    Self {
      verdict,
      test_case_index,
    }
  }
}

/// The verdict of a subtask, plus the points actually scored for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubtaskVerdict {
  pub verdict: Verdict,
  pub points: f64,
}

impl SubtaskVerdict {
  pub fn new(verdict: Verdict, points: f64) -> Self {
    Self { verdict, points }
  }
}
