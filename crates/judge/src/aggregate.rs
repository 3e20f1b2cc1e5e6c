use crate::{
  status::{Verdict, VerdictStatus},
  testcase::{SubtaskVerdict, TestCaseVerdict},
};

/// Combines a subtask's contributing `TestCaseVerdict`s into a `SubtaskVerdict`.
pub trait TestCaseAggregator: Send + Sync {
  fn aggregate(&self, verdicts: &[TestCaseVerdict], subtask_points: f64) -> SubtaskVerdict;
}

/// Max-severity aggregation: the subtask scores `subtask_points` iff every
/// contributing case is `AC`, otherwise 0. An empty contributing set is
/// vacuously `AC` (see the open question in the design notes).
pub struct DefaultTestCaseAggregator;

impl TestCaseAggregator for DefaultTestCaseAggregator {
  fn aggregate(&self, verdicts: &[TestCaseVerdict], subtask_points: f64) -> SubtaskVerdict {
    let status =
      VerdictStatus::aggregate_statuses(verdicts.iter().map(|v| v.verdict.status));
    let points = if status == VerdictStatus::Ac {
      subtask_points
    } else {
      0.
    };
    SubtaskVerdict::new(Verdict::new(status, None), points)
  }
}

/// Combines all subtask verdicts into the overall `Verdict`.
pub trait SubtaskAggregator: Send + Sync {
  fn aggregate(&self, subtask_verdicts: &[SubtaskVerdict]) -> Verdict;
}

/// Overall status is max severity across subtasks; overall points is the sum.
pub struct DefaultSubtaskAggregator;

impl SubtaskAggregator for DefaultSubtaskAggregator {
  fn aggregate(&self, subtask_verdicts: &[SubtaskVerdict]) -> Verdict {
    let status =
      VerdictStatus::aggregate_statuses(subtask_verdicts.iter().map(|v| v.verdict.status));
    let points: f64 = subtask_verdicts.iter().map(|v| v.points).sum();
    Verdict::new(status, Some(points))
  }
}
