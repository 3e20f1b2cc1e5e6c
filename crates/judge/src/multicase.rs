use std::sync::Arc;

use crate::{
  error::GradingError,
  filenames,
  options::GradingOptions,
  process::{ProcessRunner, RunOutcome},
  status::{Verdict, VerdictStatus},
  testcase::{TestCase, TestCaseVerdict, SAMPLE_ID},
};

/// Marker line a multi-case solution is expected to print before it starts
/// writing a member case's output, `CASE <n>` with `n` the 1-based ordinal
/// within the group. The protocol for demultiplexing a batched run back into
/// a single fault index (see DESIGN.md).
const CASE_MARKER_PREFIX: &str = "CASE ";

fn split_by_case_markers(output: &str) -> Vec<(usize, String)> {
  let mut segments = Vec::new();
  let mut current: Option<(usize, Vec<&str>)> = None;

  for line in output.lines() {
    if let Some(rest) = line.strip_prefix(CASE_MARKER_PREFIX) {
      if let Ok(n) = rest.trim().parse::<usize>() {
        if let Some((case, lines)) = current.take() {
          segments.push((case, lines.join("\n")));
        }
        current = Some((n, Vec::new()));
        continue;
      }
    }
    if let Some((_, lines)) = current.as_mut() {
      lines.push(line);
    }
  }
  if let Some((case, lines)) = current {
    segments.push((case, lines.join("\n")));
  }
  segments
}

fn tokens_eq(a: &str, b: &str) -> bool {
  a.split_whitespace().eq(b.split_whitespace())
}

/// Union of every member case's subtask labels, sorted and deduplicated —
/// the label set the synthesized batch case inherits.
fn union_subtasks(cases: &[TestCase]) -> Vec<i32> {
  let mut labels: Vec<i32> = cases.iter().flat_map(|c| c.subtasks.iter().copied()).collect();
  labels.sort_unstable();
  labels.dedup();
  labels
}

fn synthesize_case(cases: &[TestCase], slug: &str, group_id: i32) -> TestCase {
  let name = filenames::batched_case_name(slug, group_id);
  let labels = union_subtasks(cases);
  if group_id == SAMPLE_ID {
    TestCase::sample(name, labels)
  } else {
    TestCase::new(name, labels)
  }
}

/// Adapts a whole test group into a single execution and reduces it to a
/// single synthesized `TestCase` (carrying the union of its members' subtask
/// labels) with its own `TestCaseVerdict`.
pub struct MulticaseGrader {
  pub runner: Arc<dyn ProcessRunner>,
}

impl MulticaseGrader {
  pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
    Self { runner }
  }

  pub async fn run_group(
    &self,
    cases: &[TestCase],
    group_id: i32,
    options: &GradingOptions,
  ) -> Result<Option<(TestCase, TestCaseVerdict)>, GradingError> {
    if cases.is_empty() {
      return Ok(None);
    }

    let synthesized = synthesize_case(cases, &options.slug, group_id);

    let input_path =
      filenames::input_path_batched(options.effective_input_dir(), &options.slug, group_id);
    let expected_path =
      filenames::reference_output_path_batched(&options.output_dir, &options.slug, group_id);

    let input = std::fs::read(&input_path).map_err(|_| GradingError::MissingReferenceOutput {
      case_name: synthesized.name.clone(),
      path: input_path.display().to_string(),
    })?;
    let expected = std::fs::read(&expected_path).map_err(|_| GradingError::MissingReferenceOutput {
      case_name: synthesized.name.clone(),
      path: expected_path.display().to_string(),
    })?;
    let expected = String::from_utf8_lossy(&expected).into_owned();
    let expected_segments = split_by_case_markers(&expected);

    let outcome = self
      .runner
      .run(
        &options.solution_command,
        &input,
        options.time_limit,
        options.memory_limit,
      )
      .await?;

    let (fault_index, status) = match &outcome {
      RunOutcome::Completed { stdout } => {
        let actual = String::from_utf8_lossy(stdout).into_owned();
        let actual_segments = split_by_case_markers(&actual);
        let mismatch = (1..=cases.len()).find(|&i| {
          let expected_seg = expected_segments.iter().find(|(n, _)| *n == i).map(|(_, s)| s.as_str());
          let actual_seg = actual_segments.iter().find(|(n, _)| *n == i).map(|(_, s)| s.as_str());
          match (expected_seg, actual_seg) {
            (Some(e), Some(a)) => !tokens_eq(e, a),
            (None, None) => false,
            _ => true,
          }
        });
        match mismatch {
          Some(i) => (i, VerdictStatus::Wa),
          None => (1, VerdictStatus::Ac),
        }
      }
      // The runner does not surface partial stdout on a killed/crashed
      // child, so which member was in flight cannot be recovered; the
      // whole batch is attributed to the first case.
      RunOutcome::RuntimeError => (1, VerdictStatus::Rte),
      RunOutcome::TimeLimitExceeded => (1, VerdictStatus::Tle),
    };

    let verdict = TestCaseVerdict::new(Verdict::new(status, None), fault_index);
    Ok(Some((synthesized, verdict)))
  }
}
