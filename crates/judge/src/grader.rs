use std::sync::Arc;

use async_trait::async_trait;

use crate::{
  comparator::Comparator,
  error::GradingError,
  filenames,
  options::GradingOptions,
  process::{ProcessRunner, RunOutcome},
  status::{Verdict, VerdictStatus},
  testcase::TestCase,
};

/// Runs a single test case: invoke solution, capture output, invoke
/// comparator, produce a verdict. `group_id` and `case_index`
/// identify the case's position for the filename scheme and for the
/// returned `test_case_index`.
#[async_trait]
pub trait TestCaseGrader: Send + Sync {
  async fn grade(
    &self,
    case: &TestCase,
    group_id: i32,
    case_index: usize,
    options: &GradingOptions,
  ) -> Result<Verdict, GradingError>;
}

/// The concrete grader: spawns `options.solution_command` through a
/// `ProcessRunner` and classifies the result with a `Comparator`.
pub struct DefaultTestCaseGrader {
  pub runner: Arc<dyn ProcessRunner>,
  pub comparator: Arc<dyn Comparator>,
}

impl DefaultTestCaseGrader {
  pub fn new(runner: Arc<dyn ProcessRunner>, comparator: Arc<dyn Comparator>) -> Self {
    Self { runner, comparator }
  }
}

#[async_trait]
impl TestCaseGrader for DefaultTestCaseGrader {
  async fn grade(
    &self,
    case: &TestCase,
    group_id: i32,
    case_index: usize,
    options: &GradingOptions,
  ) -> Result<Verdict, GradingError> {
    let input_path = filenames::input_path(
      options.effective_input_dir(),
      &options.slug,
      group_id,
      case_index,
    );
    let input = std::fs::read(&input_path).map_err(|_| GradingError::MissingReferenceOutput {
      case_name: case.name.clone(),
      path: input_path.display().to_string(),
    })?;

    let outcome = self
      .runner
      .run(
        &options.solution_command,
        &input,
        options.time_limit,
        options.memory_limit,
      )
      .await?;

    let status = match outcome {
      RunOutcome::RuntimeError => VerdictStatus::Rte,
      RunOutcome::TimeLimitExceeded => VerdictStatus::Tle,
      RunOutcome::Completed { stdout } => {
        let expected_path =
          filenames::reference_output_path(&options.output_dir, &options.slug, group_id, case_index);
        self.comparator.compare(&expected_path, &stdout).await?
      }
    };

    Ok(Verdict::new(status, None))
  }
}
