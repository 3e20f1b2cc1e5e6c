use std::sync::Arc;

use async_trait::async_trait;

use crate::{
  aggregate::{SubtaskAggregator, TestCaseAggregator},
  error::GradingError,
  grader::TestCaseGrader,
  logger::GraderLogger,
  multicase::MulticaseGrader,
  options::GradingOptions,
  spec_client::SpecClient,
  status::Verdict,
  testcase::{SubtaskVerdict, TestCase, TestCaseVerdict, MAIN_ID, MAIN_POINTS},
};

/// Grades one whole `TestGroup`, hiding whether it ran case-by-case or as
/// a single synthesized batch. The orchestrator picks one
/// implementation for the whole suite, driven by `SpecClient::has_multiple_test_cases`.
/// Returns one `(TestCase, TestCaseVerdict)` pair per contributing case —
/// the original member cases in single-case mode, or the single synthesized
/// union-labeled case in multi-case mode.
#[async_trait]
trait GroupGrader: Send + Sync {
  async fn grade_group(
    &self,
    cases: &[TestCase],
    group_id: i32,
    options: &GradingOptions,
  ) -> Result<Vec<(TestCase, TestCaseVerdict)>, GradingError>;
}

struct SingleCaseGroupGrader {
  grader: Arc<dyn TestCaseGrader>,
}

#[async_trait]
impl GroupGrader for SingleCaseGroupGrader {
  async fn grade_group(
    &self,
    cases: &[TestCase],
    group_id: i32,
    options: &GradingOptions,
  ) -> Result<Vec<(TestCase, TestCaseVerdict)>, GradingError> {
    let mut results = Vec::with_capacity(cases.len());
    for (i, case) in cases.iter().enumerate() {
      let index = i + 1;
      let verdict = self.grader.grade(case, group_id, index, options).await?;
      results.push((case.clone(), TestCaseVerdict::new(verdict, index)));
    }
    Ok(results)
  }
}

#[async_trait]
impl GroupGrader for MulticaseGrader {
  async fn grade_group(
    &self,
    cases: &[TestCase],
    group_id: i32,
    options: &GradingOptions,
  ) -> Result<Vec<(TestCase, TestCaseVerdict)>, GradingError> {
    Ok(self.run_group(cases, group_id, options).await?.into_iter().collect())
  }
}

/// Result of a full grading run: the per-subtask map in ascending subtask
/// id order, plus the overall verdict.
#[derive(Debug, Clone)]
pub struct GraderResult {
  pub per_subtask: Vec<(i32, SubtaskVerdict)>,
  pub overall: Verdict,
}

/// Walks the test suite in group order, drives the per-case and
/// per-subtask aggregation and reports to the logger.
pub struct Grader<L: GraderLogger> {
  spec_client: Arc<dyn SpecClient>,
  single_case_grader: Arc<dyn TestCaseGrader>,
  multicase_grader: Arc<MulticaseGrader>,
  test_case_aggregator: Arc<dyn TestCaseAggregator>,
  subtask_aggregator: Arc<dyn SubtaskAggregator>,
  logger: L,
}

impl<L: GraderLogger> Grader<L> {
  pub fn new(
    spec_client: Arc<dyn SpecClient>,
    single_case_grader: Arc<dyn TestCaseGrader>,
    multicase_grader: Arc<MulticaseGrader>,
    test_case_aggregator: Arc<dyn TestCaseAggregator>,
    subtask_aggregator: Arc<dyn SubtaskAggregator>,
    logger: L,
  ) -> Self {
    Self {
      spec_client,
      single_case_grader,
      multicase_grader,
      test_case_aggregator,
      subtask_aggregator,
      logger,
    }
  }

  pub async fn grade(&mut self, options: &GradingOptions) -> Result<GraderResult, GradingError> {
    let suite = self.spec_client.get_test_suite().await?;
    let multicase = self.spec_client.has_multiple_test_cases().await?;

    self.logger.introduction(&options.solution_command);

    let group_grader: Arc<dyn GroupGrader> = if multicase {
      self.multicase_grader.clone()
    } else {
      Arc::new(SingleCaseGroupGrader {
        grader: self.single_case_grader.clone(),
      })
    };

    // (case, owning group id, verdict) for every graded case, in suite order.
    let mut graded: Vec<(TestCase, i32, TestCaseVerdict)> = Vec::new();

    for group in &suite.groups {
      if group.is_sample() && group.cases.is_empty() {
        continue;
      }
      self.logger.test_group_introduction(group.id);
      let results = group_grader
        .grade_group(&group.cases, group.id, options)
        .await?;
      for (case, verdict) in results {
        graded.push((case, group.id, verdict));
      }
    }

    let per_subtask = if options.has_subtasks() {
      self.subtasked_results(&graded, &options.subtask_points)
    } else {
      self.main_result(&graded)
    };

    let subtask_verdicts: Vec<SubtaskVerdict> = per_subtask.iter().map(|(_, v)| *v).collect();
    let overall_subtask_verdict = self.subtask_aggregator.aggregate_to_subtask(&subtask_verdicts);
    let overall = overall_subtask_verdict.verdict;

    self
      .logger
      .result(&per_subtask, overall_subtask_verdict);

    Ok(GraderResult { per_subtask, overall })
  }

  fn main_result(&self, graded: &[(TestCase, i32, TestCaseVerdict)]) -> Vec<(i32, SubtaskVerdict)> {
    let contributing: Vec<TestCaseVerdict> = graded
      .iter()
      .filter(|(_, group_id, _)| *group_id == MAIN_ID)
      .map(|(_, _, v)| *v)
      .collect();
    let verdict = self.test_case_aggregator.aggregate(&contributing, MAIN_POINTS);
    vec![(MAIN_ID, verdict)]
  }

  fn subtasked_results(
    &self,
    graded: &[(TestCase, i32, TestCaseVerdict)],
    subtask_points: &[f64],
  ) -> Vec<(i32, SubtaskVerdict)> {
    subtask_points
      .iter()
      .enumerate()
      .map(|(i, &points)| {
        let subtask_id = (i + 1) as i32;
        let contributing: Vec<TestCaseVerdict> = graded
          .iter()
          .filter(|(case, _, _)| case.contributes_to(subtask_id))
          .map(|(_, _, v)| *v)
          .collect();
        let verdict = self.test_case_aggregator.aggregate(&contributing, points);
        (subtask_id, verdict)
      })
      .collect()
  }
}

trait SubtaskAggregatorExt {
  fn aggregate_to_subtask(&self, subtask_verdicts: &[SubtaskVerdict]) -> SubtaskVerdict;
}

impl<T: SubtaskAggregator + ?Sized> SubtaskAggregatorExt for T {
  fn aggregate_to_subtask(&self, subtask_verdicts: &[SubtaskVerdict]) -> SubtaskVerdict {
    let verdict = self.aggregate(subtask_verdicts);
    let points = verdict.points.unwrap_or(0.);
    SubtaskVerdict::new(verdict, points)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    aggregate::{DefaultSubtaskAggregator, DefaultTestCaseAggregator},
    logger::{LoggedEvent, RecordingLogger},
    process::LocalProcessRunner,
    spec_client::InMemorySpecClient,
    status::VerdictStatus,
    testcase::{TestGroup, TestSuite, SAMPLE_ID},
  };
  use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
  };

  /// Test double standing in for `TestCaseGrader`: returns a preset verdict
  /// per case name (defaulting to AC) and records the call order.
  struct StubTestCaseGrader {
    verdicts: HashMap<String, VerdictStatus>,
    calls: Mutex<Vec<String>>,
  }

  impl StubTestCaseGrader {
    fn new(verdicts: HashMap<String, VerdictStatus>) -> Self {
      Self {
        verdicts,
        calls: Mutex::new(Vec::new()),
      }
    }
  }

  #[async_trait]
  impl TestCaseGrader for StubTestCaseGrader {
    async fn grade(
      &self,
      case: &TestCase,
      _group_id: i32,
      _case_index: usize,
      _options: &GradingOptions,
    ) -> Result<Verdict, GradingError> {
      self.calls.lock().unwrap().push(case.name.clone());
      let status = self
        .verdicts
        .get(&case.name)
        .copied()
        .unwrap_or(VerdictStatus::Ac);
      Ok(Verdict::new(status, None))
    }
  }

  fn noop_multicase_grader() -> Arc<MulticaseGrader> {
    Arc::new(MulticaseGrader::new(Arc::new(LocalProcessRunner)))
  }

  fn build_grader(
    suite: TestSuite,
    multicase: bool,
    stub: Arc<StubTestCaseGrader>,
  ) -> Grader<RecordingLogger> {
    Grader::new(
      Arc::new(InMemorySpecClient::new(suite, multicase)),
      stub,
      noop_multicase_grader(),
      Arc::new(DefaultTestCaseAggregator),
      Arc::new(DefaultSubtaskAggregator),
      RecordingLogger::new(),
    )
  }

  #[tokio::test]
  async fn test_single_subtask_with_samples() {
    crate::testsupport::init_logging();
    let suite = TestSuite::new(vec![
      TestGroup::new(
        SAMPLE_ID,
        vec![TestCase::sample("foo_sample_1", vec![]), TestCase::sample("foo_sample_2", vec![])],
      ),
      TestGroup::new(MAIN_ID, vec![TestCase::new("foo_1", vec![]), TestCase::new("foo_2", vec![])]),
    ]);
    let stub = Arc::new(StubTestCaseGrader::new(HashMap::new()));
    let mut grader = build_grader(suite, false, stub.clone());
    let options = GradingOptions {
      slug: "foo".into(),
      solution_command: "python Sol.py".into(),
      ..Default::default()
    };

    let result = grader.grade(&options).await.unwrap();

    assert_eq!(
      *stub.calls.lock().unwrap(),
      vec!["foo_sample_1", "foo_sample_2", "foo_1", "foo_2"]
    );
    assert_eq!(
      grader.logger.events,
      vec![
        LoggedEvent::Introduction("python Sol.py".to_string()),
        LoggedEvent::TestGroupIntroduction(SAMPLE_ID),
        LoggedEvent::TestGroupIntroduction(MAIN_ID),
        LoggedEvent::Result {
          per_subtask: result.per_subtask.clone(),
          overall: SubtaskVerdict::new(result.overall, MAIN_POINTS),
        },
      ]
    );
    assert_eq!(result.per_subtask, vec![(MAIN_ID, SubtaskVerdict::new(Verdict::ac(), MAIN_POINTS))]);
    assert_eq!(result.overall.status, VerdictStatus::Ac);
  }

  #[tokio::test]
  async fn test_empty_sample_group_is_skipped() {
    let suite = TestSuite::new(vec![
      TestGroup::new(SAMPLE_ID, vec![]),
      TestGroup::new(MAIN_ID, vec![TestCase::new("foo_1", vec![]), TestCase::new("foo_2", vec![])]),
    ]);
    let stub = Arc::new(StubTestCaseGrader::new(HashMap::new()));
    let mut grader = build_grader(suite, false, stub);
    let options = GradingOptions {
      slug: "foo".into(),
      solution_command: "python Sol.py".into(),
      ..Default::default()
    };

    grader.grade(&options).await.unwrap();

    assert_eq!(
      grader.logger.events[1],
      LoggedEvent::TestGroupIntroduction(MAIN_ID)
    );
    assert_eq!(grader.logger.events.len(), 3);
  }

  #[tokio::test]
  async fn test_with_subtasks_aggregates_by_label_inclusion() {
    let suite = TestSuite::new(vec![
      TestGroup::new(
        SAMPLE_ID,
        vec![
          TestCase::sample("stc1", vec![1, 2]),
          TestCase::sample("stc2", vec![2]),
        ],
      ),
      TestGroup::new(1, vec![TestCase::new("tc1", vec![1, 2]), TestCase::new("tc2", vec![1, 2])]),
      TestGroup::new(2, vec![TestCase::new("tc3", vec![2])]),
    ]);
    let mut verdicts = HashMap::new();
    verdicts.insert("tc1".to_string(), VerdictStatus::Wa);
    verdicts.insert("tc3".to_string(), VerdictStatus::Tle);
    let stub = Arc::new(StubTestCaseGrader::new(verdicts));
    let mut grader = build_grader(suite, false, stub);
    let options = GradingOptions {
      slug: "foo".into(),
      solution_command: "python Sol.py".into(),
      subtask_points: vec![40., 50.],
      ..Default::default()
    };

    let result = grader.grade(&options).await.unwrap();

    assert_eq!(result.per_subtask[0].0, 1);
    assert_eq!(result.per_subtask[0].1.verdict.status, VerdictStatus::Wa);
    assert_eq!(result.per_subtask[0].1.points, 0.);

    assert_eq!(result.per_subtask[1].0, 2);
    assert_eq!(result.per_subtask[1].1.verdict.status, VerdictStatus::Tle);
    assert_eq!(result.per_subtask[1].1.points, 0.);

    assert_eq!(result.overall.status, VerdictStatus::Tle);
    assert_eq!(result.overall.points, Some(0.));
  }

  #[tokio::test]
  async fn test_one_failing_subtask_does_not_affect_the_other() {
    let suite = TestSuite::new(vec![TestGroup::new(
      1,
      vec![TestCase::new("tc1", vec![1])],
    ), TestGroup::new(2, vec![TestCase::new("tc2", vec![2])])]);
    let mut verdicts = HashMap::new();
    verdicts.insert("tc1".to_string(), VerdictStatus::Wa);
    let stub = Arc::new(StubTestCaseGrader::new(verdicts));
    let mut grader = build_grader(suite, false, stub);
    let options = GradingOptions {
      slug: "foo".into(),
      solution_command: "python Sol.py".into(),
      subtask_points: vec![40., 50.],
      ..Default::default()
    };

    let result = grader.grade(&options).await.unwrap();

    assert_eq!(result.per_subtask[0].1.points, 0.);
    assert_eq!(result.per_subtask[1].1.points, 50.);
    assert_eq!(result.overall.status, VerdictStatus::Wa);
    assert_eq!(result.overall.points, Some(50.));
  }

  #[tokio::test]
  async fn test_multicase_mode_synthesizes_one_case_per_group() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("foo_sample.in"), "CASE 1\n1\n").unwrap();
    std::fs::write(dir.path().join("foo_sample.out"), "CASE 1\n1\n").unwrap();
    std::fs::write(dir.path().join("foo.in"), "CASE 1\n1\nCASE 2\n2\n").unwrap();
    std::fs::write(dir.path().join("foo.out"), "CASE 1\n1\nCASE 2\n2\n").unwrap();

    let suite = TestSuite::new(vec![
      TestGroup::new(SAMPLE_ID, vec![TestCase::sample("foo_sample_1", vec![])]),
      TestGroup::new(MAIN_ID, vec![TestCase::new("foo_1", vec![]), TestCase::new("foo_2", vec![])]),
    ]);
    let spec_client = Arc::new(InMemorySpecClient::new(suite, true));
    let multicase_grader = Arc::new(MulticaseGrader::new(Arc::new(LocalProcessRunner)));
    let stub = Arc::new(StubTestCaseGrader::new(HashMap::new()));
    let mut grader = Grader::new(
      spec_client,
      stub.clone(),
      multicase_grader,
      Arc::new(DefaultTestCaseAggregator),
      Arc::new(DefaultSubtaskAggregator),
      RecordingLogger::new(),
    );
    let options = GradingOptions {
      slug: "foo".into(),
      solution_command: "cat".into(),
      output_dir: dir.path().to_str().unwrap().to_string(),
      time_limit: Duration::from_secs(2),
      ..Default::default()
    };

    let result = grader.grade(&options).await.unwrap();

    // In multi-case mode the single-case `TestCaseGrader` is never called.
    assert!(stub.calls.lock().unwrap().is_empty());
    assert_eq!(result.overall.status, VerdictStatus::Ac);
  }

  #[tokio::test]
  async fn test_with_subtasks_multicase_synthesizes_one_union_labeled_case_per_group() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("foo_sample.in"), "CASE 1\n1\nCASE 2\n2\n").unwrap();
    std::fs::write(dir.path().join("foo_sample.out"), "CASE 1\n1\nCASE 2\n2\n").unwrap();
    std::fs::write(dir.path().join("foo_1.in"), "CASE 1\n1\nCASE 2\n2\n").unwrap();
    std::fs::write(dir.path().join("foo_1.out"), "CASE 1\n1\nCASE 2\n2\n").unwrap();
    std::fs::write(dir.path().join("foo_2.in"), "CASE 1\n1\n").unwrap();
    std::fs::write(dir.path().join("foo_2.out"), "CASE 1\n1\n").unwrap();

    let suite = TestSuite::new(vec![
      TestGroup::new(
        SAMPLE_ID,
        vec![TestCase::sample("stc1", vec![1, 2]), TestCase::sample("stc2", vec![2])],
      ),
      TestGroup::new(1, vec![TestCase::new("tc1", vec![1, 2]), TestCase::new("tc2", vec![1, 2])]),
      TestGroup::new(2, vec![TestCase::new("tc3", vec![2])]),
    ]);
    let spec_client = Arc::new(InMemorySpecClient::new(suite, true));
    let multicase_grader = Arc::new(MulticaseGrader::new(Arc::new(LocalProcessRunner)));
    let stub = Arc::new(StubTestCaseGrader::new(HashMap::new()));
    let mut grader = Grader::new(
      spec_client,
      stub.clone(),
      multicase_grader,
      Arc::new(DefaultTestCaseAggregator),
      Arc::new(DefaultSubtaskAggregator),
      RecordingLogger::new(),
    );
    let options = GradingOptions {
      slug: "foo".into(),
      solution_command: "cat".into(),
      output_dir: dir.path().to_str().unwrap().to_string(),
      subtask_points: vec![40., 50.],
      time_limit: Duration::from_secs(2),
      ..Default::default()
    };

    let result = grader.grade(&options).await.unwrap();

    assert!(stub.calls.lock().unwrap().is_empty());
    assert_eq!(result.per_subtask[0], (1, SubtaskVerdict::new(Verdict::ac(), 40.)));
    assert_eq!(result.per_subtask[1], (2, SubtaskVerdict::new(Verdict::ac(), 50.)));
    assert_eq!(result.overall.status, VerdictStatus::Ac);
    assert_eq!(result.overall.points, Some(90.));
  }

  #[tokio::test]
  async fn test_multicase_group_with_mixed_labels_failure_affects_every_contributing_subtask() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("foo_1.in"), "CASE 1\n1\nCASE 2\n2\n").unwrap();
    std::fs::write(dir.path().join("foo_1.out"), "CASE 1\n1\nCASE 2\n2\n").unwrap();

    // group 1 has members with *different* labels (tc1 -> subtask 1 only,
    // tc2 -> subtask 2 only); the batch execution fails on tc2's segment, so
    // the single synthesized `foo_1{1,2}` verdict is WA and must pull both
    // subtasks down, not just the one tc2 would individually narrow to.
    let suite = TestSuite::new(vec![TestGroup::new(
      1,
      vec![TestCase::new("tc1", vec![1]), TestCase::new("tc2", vec![2])],
    )]);
    let spec_client = Arc::new(InMemorySpecClient::new(suite, true));
    let multicase_grader = Arc::new(MulticaseGrader::new(Arc::new(LocalProcessRunner)));
    let stub = Arc::new(StubTestCaseGrader::new(HashMap::new()));
    let mut grader = Grader::new(
      spec_client,
      stub.clone(),
      multicase_grader,
      Arc::new(DefaultTestCaseAggregator),
      Arc::new(DefaultSubtaskAggregator),
      RecordingLogger::new(),
    );
    let options = GradingOptions {
      slug: "foo".into(),
      solution_command: "sed 's/^2$/9/'".into(),
      output_dir: dir.path().to_str().unwrap().to_string(),
      subtask_points: vec![40., 50.],
      time_limit: Duration::from_secs(2),
      ..Default::default()
    };

    let result = grader.grade(&options).await.unwrap();

    assert_eq!(result.per_subtask[0], (1, SubtaskVerdict::new(Verdict::wa(), 0.)));
    assert_eq!(result.per_subtask[1], (2, SubtaskVerdict::new(Verdict::wa(), 0.)));
    assert_eq!(result.overall.status, VerdictStatus::Wa);
    assert_eq!(result.overall.points, Some(0.));
  }
}
