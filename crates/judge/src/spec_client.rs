use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
  error::GradingError,
  testcase::{TestCase, TestGroup, TestSuite},
};

/// Thin on-disk shape a problem author writes by hand; not the full
/// authoring DSL a full problem-package format would provide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteDescriptor {
  pub groups: Vec<GroupDescriptor>,
  #[serde(default)]
  pub multiple_test_cases: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDescriptor {
  pub id: i32,
  pub cases: Vec<CaseDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDescriptor {
  pub name: String,
  #[serde(default)]
  pub subtasks: Vec<i32>,
}

impl SuiteDescriptor {
  pub fn into_test_suite(self) -> TestSuite {
    let groups = self
      .groups
      .into_iter()
      .map(|g| {
        let is_sample = g.id == crate::testcase::SAMPLE_ID;
        let cases = g
          .cases
          .into_iter()
          .map(|c| {
            if is_sample {
              TestCase::sample(c.name, c.subtasks)
            } else {
              TestCase::new(c.name, c.subtasks)
            }
          })
          .collect();
        TestGroup::new(g.id, cases)
      })
      .collect();
    TestSuite::new(groups)
  }
}

/// Collaborator that produces the `TestSuite` and the multi-case flag for a
/// grading run. Consumed, not owned: the authoring DSL that produces
/// the underlying data is out of scope.
#[async_trait]
pub trait SpecClient: Send + Sync {
  async fn get_test_suite(&self) -> Result<TestSuite, GradingError>;
  async fn has_multiple_test_cases(&self) -> Result<bool, GradingError>;
}

/// Reads a `SuiteDescriptor` from disk, picking the format by extension
/// (`.yaml`/`.yml` via `serde_yaml`, anything else via `serde_json`).
pub struct FileSpecClient {
  path: std::path::PathBuf,
}

impl FileSpecClient {
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
    }
  }

  fn load(&self) -> Result<SuiteDescriptor, GradingError> {
    let contents = std::fs::read_to_string(&self.path)?;
    let is_yaml = matches!(
      self.path.extension().and_then(|e| e.to_str()),
      Some("yaml") | Some("yml")
    );
    if is_yaml {
      serde_yaml::from_str(&contents).map_err(|e| GradingError::Spec(e.to_string()))
    } else {
      serde_json::from_str(&contents).map_err(|e| GradingError::Spec(e.to_string()))
    }
  }
}

#[async_trait]
impl SpecClient for FileSpecClient {
  async fn get_test_suite(&self) -> Result<TestSuite, GradingError> {
    Ok(self.load()?.into_test_suite())
  }

  async fn has_multiple_test_cases(&self) -> Result<bool, GradingError> {
    Ok(self.load()?.multiple_test_cases)
  }
}

/// Fixed-value client for tests: a plain struct standing in for a mock.
pub struct InMemorySpecClient {
  pub suite: TestSuite,
  pub multiple_test_cases: bool,
}

impl InMemorySpecClient {
  pub fn new(suite: TestSuite, multiple_test_cases: bool) -> Self {
    Self {
      suite,
      multiple_test_cases,
    }
  }
}

#[async_trait]
impl SpecClient for InMemorySpecClient {
  async fn get_test_suite(&self) -> Result<TestSuite, GradingError> {
    Ok(self.suite.clone())
  }

  async fn has_multiple_test_cases(&self) -> Result<bool, GradingError> {
    Ok(self.multiple_test_cases)
  }
}
