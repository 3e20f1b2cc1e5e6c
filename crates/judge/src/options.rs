use std::time;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};

/// Grading configuration for a single problem.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingOptions {
  /// Problem identifier, used as filename prefix.
  pub slug: String,

  /// Shell command that reads stdin and writes stdout.
  pub solution_command: String,

  /// Directory containing reference outputs.
  pub output_dir: String,

  /// Directory containing case inputs. Empty means "same as `output_dir`",
  /// which is the common convention of keeping `foo_1.in`/`foo_1.out` side
  /// by side.
  pub input_dir: String,

  /// Points per declared subtask, in declaration order. Empty means
  /// single-subtask (main).
  pub subtask_points: Vec<f64>,

  /// CPU time limit per execution.
  #[serde_as(as = "DurationSeconds<u64>")]
  pub time_limit: time::Duration,

  /// Memory limit per execution, in megabytes.
  pub memory_limit: u64,
}

impl Default for GradingOptions {
  fn default() -> Self {
    Self {
      slug: String::new(),
      solution_command: String::new(),
      output_dir: String::new(),
      input_dir: String::new(),
      subtask_points: vec![],
      time_limit: time::Duration::from_secs(1),
      memory_limit: 256,
    }
  }
}

impl GradingOptions {
  /// Effective input directory: `input_dir` if set, else `output_dir`.
  pub fn effective_input_dir(&self) -> &str {
    if self.input_dir.is_empty() {
      &self.output_dir
    } else {
      &self.input_dir
    }
  }

  pub fn has_subtasks(&self) -> bool {
    !self.subtask_points.is_empty()
  }
}

/// Fluent builder for `GradingOptions`, for readable test setup.
pub struct GradingOptionsBuilder {
  options: GradingOptions,
}

impl GradingOptionsBuilder {
  pub fn new(slug: impl Into<String>) -> Self {
    Self {
      options: GradingOptions {
        slug: slug.into(),
        ..GradingOptions::default()
      },
    }
  }

  pub fn from_options(options: GradingOptions) -> Self {
    Self { options }
  }

  pub fn solution_command(mut self, command: impl Into<String>) -> Self {
    self.options.solution_command = command.into();
    self
  }

  pub fn output_dir(mut self, dir: impl Into<String>) -> Self {
    self.options.output_dir = dir.into();
    self
  }

  pub fn input_dir(mut self, dir: impl Into<String>) -> Self {
    self.options.input_dir = dir.into();
    self
  }

  pub fn subtask_points(mut self, points: Vec<f64>) -> Self {
    self.options.subtask_points = points;
    self
  }

  pub fn time_limit(mut self, time_limit: time::Duration) -> Self {
    self.options.time_limit = time_limit;
    self
  }

  pub fn memory_limit(mut self, memory_limit: u64) -> Self {
    self.options.memory_limit = memory_limit;
    self
  }

  pub fn build(self) -> GradingOptions {
    self.options
  }
}
