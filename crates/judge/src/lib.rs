#[cfg(test)]
mod testsupport;

pub mod aggregate;
pub mod comparator;
pub mod error;
pub mod filenames;
pub mod grader;
pub mod logger;
pub mod multicase;
pub mod options;
pub mod orchestrator;
pub mod process;
pub mod spec_client;
pub mod status;
pub mod testcase;

pub use crate::{
  aggregate::{DefaultSubtaskAggregator, DefaultTestCaseAggregator, SubtaskAggregator, TestCaseAggregator},
  comparator::{Comparator, ExactComparator},
  error::GradingError,
  grader::{DefaultTestCaseGrader, TestCaseGrader},
  logger::{GraderLogger, LogLogger, RecordingLogger},
  multicase::MulticaseGrader,
  options::{GradingOptions, GradingOptionsBuilder},
  orchestrator::{Grader, GraderResult},
  process::{LocalProcessRunner, ProcessRunner},
  spec_client::{FileSpecClient, InMemorySpecClient, SpecClient, SuiteDescriptor},
  status::{Verdict, VerdictStatus},
  testcase::{SubtaskVerdict, TestCase, TestCaseVerdict, TestGroup, TestSuite, MAIN_ID, MAIN_POINTS, SAMPLE_ID},
};
