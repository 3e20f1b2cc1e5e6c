pub mod args;
pub mod config;

use std::{error::Error, process::ExitCode, sync::Arc};

use tcgrade_judge::{
  Comparator, DefaultSubtaskAggregator, DefaultTestCaseAggregator, DefaultTestCaseGrader,
  ExactComparator, FileSpecClient, Grader, LocalProcessRunner, LogLogger, MulticaseGrader,
  ProcessRunner, VerdictStatus,
};

use crate::{args::ARGS, config::OPTIONS};

#[macro_use]
extern crate lazy_static;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
  pretty_env_logger::init();

  let _ = &*ARGS;
  let options = &*OPTIONS;

  let runner: Arc<dyn ProcessRunner> = Arc::new(LocalProcessRunner);
  let comparator: Arc<dyn Comparator> = Arc::new(ExactComparator);

  let mut grader = Grader::new(
    Arc::new(FileSpecClient::new(&ARGS.suite)),
    Arc::new(DefaultTestCaseGrader::new(runner.clone(), comparator)),
    Arc::new(MulticaseGrader::new(runner)),
    Arc::new(DefaultTestCaseAggregator),
    Arc::new(DefaultSubtaskAggregator),
    LogLogger,
  );

  let result = grader.grade(options).await?;

  Ok(if result.overall.status == VerdictStatus::Ac {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  })
}
