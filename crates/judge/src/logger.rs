use crate::testcase::SubtaskVerdict;

/// Push-only sink for grading events, in the exact order the orchestrator
/// emits them. Rendering to a human is somebody else's job; this crate only
/// guarantees the call sequence.
pub trait GraderLogger: Send + Sync {
  fn introduction(&mut self, solution_command: &str);
  fn test_group_introduction(&mut self, group_id: i32);
  fn result(&mut self, per_subtask: &[(i32, SubtaskVerdict)], overall: SubtaskVerdict);
}

/// Forwards events to the `log` facade at `info` level, mirroring the
/// teacher's use of `log::info!` at state transitions.
pub struct LogLogger;

impl GraderLogger for LogLogger {
  fn introduction(&mut self, solution_command: &str) {
    log::info!("grading with solution command {:?}", solution_command);
  }

  fn test_group_introduction(&mut self, group_id: i32) {
    use crate::testcase::{MAIN_ID, SAMPLE_ID};
    let label = match group_id {
      SAMPLE_ID => "SAMPLE TEST CASES".to_string(),
      MAIN_ID => "OFFICIAL TEST CASES".to_string(),
      id => format!("TEST GROUP {}", id),
    };
    log::info!("{}", label);
  }

  fn result(&mut self, per_subtask: &[(i32, SubtaskVerdict)], overall: SubtaskVerdict) {
    for (id, verdict) in per_subtask {
      log::info!(
        "subtask {}: {} ({} points)",
        id,
        verdict.verdict.status,
        verdict.points
      );
    }
    log::info!(
      "overall: {} ({} points)",
      overall.verdict.status,
      overall.points
    );
  }
}

/// Records the exact call sequence for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum LoggedEvent {
  Introduction(String),
  TestGroupIntroduction(i32),
  Result {
    per_subtask: Vec<(i32, SubtaskVerdict)>,
    overall: SubtaskVerdict,
  },
}

#[derive(Debug, Default)]
pub struct RecordingLogger {
  pub events: Vec<LoggedEvent>,
}

impl RecordingLogger {
  pub fn new() -> Self {
    Self::default()
  }
}

impl GraderLogger for RecordingLogger {
  fn introduction(&mut self, solution_command: &str) {
    self
      .events
      .push(LoggedEvent::Introduction(solution_command.to_string()));
  }

  fn test_group_introduction(&mut self, group_id: i32) {
    self.events.push(LoggedEvent::TestGroupIntroduction(group_id));
  }

  fn result(&mut self, per_subtask: &[(i32, SubtaskVerdict)], overall: SubtaskVerdict) {
    self.events.push(LoggedEvent::Result {
      per_subtask: per_subtask.to_vec(),
      overall,
    });
  }
}
