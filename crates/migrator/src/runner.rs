//! Sequencing of sub-migrations and the continue-on-error policy.

use crate::MigrationContext;
use crate::config::MigrationConfig;
use crate::error::{MigrationError, RunError};
use crate::migrators::{MigrationStep, default_steps};

/// Run-wide flags, fixed when the runner is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunPolicy {
    pub continue_on_error: bool,
    pub dry_run: bool,
}

impl From<&MigrationConfig> for RunPolicy {
    fn from(config: &MigrationConfig) -> Self {
        Self {
            continue_on_error: config.continue_on_error,
            dry_run: config.dry_run,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    /// Executing the named step.
    Running(&'static str),
    Done,
}

#[derive(Debug)]
pub enum StepStatus {
    Succeeded,
    /// Failed and tolerated under continue-on-error.
    Failed(MigrationError),
    /// Not executed because the run was a dry run.
    DryRun,
}

#[derive(Debug)]
pub struct StepOutcome {
    pub step: &'static str,
    pub status: StepStatus,
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, StepStatus::Failed(_))
    }
}

/// Outcomes of a run that was not aborted, in step order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<StepOutcome>,
}

impl RunReport {
    pub fn failed_steps(&self) -> Vec<&'static str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_failure())
            .map(|o| o.step)
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(|o| !o.is_failure())
    }
}

/// Runs the sub-migrations in order.
pub struct MigrationRunner {
    steps: Vec<Box<dyn MigrationStep>>,
    policy: RunPolicy,
    state: RunState,
}

impl MigrationRunner {
    /// Runner over the consumer app and scope migrations.
    pub fn new(policy: RunPolicy) -> Self {
        Self::with_steps(policy, default_steps())
    }

    pub fn with_steps(policy: RunPolicy, steps: Vec<Box<dyn MigrationStep>>) -> Self {
        Self {
            steps,
            policy,
            state: RunState::NotStarted,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute every step. A failing step either aborts the run (strict) or
    /// is logged and recorded in the report (continue-on-error). Steps that
    /// already committed are never rolled back.
    #[tracing::instrument(skip_all, fields(continue_on_error = self.policy.continue_on_error, dry_run = self.policy.dry_run))]
    pub async fn run(&mut self, ctx: &MigrationContext) -> Result<RunReport, RunError> {
        let mut report = RunReport::default();

        for step in &self.steps {
            self.state = RunState::Running(step.name());

            if self.policy.dry_run {
                step.dry_run();
                report.outcomes.push(StepOutcome {
                    step: step.name(),
                    status: StepStatus::DryRun,
                });
                continue;
            }

            let status = match step.migrate(ctx).await {
                Ok(()) => StepStatus::Succeeded,
                Err(source) if self.policy.continue_on_error => {
                    tracing::error!(
                        target: "migration",
                        step = step.name(),
                        error = %source,
                        "{}",
                        step.failure_message()
                    );
                    StepStatus::Failed(source)
                }
                Err(source) => {
                    return Err(RunError::StepFailed {
                        step: step.name(),
                        message: step.failure_message().to_string(),
                        source,
                    });
                }
            };
            report.outcomes.push(StepOutcome {
                step: step.name(),
                status,
            });
        }

        self.state = RunState::Done;
        Ok(report)
    }
}
