//! The sub-migrations of a run.

use async_trait::async_trait;

use crate::MigrationContext;
use crate::error::MigrationError;

pub mod consumer_apps;
pub mod scopes;

pub use consumer_apps::ConsumerAppExpiryMigrator;
pub use scopes::ScopeMigrator;

/// Prefix shared by every migration log line.
pub(crate) const MIGRATION_LOG: &str = "OAuth Data Migration Task : ";

/// One independently fault-isolated unit of the run.
#[async_trait]
pub trait MigrationStep: Send + Sync {
    /// Stable identifier, reported in outcomes and errors.
    fn name(&self) -> &'static str;

    /// Message a failure of this step is surfaced with.
    fn failure_message(&self) -> &'static str;

    async fn migrate(&self, ctx: &MigrationContext) -> Result<(), MigrationError>;

    /// Dry runs are not supported; this only says so.
    fn dry_run(&self) {
        tracing::info!(
            target: "migration",
            step = self.name(),
            "Dry run capability not implemented in {} migrator.",
            self.name()
        );
    }
}

/// The steps of a full run, in execution order.
pub fn default_steps() -> Vec<Box<dyn MigrationStep>> {
    vec![
        Box::new(ConsumerAppExpiryMigrator),
        Box::new(ScopeMigrator),
    ]
}
