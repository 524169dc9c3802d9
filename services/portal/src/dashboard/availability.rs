//! services/portal/src/dashboard/availability.rs

use super::state::Dashboard;
use futures::future::{join_all, BoxFuture, FutureExt};
use tracing::{error, info};
use tutor_portal_core::availability::{diff, WeeklySchedule};
use tutor_portal_core::ports::PortResult;
use tutor_portal_core::PortalError;

const SAVE_FAILED: &str = "Some changes could not be saved. Please try again.";

impl Dashboard {
    /// The tutor's weekly availability as the sheet currently holds it. A
    /// failed fetch is logged and yields an empty week.
    pub async fn load_availability(&self) -> WeeklySchedule {
        match self.remote.availability.get_availability(&self.profile.id).await {
            Ok(records) => WeeklySchedule::from_records(&records),
            Err(e) => {
                error!("Error fetching availability for {}: {}", self.profile.id, e);
                WeeklySchedule::default()
            }
        }
    }

    /// Validates `current`, sends the difference from `original` as
    /// concurrent deletes, updates and adds, then re-reads the week so every
    /// slot carries its sheet id.
    pub async fn save_availability(
        &mut self,
        original: &WeeklySchedule,
        current: &WeeklySchedule,
    ) -> Result<WeeklySchedule, PortalError> {
        current.validate()?;

        let changes = diff(original, current);
        if changes.is_empty() {
            return Ok(current.clone());
        }
        info!("Saving {} availability changes", changes.len());

        let port = self.remote.availability.as_ref();
        let teacher_id = self.profile.id.as_str();
        let mut writes: Vec<BoxFuture<'_, PortResult<()>>> = Vec::with_capacity(changes.len());
        for id in &changes.deletions {
            writes.push(port.delete_availability(id));
        }
        for update in &changes.updates {
            writes.push(async move { port.update_availability(&update.id, &update.to_remote()).await }.boxed());
        }
        for addition in &changes.additions {
            writes.push(
                async move { port.add_availability(&addition.to_remote(teacher_id)).await.map(|_| ()) }.boxed(),
            );
        }

        let failures: Vec<_> = join_all(writes).await.into_iter().filter_map(Result::err).collect();
        if !failures.is_empty() {
            for e in &failures {
                error!("Availability write failed: {}", e);
            }
            return Err(PortalError::NetworkOrRemoteFailure(SAVE_FAILED.to_string()));
        }

        let saved = self.load_availability().await;
        self.profile.availability = saved.days.clone();
        self.persist();
        Ok(saved)
    }
}
