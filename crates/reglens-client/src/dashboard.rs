//! Dashboard state: the last loaded snapshot of each backend resource.
//!
//! Every refresh takes a ticket from its [`SnapshotCell`] before the request
//! goes out. Responses for superseded tickets are dropped, and failures keep
//! the previous snapshot on screen.
//!
//! The task board lives alongside the analyses it was built from. Each
//! committed analyses refresh reloads it, discarding local moves.

use std::future::Future;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use reglens_core::{
    BoardTask, CoreError, DashboardStats, GapAnalysis, OrganizedGroup, OrganizedSummary,
    ProcessResponse, Requirement, RequirementCluster, SnapshotCell, StatusSummary, TaskBoard,
    TaskStatus, flatten_groups,
};
use tracing::{info, warn};

use crate::http::{ApiClient, ApiError};

pub struct Dashboard {
    client: ApiClient,
    groups: SnapshotCell<Vec<OrganizedGroup>>,
    clusters: SnapshotCell<Vec<RequirementCluster>>,
    analyses: SnapshotCell<Vec<GapAnalysis>>,
    board: Mutex<TaskBoard>,
}

impl Dashboard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            groups: SnapshotCell::new("organized_requirements"),
            clusters: SnapshotCell::new("requirement_clusters"),
            analyses: SnapshotCell::new("gap_analyses"),
            board: Mutex::new(TaskBoard::default()),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Returns `true` if the fetched groups were committed.
    pub async fn refresh_groups(&self) -> bool {
        refresh(&self.groups, self.client.organized_requirements()).await
    }

    pub async fn refresh_clusters(&self) -> bool {
        refresh(&self.clusters, self.client.requirement_clusters()).await
    }

    /// On commit the task board is reloaded from the new analyses.
    pub async fn refresh_analyses(&self) -> bool {
        let committed = refresh(&self.analyses, self.client.gap_analyses()).await;
        if committed {
            let tasks = BoardTask::from_analyses(&self.analyses());
            self.board().reload(tasks);
        }
        committed
    }

    /// Refresh all three resources concurrently.
    pub async fn refresh_all(&self) {
        let (groups, clusters, analyses) = futures::join!(
            self.refresh_groups(),
            self.refresh_clusters(),
            self.refresh_analyses()
        );
        info!(groups, clusters, analyses, "dashboard refresh finished");
    }

    /// Upload a document. On success its organized groups become the newest
    /// groups snapshot, superseding any refresh still in flight.
    pub async fn upload(&self, path: &Path) -> Result<ProcessResponse, ApiError> {
        let ticket = self.groups.begin();
        match self.client.process_file(path).await {
            Ok(resp) => {
                self.groups.commit(ticket, resp.organized_requirements.clone());
                Ok(resp)
            }
            Err(e) => {
                warn!(error = %e, "upload failed");
                self.groups.fail(ticket, e.to_string());
                Err(e)
            }
        }
    }

    pub fn groups(&self) -> Vec<OrganizedGroup> {
        self.groups.value_or_default()
    }

    pub fn clusters(&self) -> Vec<RequirementCluster> {
        self.clusters.value_or_default()
    }

    pub fn analyses(&self) -> Vec<GapAnalysis> {
        self.analyses.value_or_default()
    }

    /// Flat requirement list of the current groups snapshot.
    pub fn requirements(&self) -> Vec<Requirement> {
        flatten_groups(&self.groups())
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::compute(&self.analyses(), &self.requirements())
    }

    pub fn status_summary(&self) -> StatusSummary {
        StatusSummary::from_analyses(&self.analyses())
    }

    pub fn organized_summary(&self) -> OrganizedSummary {
        OrganizedSummary::from_groups(&self.groups())
    }

    /// Copy of the task board, local moves included.
    pub fn task_board(&self) -> TaskBoard {
        self.board().clone()
    }

    /// Move a card on the held board. Kept until the next analyses reload.
    pub fn move_task(&self, id: &str, to: TaskStatus) -> Result<TaskStatus, CoreError> {
        self.board().move_task(id, to)
    }

    /// Errors from the newest fetch of each resource, by resource name.
    pub fn errors(&self) -> Vec<(&'static str, String)> {
        [
            (self.groups.name(), self.groups.error()),
            (self.clusters.name(), self.clusters.error()),
            (self.analyses.name(), self.analyses.error()),
        ]
        .into_iter()
        .filter_map(|(name, err)| err.map(|e| (name, e)))
        .collect()
    }

    fn board(&self) -> MutexGuard<'_, TaskBoard> {
        self.board.lock().unwrap_or_else(|e| e.into_inner())
    }
}

async fn refresh<T, F>(cell: &SnapshotCell<T>, fetch: F) -> bool
where
    T: Clone,
    F: Future<Output = Result<T, ApiError>>,
{
    let ticket = cell.begin();
    match fetch.await {
        Ok(value) => cell.commit(ticket, value),
        Err(e) => {
            warn!(
                cell = cell.name(),
                error = %e,
                "fetch failed; keeping last snapshot"
            );
            cell.fail(ticket, e.to_string());
            false
        }
    }
}
