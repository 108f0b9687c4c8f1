use async_trait::async_trait;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{IntakeError, Result};
use crate::models::{Case, CaseStatus};

/// Name of the sled tree holding cases
const CASES_TREE: &str = "cases";

/// Storage of processed cases and their workflow state
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// Store a new case; fails with `DuplicateCase` if the id is taken
    async fn insert(&self, case: Case) -> Result<()>;

    /// Fetch a case by id
    async fn get(&self, intake_id: &str) -> Result<Case>;

    /// All cases, oldest first
    async fn list(&self) -> Result<Vec<Case>>;

    /// Set the workflow status and return the updated case
    async fn update_status(&self, intake_id: &str, status: CaseStatus) -> Result<Case>;

    /// Record an assignee and move the case to `assigned`
    async fn assign(&self, intake_id: &str, assignee: &str) -> Result<Case>;

    /// Move the case to `resolved`
    async fn resolve(&self, intake_id: &str) -> Result<Case> {
        self.update_status(intake_id, CaseStatus::Resolved).await
    }
}

fn apply_assignment(case: &mut Case, assignee: &str) {
    case.assigned_to = Some(assignee.to_string());
    case.status = CaseStatus::Assigned;
}

/// Process-local store, kept in insertion order
#[derive(Debug, Default)]
pub struct InMemoryCaseStore {
    cases: RwLock<Vec<Case>>,
}

impl InMemoryCaseStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify(&self, intake_id: &str, apply: impl FnOnce(&mut Case) + Send) -> Result<Case> {
        let mut cases = self.cases.write().await;
        let case = cases
            .iter_mut()
            .find(|case| case.intake_id == intake_id)
            .ok_or_else(|| IntakeError::CaseNotFound(intake_id.to_string()))?;
        apply(case);
        Ok(case.clone())
    }
}

#[async_trait]
impl CaseRepository for InMemoryCaseStore {
    async fn insert(&self, case: Case) -> Result<()> {
        let mut cases = self.cases.write().await;
        if cases.iter().any(|existing| existing.intake_id == case.intake_id) {
            return Err(IntakeError::DuplicateCase(case.intake_id));
        }
        cases.push(case);
        Ok(())
    }

    async fn get(&self, intake_id: &str) -> Result<Case> {
        self.cases
            .read()
            .await
            .iter()
            .find(|case| case.intake_id == intake_id)
            .cloned()
            .ok_or_else(|| IntakeError::CaseNotFound(intake_id.to_string()))
    }

    async fn list(&self) -> Result<Vec<Case>> {
        Ok(self.cases.read().await.clone())
    }

    async fn update_status(&self, intake_id: &str, status: CaseStatus) -> Result<Case> {
        self.modify(intake_id, |case| case.status = status).await
    }

    async fn assign(&self, intake_id: &str, assignee: &str) -> Result<Case> {
        self.modify(intake_id, |case| apply_assignment(case, assignee))
            .await
    }
}

/// Persistent store on an embedded sled database.
///
/// Cases are keyed by intake id and encoded with bincode.
pub struct SledCaseStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledCaseStore {
    /// Open (or create) the database directory at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path.as_ref())?;
        let tree = db.open_tree(CASES_TREE)?;
        debug!(path = %path.as_ref().display(), cases = tree.len(), "Opened case store");
        Ok(Self { db, tree })
    }

    /// Temporary database removed on drop, for tests and dry runs
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        let tree = db.open_tree(CASES_TREE)?;
        Ok(Self { db, tree })
    }

    fn decode(bytes: &[u8]) -> Result<Case> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Atomic read-modify-write: the new value only lands if the stored
    /// bytes are still the ones `apply` saw, otherwise it re-reads and retries.
    async fn modify(&self, intake_id: &str, apply: impl Fn(&mut Case) + Send) -> Result<Case> {
        let key = intake_id.as_bytes();
        loop {
            let current = self
                .tree
                .get(key)?
                .ok_or_else(|| IntakeError::CaseNotFound(intake_id.to_string()))?;
            let mut case = Self::decode(&current)?;
            apply(&mut case);
            let encoded = bincode::serialize(&case)?;

            match self
                .tree
                .compare_and_swap(key, Some(current.as_ref()), Some(encoded))?
            {
                Ok(()) => {
                    self.db.flush_async().await?;
                    return Ok(case);
                }
                Err(_) => debug!(intake_id, "Concurrent case update, retrying"),
            }
        }
    }
}

#[async_trait]
impl CaseRepository for SledCaseStore {
    async fn insert(&self, case: Case) -> Result<()> {
        let encoded = bincode::serialize(&case)?;
        self.tree
            .compare_and_swap(case.intake_id.as_bytes(), None as Option<&[u8]>, Some(encoded))?
            .map_err(|_| IntakeError::DuplicateCase(case.intake_id.clone()))?;
        self.db.flush_async().await?;
        Ok(())
    }

    async fn get(&self, intake_id: &str) -> Result<Case> {
        let bytes = self
            .tree
            .get(intake_id.as_bytes())?
            .ok_or_else(|| IntakeError::CaseNotFound(intake_id.to_string()))?;
        Self::decode(&bytes)
    }

    async fn list(&self) -> Result<Vec<Case>> {
        let mut cases = self
            .tree
            .iter()
            .values()
            .map(|value| Self::decode(&value?))
            .collect::<Result<Vec<_>>>()?;
        // Keys sort by id; list by arrival instead
        cases.sort_by(|a, b| {
            a.consent_timestamp
                .cmp(&b.consent_timestamp)
                .then_with(|| a.intake_id.cmp(&b.intake_id))
        });
        Ok(cases)
    }

    async fn update_status(&self, intake_id: &str, status: CaseStatus) -> Result<Case> {
        self.modify(intake_id, |case| case.status = status).await
    }

    async fn assign(&self, intake_id: &str, assignee: &str) -> Result<Case> {
        self.modify(intake_id, |case| apply_assignment(case, assignee))
            .await
    }
}
