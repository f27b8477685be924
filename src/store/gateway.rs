use tokio::runtime::Runtime;

use crate::config::Config;
use crate::schedule::{Subject, SubjectCollection, SubjectError};

use super::{LocalStore, RemoteApi, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Remote,
    Local,
}

impl Backend {
    pub fn label(&self) -> &'static str {
        match self {
            Backend::Remote => "API",
            Backend::Local => "Local",
        }
    }
}

/// Blocking front for the UI: talks to the API when it answered the
/// health check at connect time, otherwise keeps the local file in sync.
///
/// Every mutation takes the in-memory list and only changes it once the
/// backend accepted the change, so a failed call leaves it untouched.
pub struct Gateway {
    runtime: Runtime,
    remote: Option<RemoteApi>,
    local: LocalStore,
    backend: Backend,
}

impl Gateway {
    pub fn new(remote: Option<RemoteApi>, local: LocalStore) -> Result<Self, StoreError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(StoreError::Runtime)?;
        Ok(Self {
            runtime,
            remote,
            local,
            backend: Backend::Local,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let remote = if config.offline {
            None
        } else {
            Some(RemoteApi::new(config.api_url.clone(), config.request_timeout)?)
        };
        Self::new(remote, LocalStore::new(config.subjects_path()))
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// Pick a backend and load the subject list from it.
    pub fn connect(&mut self) -> Result<SubjectCollection, StoreError> {
        if let Some(remote) = &self.remote {
            tracing::info!(url = remote.base_url(), "checking API health");
            if self.runtime.block_on(remote.health()) {
                match self.runtime.block_on(remote.list()) {
                    Ok(subjects) => {
                        tracing::info!(count = subjects.len(), "loaded subjects from API");
                        self.backend = Backend::Remote;
                        return Ok(SubjectCollection::from(subjects));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "listing subjects failed, using local file");
                    }
                }
            }
        }
        self.backend = Backend::Local;
        self.local.load()
    }

    pub fn create(&self, subjects: &mut SubjectCollection, subject: Subject) -> Result<(), StoreError> {
        if subjects.get(subject.id()).is_some() {
            return Err(SubjectError::DuplicateId(subject.id().to_string()).into());
        }
        if let (Backend::Remote, Some(remote)) = (self.backend, &self.remote) {
            self.runtime.block_on(remote.create(&subject))?;
        }
        tracing::info!(id = subject.id(), name = %subject.name, "created subject");
        self.commit(subjects, |next| Ok(next.add(subject)?))
    }

    /// Create a batch. Subjects the API accepted before a failure are
    /// kept, so the list mirrors what the API holds. Subjects whose id is
    /// already in the list are skipped, which makes retrying a partly
    /// failed batch safe. Returns how many were created.
    pub fn create_many(
        &self,
        subjects: &mut SubjectCollection,
        batch: Vec<Subject>,
    ) -> Result<usize, StoreError> {
        let mut accepted: Vec<Subject> = Vec::with_capacity(batch.len());
        let mut failure = None;

        for subject in batch {
            let id = subject.id();
            if subjects.get(id).is_some() || accepted.iter().any(|s| s.id() == id) {
                tracing::debug!(id, "subject already stored, skipping");
                continue;
            }
            if let (Backend::Remote, Some(remote)) = (self.backend, &self.remote) {
                if let Err(e) = self.runtime.block_on(remote.create(&subject)) {
                    failure = Some(e);
                    break;
                }
            }
            accepted.push(subject);
        }

        let count = accepted.len();
        if count > 0 {
            self.commit(subjects, |next| {
                next.extend(accepted)?;
                Ok(())
            })?;
        }
        tracing::info!(count, "created subject batch");

        match failure {
            Some(e) => Err(e),
            None => Ok(count),
        }
    }

    pub fn update(&self, subjects: &mut SubjectCollection, subject: Subject) -> Result<(), StoreError> {
        if subjects.get(subject.id()).is_none() {
            return Err(SubjectError::NotFound(subject.id().to_string()).into());
        }
        if let (Backend::Remote, Some(remote)) = (self.backend, &self.remote) {
            self.runtime.block_on(remote.update(&subject))?;
        }
        tracing::info!(id = subject.id(), "updated subject");
        self.commit(subjects, |next| Ok(next.replace(subject)?))
    }

    pub fn delete(&self, subjects: &mut SubjectCollection, id: &str) -> Result<Subject, StoreError> {
        if subjects.get(id).is_none() {
            return Err(SubjectError::NotFound(id.to_string()).into());
        }
        if let (Backend::Remote, Some(remote)) = (self.backend, &self.remote) {
            self.runtime.block_on(remote.delete(id))?;
        }
        tracing::info!(id, "deleted subject");
        let mut removed = None;
        self.commit(subjects, |next| {
            removed = Some(next.remove(id)?);
            Ok(())
        })?;
        removed.ok_or_else(|| SubjectError::NotFound(id.to_string()).into())
    }

    /// Apply `change` to a copy, write it to the local file when offline,
    /// then swap it in.
    fn commit<F>(&self, subjects: &mut SubjectCollection, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut SubjectCollection) -> Result<(), StoreError>,
    {
        let mut next = subjects.clone();
        change(&mut next)?;
        if self.backend == Backend::Local {
            self.local.save(&next)?;
        }
        *subjects = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{DayTimes, Weekday};

    fn offline(dir: &tempfile::TempDir) -> Gateway {
        Gateway::new(None, LocalStore::new(dir.path().join("subjects.json"))).unwrap()
    }

    fn science() -> Subject {
        let mut s = Subject::new("Science");
        s.times = DayTimes::uniform(&[Weekday::Monday], "10:15");
        s
    }

    #[test]
    fn offline_connect_uses_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut gateway = offline(&dir);
        assert!(gateway.connect().unwrap().is_empty());
        assert_eq!(gateway.backend(), Backend::Local);
    }

    #[test]
    fn mutations_are_written_through_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut gateway = offline(&dir);
        let mut subjects = gateway.connect().unwrap();

        let subject = science();
        let id = subject.id().to_string();
        gateway.create(&mut subjects, subject).unwrap();
        assert_eq!(gateway.local().load().unwrap(), subjects);

        let mut edited = subjects.get(&id).cloned().unwrap();
        edited.name = "Nature Study".into();
        gateway.update(&mut subjects, edited).unwrap();
        assert_eq!(gateway.local().load().unwrap().as_slice()[0].name, "Nature Study");

        let removed = gateway.delete(&mut subjects, &id).unwrap();
        assert_eq!(removed.id(), id);
        assert!(gateway.local().load().unwrap().is_empty());
    }

    #[test]
    fn failed_mutation_leaves_list_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut gateway = offline(&dir);
        let mut subjects = gateway.connect().unwrap();
        let subject = science();
        gateway.create(&mut subjects, subject.clone()).unwrap();

        let err = gateway.create(&mut subjects, subject).unwrap_err();
        assert!(matches!(err, StoreError::Subject(SubjectError::DuplicateId(_))));
        assert_eq!(subjects.len(), 1);

        let err = gateway.delete(&mut subjects, "missing").unwrap_err();
        assert!(matches!(err, StoreError::Subject(SubjectError::NotFound(_))));
        assert_eq!(subjects.len(), 1);
    }

    #[test]
    fn create_many_appends_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut gateway = offline(&dir);
        let mut subjects = gateway.connect().unwrap();
        let added = gateway
            .create_many(&mut subjects, vec![science(), Subject::new("Health")])
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(gateway.local().load().unwrap().len(), 2);
    }

    #[test]
    fn create_many_skips_subjects_already_stored() {
        let dir = tempfile::tempdir().unwrap();
        let mut gateway = offline(&dir);
        let mut subjects = gateway.connect().unwrap();
        let batch = vec![science(), Subject::new("Health")];

        gateway.create_many(&mut subjects, batch[..1].to_vec()).unwrap();
        let added = gateway.create_many(&mut subjects, batch).unwrap();
        assert_eq!(added, 1);
        assert_eq!(subjects.len(), 2);
        assert_eq!(gateway.local().load().unwrap(), subjects);
    }
}
