//! In-memory store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use steprun_core::{
    NewTask, Task, TaskId, TaskStatus, TaskUpdate, User, UserId, UserStatus, Worker, WorkerId,
    WorkerStatus,
};

use super::{StoreError, TaskStore, UserDirectory, WorkerDirectory};
use crate::crypto::hash_secret;

/// Tasks, workers, operators and their links held in process memory.
///
/// Ids are assigned from per-table counters starting at 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: RwLock<BTreeMap<TaskId, Task>>,
    workers: RwLock<BTreeMap<WorkerId, Worker>>,
    users: RwLock<BTreeMap<UserId, User>>,
    links: RwLock<BTreeSet<(UserId, WorkerId)>>,
    next_task: AtomicU64,
    next_worker: AtomicU64,
    next_user: AtomicU64,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an operator account, or reset the password and status of an
    /// existing one with the same name.
    pub async fn upsert_user(&self, name: &str, password: &str, status: UserStatus) -> User {
        let mut users = self.users.write().await;
        let password_hash = hash_secret(password);

        if let Some(user) = users.values_mut().find(|u| u.name == name) {
            user.password_hash = password_hash;
            user.status = status;
            return user.clone();
        }

        let id = UserId::new(self.next_user.fetch_add(1, Ordering::SeqCst) + 1);
        let user = User {
            id,
            name: name.to_string(),
            password_hash,
            detail: String::new(),
            status,
        };
        users.insert(id, user.clone());
        user
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError> {
        self.check_online()?;
        let now = Utc::now();
        let id = TaskId::new(self.next_task.fetch_add(1, Ordering::SeqCst) + 1);
        let task = Task {
            id,
            worker_id: task.worker_id,
            creator_id: task.creator_id,
            params: task.params,
            status: TaskStatus::Record,
            progress: 0,
            detail: String::new(),
            created_at: now,
            updated_at: now,
        };
        self.tasks.write().await.insert(id, task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        self.check_online()?;
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> Result<(), StoreError> {
        self.check_online()?;
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id).ok_or(StoreError::TaskNotFound(id))?;
        task.apply(&update);
        Ok(())
    }

    async fn unfinished_tasks(&self, worker_id: WorkerId) -> Result<Vec<Task>, StoreError> {
        self.check_online()?;
        Ok(self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| t.worker_id == worker_id && t.status.is_unfinished())
            .cloned()
            .collect())
    }

    async fn count_tasks(&self, worker_id: WorkerId) -> Result<u64, StoreError> {
        self.check_online()?;
        Ok(self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| t.worker_id == worker_id)
            .count() as u64)
    }

    async fn list_tasks(
        &self,
        worker_id: WorkerId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Task>, StoreError> {
        self.check_online()?;
        Ok(self
            .tasks
            .read()
            .await
            .values()
            .rev()
            .filter(|t| t.worker_id == worker_id)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn status_counts(&self) -> Result<BTreeMap<TaskStatus, u64>, StoreError> {
        self.check_online()?;
        let mut counts = BTreeMap::new();
        for task in self.tasks.read().await.values() {
            *counts.entry(task.status).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[async_trait]
impl WorkerDirectory for MemoryStore {
    async fn find_worker(&self, id: WorkerId) -> Result<Option<Worker>, StoreError> {
        self.check_online()?;
        Ok(self.workers.read().await.get(&id).cloned())
    }

    async fn find_worker_by_name(&self, name: &str) -> Result<Option<Worker>, StoreError> {
        self.check_online()?;
        Ok(self
            .workers
            .read()
            .await
            .values()
            .find(|w| w.name == name)
            .cloned())
    }

    async fn insert_worker(
        &self,
        name: &str,
        desc: &str,
        key: &str,
    ) -> Result<Worker, StoreError> {
        self.check_online()?;
        let mut workers = self.workers.write().await;
        if workers.values().any(|w| w.name == name) {
            return Err(StoreError::DuplicateWorkerName(name.to_string()));
        }

        let id = WorkerId::new(self.next_worker.fetch_add(1, Ordering::SeqCst) + 1);
        let worker = Worker {
            id,
            key: key.to_string(),
            name: name.to_string(),
            desc: desc.to_string(),
            status: WorkerStatus::Disabled,
            created_at: Utc::now(),
        };
        workers.insert(id, worker.clone());
        Ok(worker)
    }

    async fn update_worker(&self, id: WorkerId, name: &str, desc: &str) -> Result<(), StoreError> {
        self.check_online()?;
        let mut workers = self.workers.write().await;
        if workers.values().any(|w| w.id != id && w.name == name) {
            return Err(StoreError::DuplicateWorkerName(name.to_string()));
        }
        let worker = workers.get_mut(&id).ok_or(StoreError::WorkerNotFound(id))?;
        worker.name = name.to_string();
        worker.desc = desc.to_string();
        Ok(())
    }

    async fn set_worker_status(
        &self,
        id: WorkerId,
        status: WorkerStatus,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        let mut workers = self.workers.write().await;
        let worker = workers.get_mut(&id).ok_or(StoreError::WorkerNotFound(id))?;
        worker.status = status;
        Ok(())
    }

    async fn delete_worker(&self, id: WorkerId) -> Result<(), StoreError> {
        self.check_online()?;
        // Links first, so a concurrent reader never sees a link to a
        // missing worker.
        self.links.write().await.retain(|(_, w)| *w != id);
        self.workers.write().await.remove(&id);
        Ok(())
    }

    async fn list_workers(&self) -> Result<Vec<Worker>, StoreError> {
        self.check_online()?;
        Ok(self.workers.read().await.values().cloned().collect())
    }

    async fn workers_for_user(&self, user_id: UserId) -> Result<Vec<Worker>, StoreError> {
        self.check_online()?;
        let linked: Vec<WorkerId> = self
            .links
            .read()
            .await
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, w)| *w)
            .collect();

        let workers = self.workers.read().await;
        Ok(linked
            .iter()
            .filter_map(|id| workers.get(id).cloned())
            .collect())
    }

    async fn users_for_worker(&self, worker_id: WorkerId) -> Result<Vec<UserId>, StoreError> {
        self.check_online()?;
        Ok(self
            .links
            .read()
            .await
            .iter()
            .filter(|(_, w)| *w == worker_id)
            .map(|(u, _)| *u)
            .collect())
    }

    async fn is_linked(&self, user_id: UserId, worker_id: WorkerId) -> Result<bool, StoreError> {
        self.check_online()?;
        Ok(self.links.read().await.contains(&(user_id, worker_id)))
    }

    async fn link(&self, user_id: UserId, worker_id: WorkerId) -> Result<(), StoreError> {
        self.check_online()?;
        if !self.workers.read().await.contains_key(&worker_id) {
            return Err(StoreError::WorkerNotFound(worker_id));
        }
        if !self.users.read().await.contains_key(&user_id) {
            return Err(StoreError::UserNotFound(user_id));
        }
        self.links.write().await.insert((user_id, worker_id));
        Ok(())
    }

    async fn unlink(&self, user_id: UserId, worker_id: WorkerId) -> Result<(), StoreError> {
        self.check_online()?;
        self.links.write().await.remove(&(user_id, worker_id));
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.check_online()?;
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        self.check_online()?;
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.name == name)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_task_defaults() {
        let store = MemoryStore::new();
        let task = store
            .insert_task(NewTask::new(WorkerId::new(1), UserId::new(1), "build"))
            .await
            .unwrap();

        assert_eq!(task.id, TaskId::new(1));
        assert_eq!(task.status, TaskStatus::Record);
        assert_eq!(task.progress, 0);
        assert!(task.detail.is_empty());
    }

    #[tokio::test]
    async fn test_update_task_applies_fields() {
        let store = MemoryStore::new();
        let task = store
            .insert_task(NewTask::new(WorkerId::new(1), UserId::new(1), "build"))
            .await
            .unwrap();

        store
            .update_task(
                task.id,
                TaskUpdate {
                    status: Some(TaskStatus::Accepted),
                    progress: Some(2),
                    detail: None,
                },
            )
            .await
            .unwrap();

        let stored = store.find_task(task.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Accepted);
        assert_eq!(stored.progress, 2);
        assert!(stored.detail.is_empty());

        let missing = store
            .update_task(TaskId::new(99), TaskUpdate::default())
            .await;
        assert!(matches!(missing, Err(StoreError::TaskNotFound(_))));
    }

    #[tokio::test]
    async fn test_unfinished_tasks_filters_worker_and_status() {
        let store = MemoryStore::new();
        let w1 = WorkerId::new(1);
        let w2 = WorkerId::new(2);

        let a = store.insert_task(NewTask::new(w1, UserId::new(1), "a")).await.unwrap();
        let b = store.insert_task(NewTask::new(w1, UserId::new(1), "b")).await.unwrap();
        let c = store.insert_task(NewTask::new(w1, UserId::new(1), "c")).await.unwrap();
        store.insert_task(NewTask::new(w2, UserId::new(1), "d")).await.unwrap();

        let accept = TaskUpdate {
            status: Some(TaskStatus::Accepted),
            ..Default::default()
        };
        store.update_task(b.id, accept).await.unwrap();
        let done = TaskUpdate {
            status: Some(TaskStatus::Success),
            ..Default::default()
        };
        store.update_task(c.id, done).await.unwrap();

        let ids: Vec<TaskId> = store
            .unfinished_tasks(w1)
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_list_tasks_newest_first_with_paging() {
        let store = MemoryStore::new();
        let w = WorkerId::new(1);
        for i in 0..5 {
            store
                .insert_task(NewTask::new(w, UserId::new(1), format!("t{i}")))
                .await
                .unwrap();
        }

        let page: Vec<u64> = store
            .list_tasks(w, 1, 2)
            .await
            .unwrap()
            .iter()
            .map(|t| t.id.get())
            .collect();
        assert_eq!(page, vec![4, 3]);
        assert_eq!(store.count_tasks(w).await.unwrap(), 5);
        assert!(store.list_tasks(w, 10, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_worker_names_are_unique() {
        let store = MemoryStore::new();
        let worker = store.insert_worker("builder", "", "key").await.unwrap();
        assert_eq!(worker.status, WorkerStatus::Disabled);

        let dup = store.insert_worker("builder", "other", "key2").await;
        assert!(matches!(dup, Err(StoreError::DuplicateWorkerName(_))));
    }

    #[tokio::test]
    async fn test_delete_worker_removes_links() {
        let store = MemoryStore::new();
        let user = store.upsert_user("alice", "secret1", UserStatus::Enabled).await;
        let worker = store.insert_worker("builder", "", "key").await.unwrap();

        store.link(user.id, worker.id).await.unwrap();
        store.link(user.id, worker.id).await.unwrap();
        assert_eq!(store.users_for_worker(worker.id).await.unwrap(), vec![user.id]);

        store.delete_worker(worker.id).await.unwrap();
        assert!(store.find_worker(worker.id).await.unwrap().is_none());
        assert!(!store.is_linked(user.id, worker.id).await.unwrap());
        assert!(store.workers_for_user(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_user_resets_password() {
        let store = MemoryStore::new();
        let first = store.upsert_user("admin", "123456", UserStatus::Enabled).await;
        let second = store.upsert_user("admin", "654321", UserStatus::Enabled).await;

        assert_eq!(first.id, second.id);
        assert_eq!(second.password_hash, hash_secret("654321"));
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let result = store.find_task(TaskId::new(1)).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));

        store.set_offline(false);
        assert!(store.find_task(TaskId::new(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_status_counts() {
        let store = MemoryStore::new();
        let w = WorkerId::new(1);
        store.insert_task(NewTask::new(w, UserId::new(1), "a")).await.unwrap();
        let b = store.insert_task(NewTask::new(w, UserId::new(1), "b")).await.unwrap();
        store
            .update_task(
                b.id,
                TaskUpdate {
                    status: Some(TaskStatus::Failed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let counts = store.status_counts().await.unwrap();
        assert_eq!(counts.get(&TaskStatus::Record), Some(&1));
        assert_eq!(counts.get(&TaskStatus::Failed), Some(&1));
        assert_eq!(counts.get(&TaskStatus::Success), None);
    }
}
