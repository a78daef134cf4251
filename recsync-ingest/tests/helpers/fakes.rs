//! In-memory collaborator fakes
//!
//! No network and no filesystem: every side effect is recorded so tests can
//! assert on exactly what a pass did.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use recsync_common::DirectoryLayout;
use recsync_ingest::error::{BoardError, NotifyError, PublishError, RelocationError, ScanError};
use recsync_ingest::models::RawBoardItem;
use recsync_ingest::types::{BoardSource, Notifier, Publisher, RecordingStore};

/// Board returning fixed items, or failing
pub struct FakeBoard {
    items: Vec<RawBoardItem>,
    fail: bool,
    pub requested: Mutex<Vec<u64>>,
}

impl FakeBoard {
    pub fn with_items(items: Vec<RawBoardItem>) -> Self {
        Self {
            items,
            fail: false,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            items: Vec::new(),
            fail: true,
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl BoardSource for FakeBoard {
    async fn fetch_board(&self, board_id: u64) -> Result<Vec<RawBoardItem>, BoardError> {
        self.requested.lock().unwrap().push(board_id);
        if self.fail {
            return Err(BoardError::Api(500, "board unavailable".to_string()));
        }
        Ok(self.items.clone())
    }
}

/// Files tracked as a set of paths
pub struct MemoryStore {
    watch: PathBuf,
    files: Mutex<BTreeSet<PathBuf>>,
    /// Moves into this path fail with an I/O error
    fail_into: Option<PathBuf>,
    pub moves: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl MemoryStore {
    pub fn new(layout: &DirectoryLayout, watch_files: &[&str]) -> Self {
        let files = watch_files.iter().map(|name| layout.watch.join(name)).collect();
        Self {
            watch: layout.watch.clone(),
            files: Mutex::new(files),
            fail_into: None,
            moves: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_into(mut self, path: PathBuf) -> Self {
        self.fail_into = Some(path);
        self
    }

    pub fn add(&self, path: PathBuf) {
        self.files.lock().unwrap().insert(path);
    }

    pub fn has(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains(path)
    }
}

#[async_trait::async_trait]
impl RecordingStore for MemoryStore {
    async fn list_candidates(&self) -> Result<Vec<String>, ScanError> {
        let files = self.files.lock().unwrap();
        Ok(files
            .iter()
            .filter(|path| path.parent() == Some(self.watch.as_path()))
            .filter(|path| {
                path.extension()
                    .map(|e| e.eq_ignore_ascii_case("mov"))
                    .unwrap_or(false)
            })
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .collect())
    }

    async fn contains(&self, path: &Path) -> bool {
        self.has(path)
    }

    async fn move_file(&self, src: &Path, dst: &Path) -> Result<(), RelocationError> {
        if self.fail_into.as_deref() == Some(dst) {
            return Err(RelocationError::Io(
                src.to_path_buf(),
                dst.to_path_buf(),
                "simulated failure".to_string(),
            ));
        }

        let mut files = self.files.lock().unwrap();
        if !files.contains(src) {
            return Err(RelocationError::SourceNotFound(src.to_path_buf()));
        }
        if files.contains(dst) {
            return Err(RelocationError::DestinationExists(dst.to_path_buf()));
        }
        files.remove(src);
        files.insert(dst.to_path_buf());
        self.moves
            .lock()
            .unwrap()
            .push((src.to_path_buf(), dst.to_path_buf()));
        Ok(())
    }
}

/// Publisher with a fixed account directory
#[derive(Default)]
pub struct FakePublisher {
    accounts: HashMap<String, String>,
    fail_publish: bool,
    fail_lookup: bool,
    fail_owner: bool,
    pub published: Mutex<Vec<(PathBuf, String)>>,
    pub owners: Mutex<Vec<(String, String)>>,
}

impl FakePublisher {
    pub fn with_account(mut self, email: &str, account: &str) -> Self {
        self.accounts.insert(email.to_string(), account.to_string());
        self
    }

    pub fn failing_publish(mut self) -> Self {
        self.fail_publish = true;
        self
    }

    pub fn failing_lookup(mut self) -> Self {
        self.fail_lookup = true;
        self
    }

    pub fn failing_owner(mut self) -> Self {
        self.fail_owner = true;
        self
    }
}

#[async_trait::async_trait]
impl Publisher for FakePublisher {
    async fn resolve_account(&self, email: &str) -> Result<Option<String>, PublishError> {
        if self.fail_lookup {
            return Err(PublishError::Network("lookup timed out".to_string()));
        }
        Ok(self.accounts.get(email).cloned())
    }

    async fn publish(&self, path: &Path, title: &str) -> Result<String, PublishError> {
        if self.fail_publish {
            return Err(PublishError::Api(
                "UPLOAD_FAILED".to_string(),
                "simulated".to_string(),
            ));
        }
        let mut published = self.published.lock().unwrap();
        published.push((path.to_path_buf(), title.to_string()));
        Ok(format!("0_entry{}", published.len()))
    }

    async fn set_owner(&self, entry_id: &str, account: &str) -> Result<(), PublishError> {
        if self.fail_owner {
            return Err(PublishError::Http(500, "owner update failed".to_string()));
        }
        self.owners
            .lock()
            .unwrap()
            .push((entry_id.to_string(), account.to_string()));
        Ok(())
    }
}

/// Notifier recording `(address, subject, body)`
#[derive(Default)]
pub struct FakeNotifier {
    fail: bool,
    pub sent: Mutex<Vec<(String, String, String)>>,
}

impl FakeNotifier {
    pub fn unconfigured() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::NotConfigured);
        }
        self.sent.lock().unwrap().push((
            address.to_string(),
            subject.to_string(),
            body.to_string(),
        ));
        Ok(())
    }
}
