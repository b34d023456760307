use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::user::models::UserRecord;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// On-disk document: `{ "users": [ ... ] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct UserDocument {
    #[serde(default)]
    users: Vec<UserRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRow {
    email: String,
    #[serde(rename = "passwordHash", alias = "password")]
    password_hash: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            email: row.email,
            password_hash: row.password_hash,
            extra: row.extra,
        }
    }
}

impl From<&UserRecord> for UserRow {
    fn from(user: &UserRecord) -> Self {
        Self {
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            extra: user.extra.clone(),
        }
    }
}

/// User store backed by a single JSON file.
///
/// The document is held in memory and every write flushes the whole
/// document before returning. Reads re-load the file first so edits made
/// outside this process are observed. All file access goes through one
/// mutex.
pub struct JsonFileUserRepository {
    path: PathBuf,
    document: Mutex<UserDocument>,
}

impl JsonFileUserRepository {
    /// Open the store, creating `{ "users": [] }` if the file is absent.
    ///
    /// Call once at startup and share the handle.
    ///
    /// # Errors
    /// * `Storage` - File could not be read, parsed or created
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, UserError> {
        let path = path.into();

        let document = match tokio::fs::read(&path).await {
            Ok(bytes) => parse_document(&path, &bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| storage_error("create directory for", &path, e))?;
                }

                let document = UserDocument::default();
                write_document(&path, &document).await?;
                tracing::info!(path = %path.display(), "Initialized empty user store");
                document
            }
            Err(e) => return Err(storage_error("read", &path, e)),
        };

        tracing::info!(
            path = %path.display(),
            users = document.users.len(),
            "User store opened"
        );

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }
}

#[async_trait]
impl UserRepository for JsonFileUserRepository {
    async fn create(&self, user: UserRecord) -> Result<UserRecord, UserError> {
        let mut document = self.document.lock().await;
        document.users.push(UserRow::from(&user));

        if let Err(e) = write_document(&self.path, &document).await {
            document.users.pop();
            return Err(e);
        }

        tracing::debug!(users = document.users.len(), "User store flushed");

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserError> {
        let mut document = self.document.lock().await;
        *document = read_document(&self.path).await?;

        Ok(document
            .users
            .iter()
            .find(|row| row.email == email)
            .cloned()
            .map(UserRecord::from))
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, UserError> {
        let mut document = self.document.lock().await;
        *document = read_document(&self.path).await?;

        Ok(document
            .users
            .iter()
            .cloned()
            .map(UserRecord::from)
            .collect())
    }
}

/// Read the document; a file removed after startup reads as empty.
async fn read_document(path: &Path) -> Result<UserDocument, UserError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => parse_document(path, &bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(UserDocument::default()),
        Err(e) => Err(storage_error("read", path, e)),
    }
}

fn parse_document(path: &Path, bytes: &[u8]) -> Result<UserDocument, UserError> {
    serde_json::from_slice(bytes).map_err(|e| {
        UserError::Storage(format!("Malformed user store {}: {}", path.display(), e))
    })
}

/// Write to a sibling temp file, sync, then rename over the target.
async fn write_document(path: &Path, document: &UserDocument) -> Result<(), UserError> {
    let bytes = serde_json::to_vec_pretty(document)
        .map_err(|e| UserError::Storage(format!("Failed to serialize user store: {}", e)))?;

    let temp_path = temp_path_for(path);

    let result = async {
        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&temp_path, path).await
    }
    .await;

    if let Err(e) = result {
        let _ = tokio::fs::remove_file(&temp_path).await;
        tracing::error!(path = %path.display(), error = %e, "Failed to flush user store");
        return Err(storage_error("write", path, e));
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn storage_error(action: &str, path: &Path, e: std::io::Error) -> UserError {
    UserError::Storage(format!("Failed to {} {}: {}", action, path.display(), e))
}
