//! File system based implementations
//!
//! Sessions are stored as one JSON document per subject. Trees are read from a
//! directory of YAML or JSON documents.

use async_trait::async_trait;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use tokio::fs;
use triage_core::Session;

use crate::{error::RepositoryError, traits::*, RepositoryResult};

const SESSION_EXTENSION: &str = "json";
const TREE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

fn absolutize(path: &Path) -> RepositoryResult<PathBuf> {
    Ok(path
        .absolutize()
        .map_err(|e| RepositoryError::Other(format!("Failed to absolutize path: {}", e)))?
        .to_path_buf())
}

/// Session store writing `<root>/<subject_reference>.json`
#[derive(Debug, Clone)]
pub struct FileSystemSessionStore {
    root_path: PathBuf,
}

impl FileSystemSessionStore {
    /// Create a store rooted at `root_path`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(root_path: P) -> RepositoryResult<Self> {
        let path = root_path.as_ref();
        std::fs::create_dir_all(path)?;

        Ok(Self {
            root_path: absolutize(path)?,
        })
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Map a subject reference to its document path.
    ///
    /// References that could escape the root directory are rejected.
    fn session_path(&self, subject_reference: &str) -> RepositoryResult<PathBuf> {
        let unsafe_reference = subject_reference.is_empty()
            || subject_reference.starts_with('.')
            || subject_reference.contains(['/', '\\', '\0']);

        if unsafe_reference {
            return Err(RepositoryError::InvalidPath {
                path: PathBuf::from(subject_reference),
            });
        }

        Ok(self
            .root_path
            .join(format!("{}.{}", subject_reference, SESSION_EXTENSION)))
    }
}

#[async_trait]
impl SessionStore for FileSystemSessionStore {
    async fn load(&self, subject_reference: &str) -> RepositoryResult<Option<Session>> {
        let path = self.session_path(subject_reference)?;

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn save(&self, session: &Session) -> RepositoryResult<()> {
        let path = self.session_path(&session.subject_reference)?;
        let content = serde_json::to_string_pretty(session)?;

        // Write then rename so readers never see a partial document
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, content).await?;
        fs::rename(&staging, &path).await?;

        tracing::debug!(
            "Saved session {} for subject '{}' to {}",
            session.id,
            session.subject_reference,
            path.display()
        );
        Ok(())
    }

    async fn delete(&self, subject_reference: &str) -> RepositoryResult<()> {
        let path = self.session_path(subject_reference)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Tree documents under a directory, searched recursively
#[derive(Debug, Clone)]
pub struct FileSystemTreeRepository {
    root_path: PathBuf,
}

impl FileSystemTreeRepository {
    /// Create a repository over an existing directory
    ///
    /// # Example
    /// ```no_run
    /// use triage_repository::FileSystemTreeRepository;
    ///
    /// let repo = FileSystemTreeRepository::new("trees").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(root_path: P) -> RepositoryResult<Self> {
        let path = root_path.as_ref();

        if !path.is_dir() {
            return Err(RepositoryError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            root_path: absolutize(path)?,
        })
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// List tree documents relative to the root, sorted
    pub async fn list(&self) -> RepositoryResult<Vec<String>> {
        let mut files = Vec::new();
        self.collect_documents(&self.root_path, &mut files).await?;

        let mut relative: Vec<String> = files
            .iter()
            .filter_map(|path| path.strip_prefix(&self.root_path).ok())
            .map(|path| path.display().to_string())
            .collect();
        relative.sort();
        Ok(relative)
    }

    /// Recursively collect tree documents
    fn collect_documents<'a>(
        &'a self,
        dir: &'a Path,
        files: &'a mut Vec<PathBuf>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = RepositoryResult<()>> + Send + 'a>>
    {
        Box::pin(async move {
            let mut entries = fs::read_dir(dir).await?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();

                if path.is_dir() {
                    self.collect_documents(&path, files).await?;
                } else if is_tree_document(&path) {
                    files.push(path);
                }
            }

            Ok(())
        })
    }
}

fn is_tree_document(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map_or(false, |ext| TREE_EXTENSIONS.contains(&ext))
}

#[async_trait]
impl TreeRepository for FileSystemTreeRepository {
    async fn load_all(&self) -> RepositoryResult<Vec<(String, String)>> {
        let mut documents = Vec::new();

        for relative in self.list().await? {
            let path = self.root_path.join(&relative);
            let content = fs::read_to_string(&path)
                .await
                .map_err(|_| RepositoryError::NotFound {
                    path: path.display().to_string(),
                })?;
            documents.push((relative, content));
        }

        tracing::debug!(
            "Found {} tree documents in {}",
            documents.len(),
            self.root_path.display()
        );
        Ok(documents)
    }
}
