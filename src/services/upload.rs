use axum::body::Bytes;
use axum_typed_multipart::FieldData;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult};

/// URL prefix the upload root is served under
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Document,
}

impl FileKind {
    /// Sniffed MIME types accepted for a given extension
    fn allowed_mimes(self, extension: &str) -> Option<&'static [&'static str]> {
        match (self, extension) {
            (FileKind::Image, "jpg" | "jpeg") => Some(&["image/jpeg"]),
            (FileKind::Image, "png") => Some(&["image/png"]),
            (FileKind::Image, "gif") => Some(&["image/gif"]),
            (FileKind::Image, "webp") => Some(&["image/webp"]),
            (FileKind::Document, "pdf") => Some(&["application/pdf"]),
            (FileKind::Document, "doc") => Some(&["application/msword", "application/x-ole-storage"]),
            (FileKind::Document, "docx") => Some(&[
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                "application/zip",
            ]),
            _ => None,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FileKind::Image => "jpg, jpeg, png, gif or webp",
            FileKind::Document => "pdf, doc or docx",
        }
    }
}

/// How one named file part of a form is validated and where it lands
#[derive(Debug, Clone, Copy)]
pub struct UploadRule {
    pub field: &'static str,
    pub prefix: &'static str,
    pub kind: FileKind,
    pub subfolder: Option<&'static str>,
}

impl UploadRule {
    pub const fn image(field: &'static str, prefix: &'static str) -> Self {
        Self {
            field,
            prefix,
            kind: FileKind::Image,
            subfolder: None,
        }
    }

    pub const fn document(field: &'static str, prefix: &'static str) -> Self {
        Self {
            field,
            prefix,
            kind: FileKind::Document,
            subfolder: None,
        }
    }

    pub const fn in_subfolder(mut self, subfolder: &'static str) -> Self {
        self.subfolder = Some(subfolder);
        self
    }

    /// Validates an optional file part. Nothing touches the disk here.
    pub fn accept(&self, part: Option<FieldData<Bytes>>) -> ApiResult<Option<PendingUpload>> {
        match part {
            Some(part) => self.check(part.metadata.file_name.as_deref(), part.contents),
            None => Ok(None),
        }
    }

    pub fn require(&self, part: Option<FieldData<Bytes>>) -> ApiResult<PendingUpload> {
        self.accept(part)?
            .ok_or_else(|| ApiError::Validation(format!("{} file is required", self.field)))
    }

    fn check(&self, file_name: Option<&str>, contents: Bytes) -> ApiResult<Option<PendingUpload>> {
        let file_name = file_name.map(str::trim).unwrap_or_default();
        // browsers send an empty part when no file was picked
        if file_name.is_empty() && contents.is_empty() {
            return Ok(None);
        }
        if contents.is_empty() {
            return Err(ApiError::Validation(format!("{} file is empty", self.field)));
        }

        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let allowed = self.kind.allowed_mimes(&extension).ok_or_else(|| {
            ApiError::Validation(format!(
                "{} must be one of: {}",
                self.field,
                self.kind.describe()
            ))
        })?;

        // unrecognised content is judged by its extension alone
        let sniffed = infer::get(&contents).map(|t| t.mime_type());
        if sniffed.is_some_and(|mime| !allowed.contains(&mime)) {
            return Err(ApiError::Validation(format!(
                "{} content does not match its .{} extension",
                self.field, extension
            )));
        }

        Ok(Some(PendingUpload {
            file_name: format!("{}-{}.{}", self.prefix, Uuid::new_v4(), extension),
            subfolder: self.subfolder,
            contents,
        }))
    }
}

/// A validated file that has not been written yet
#[derive(Debug)]
pub struct PendingUpload {
    file_name: String,
    subfolder: Option<&'static str>,
    contents: Bytes,
}

impl PendingUpload {
    fn relative_path(&self) -> PathBuf {
        match self.subfolder {
            Some(sub) => Path::new(sub).join(&self.file_name),
            None => PathBuf::from(&self.file_name),
        }
    }

    fn public_url(&self) -> String {
        match self.subfolder {
            Some(sub) => format!("{PUBLIC_PREFIX}/{sub}/{}", self.file_name),
            None => format!("{PUBLIC_PREFIX}/{}", self.file_name),
        }
    }
}

/// Local upload directory shared by every handler
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Maps `/uploads/...` to a path under the root. Anything else is not ours.
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let relative = url.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;
        let relative = Path::new(relative);
        if relative.as_os_str().is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }

    pub async fn write(&self, pending: PendingUpload) -> ApiResult<String> {
        let path = self.root.join(pending.relative_path());
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&path, &pending.contents)
            .await
            .map_err(|e| ApiError::Storage(format!("write {}: {e}", path.display())))?;

        tracing::info!(
            path = %path.display(),
            size_bytes = pending.contents.len(),
            "Upload stored"
        );

        Ok(pending.public_url())
    }

    /// Idempotent delete. Returns whether a file was actually removed.
    pub async fn remove_if_exists(&self, url: &str) -> ApiResult<bool> {
        let Some(path) = self.resolve(url) else {
            tracing::warn!("Refusing to remove {} outside the upload root", url);
            return Ok(false);
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Upload removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ApiError::Storage(format!("remove {}: {e}", path.display()))),
        }
    }

    /// Removal after the database already moved on. A failure only leaks the
    /// file, so it is logged rather than reported.
    pub async fn discard(&self, url: Option<&str>) {
        if let Some(url) = url {
            if let Err(e) = self.remove_if_exists(url).await {
                tracing::warn!("Orphaned upload {} left behind: {}", url, e);
            }
        }
    }

    pub fn batch(&self) -> UploadBatch<'_> {
        UploadBatch {
            store: self,
            written: Vec::new(),
        }
    }
}

/// Files written for one request, removed again if the request fails
pub struct UploadBatch<'a> {
    store: &'a UploadStore,
    written: Vec<String>,
}

impl UploadBatch<'_> {
    pub async fn write(&mut self, pending: Option<PendingUpload>) -> ApiResult<Option<String>> {
        match pending {
            Some(pending) => self.write_one(pending).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn write_one(&mut self, pending: PendingUpload) -> ApiResult<String> {
        match self.store.write(pending).await {
            Ok(url) => {
                self.written.push(url.clone());
                Ok(url)
            }
            Err(e) => {
                self.rollback().await;
                Err(e)
            }
        }
    }

    /// Keeps the files when `result` is Ok, removes them otherwise
    pub async fn settle<T>(mut self, result: ApiResult<T>) -> ApiResult<T> {
        if result.is_err() {
            self.rollback().await;
        }
        result
    }

    async fn rollback(&mut self) {
        for url in self.written.drain(..) {
            self.store.discard(Some(&url)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];
    const PDF: &[u8] = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<<>>\nendobj\n";

    const COVER: UploadRule = UploadRule::image("cover", "cover");
    const FILE: UploadRule = UploadRule::document("file", "document");

    #[test]
    fn accepts_matching_image() {
        let pending = COVER
            .check(Some("Photo.PNG"), Bytes::from_static(PNG))
            .unwrap()
            .unwrap();
        assert!(pending.file_name.starts_with("cover-"));
        assert!(pending.file_name.ends_with(".png"));
        assert!(pending.public_url().starts_with("/uploads/cover-"));
    }

    #[test]
    fn empty_part_means_no_file() {
        assert!(COVER.check(Some(""), Bytes::new()).unwrap().is_none());
        assert!(COVER.check(None, Bytes::new()).unwrap().is_none());
    }

    #[test]
    fn rejects_disallowed_extension_and_mismatched_content() {
        let err = COVER
            .check(Some("run.exe"), Bytes::from_static(PNG))
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = FILE
            .check(Some("report.pdf"), Bytes::from_static(PNG))
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        assert!(FILE
            .check(Some("report.pdf"), Bytes::from_static(PDF))
            .unwrap()
            .is_some());
    }

    #[test]
    fn generated_names_do_not_repeat() {
        let a = COVER.check(Some("a.png"), Bytes::from_static(PNG)).unwrap().unwrap();
        let b = COVER.check(Some("a.png"), Bytes::from_static(PNG)).unwrap().unwrap();
        assert_ne!(a.file_name, b.file_name);
    }

    #[test]
    fn resolve_stays_inside_root() {
        let store = UploadStore::new("/srv/uploads");
        assert_eq!(
            store.resolve("/uploads/directory/photo-1.png"),
            Some(PathBuf::from("/srv/uploads/directory/photo-1.png"))
        );
        assert_eq!(store.resolve("/uploads/../etc/passwd"), None);
        assert_eq!(store.resolve("/static/logo.png"), None);
        assert_eq!(store.resolve("/uploads/"), None);
    }

    #[tokio::test]
    async fn write_then_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        let rule = UploadRule::image("photo", "directory").in_subfolder("directory");

        let pending = rule.check(Some("p.png"), Bytes::from_static(PNG)).unwrap();
        let url = store.write(pending.unwrap()).await.unwrap();
        assert!(url.starts_with("/uploads/directory/directory-"));

        let path = store.resolve(&url).unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), PNG);

        assert!(store.remove_if_exists(&url).await.unwrap());
        assert!(!store.remove_if_exists(&url).await.unwrap());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn failed_batch_removes_its_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let mut batch = store.batch();
        let pending = COVER.check(Some("c.png"), Bytes::from_static(PNG)).unwrap();
        let url = batch.write(pending).await.unwrap().unwrap();
        let path = store.resolve(&url).unwrap();
        assert!(path.exists());

        let result: ApiResult<()> = batch
            .settle(Err(ApiError::Conflict("taken".into())))
            .await;
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
