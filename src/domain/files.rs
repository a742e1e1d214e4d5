//! File catalogue (metadata only, no file contents)

use crate::domain::record::{merge, Record, RecordId, Timestamps};
use crate::domain::store::{Persisted, Store};
use crate::domain::tags::normalize_tags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Document,
    Image,
    Video,
    Audio,
    Archive,
    Other,
}

impl FileKind {
    /// Guess the kind from a file name's extension
    pub fn from_name(name: &str) -> Self {
        let ext = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
            _ => return FileKind::Other,
        };
        match ext.as_str() {
            "pdf" | "doc" | "docx" | "txt" | "md" | "odt" | "xls" | "xlsx" | "csv" => {
                FileKind::Document
            }
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "heic" | "svg" => FileKind::Image,
            "mp4" | "mov" | "mkv" | "webm" | "avi" => FileKind::Video,
            "mp3" | "wav" | "flac" | "ogg" | "m4a" => FileKind::Audio,
            "zip" | "tar" | "gz" | "7z" | "rar" => FileKind::Archive,
            _ => FileKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    pub id: RecordId,
    pub name: String,
    pub folder: String,
    pub kind: FileKind,
    pub size_bytes: u64,
    pub starred: bool,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileItemDraft {
    pub name: String,
    #[serde(default = "root_folder")]
    pub folder: String,
    #[serde(default)]
    pub kind: Option<FileKind>,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn root_folder() -> String {
    "/".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileItemPatch {
    pub name: Option<String>,
    pub folder: Option<String>,
    pub kind: Option<FileKind>,
    pub size_bytes: Option<u64>,
    pub starred: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl Record for FileItem {
    type Draft = FileItemDraft;
    type Patch = FileItemPatch;
    const KIND: &'static str = "file";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: FileItemDraft, now: DateTime<Utc>) -> Self {
        let kind = draft.kind.unwrap_or_else(|| FileKind::from_name(&draft.name));
        FileItem {
            id,
            name: draft.name,
            folder: draft.folder,
            kind,
            size_bytes: draft.size_bytes,
            starred: draft.starred,
            tags: normalize_tags(draft.tags),
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: FileItemPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.folder, patch.folder);
        merge(&mut self.kind, patch.kind);
        merge(&mut self.size_bytes, patch.size_bytes);
        merge(&mut self.starred, patch.starred);
        merge(&mut self.tags, patch.tags.map(normalize_tags));
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        let star = if self.starred { "* " } else { "" };
        format!(
            "{}{}/{} ({:?}, {})",
            star,
            self.folder.trim_end_matches('/'),
            self.name,
            self.kind,
            human_size(self.size_bytes)
        )
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Binary-prefixed size with one decimal
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

pub type FileStore = Store<FileItem>;

impl Persisted for Store<FileItem> {
    const KEY: &'static str = "files";

    fn seed(now: DateTime<Utc>) -> Self {
        let file = |name: &str, folder: &str, size_bytes, starred| FileItemDraft {
            name: name.to_string(),
            folder: folder.to_string(),
            kind: None,
            size_bytes,
            starred,
            tags: Vec::new(),
        };
        let drafts = vec![
            file("passport-scan.pdf", "/documents", 842_112, true),
            file("tax-return-2024.pdf", "/documents", 1_204_551, false),
            file("beach.jpg", "/photos", 3_481_920, false),
            file("wedding.mp4", "/videos", 1_532_000_000, true),
        ];
        Store::seeded(drafts, now)
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

impl Store<FileItem> {
    pub fn in_folder(&self, folder: &str) -> Vec<&FileItem> {
        let wanted = folder.trim_end_matches('/');
        self.filter(|f| f.folder.trim_end_matches('/') == wanted)
    }

    pub fn starred(&self) -> Vec<&FileItem> {
        self.filter(|f| f.starred)
    }

    pub fn total_size(&self) -> u64 {
        self.iter().map(|f| f.size_bytes).sum()
    }
}
