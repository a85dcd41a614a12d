//! Parameter sets for the catalog operations.
//!
//! # Design
//! Enumerations exist for every field the service constrains to a fixed
//! vocabulary, with `as_str` giving the exact wire token. Booleans that do
//! reach the wire are serialized as the strings `"true"`/`"false"` — the
//! service does not accept native JSON booleans in query or form fields.

/// Sort key for list, search and share enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Name,
    Size,
    User,
    Group,
    MTime,
    ATime,
    CTime,
    CrTime,
    Posix,
    Type,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Size => "size",
            SortBy::User => "user",
            SortBy::Group => "group",
            SortBy::MTime => "mtime",
            SortBy::ATime => "atime",
            SortBy::CTime => "ctime",
            SortBy::CrTime => "crtime",
            SortBy::Posix => "posix",
            SortBy::Type => "type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Entry filter for list and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    #[default]
    All,
    File,
    Dir,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::All => "all",
            FileType::File => "file",
            FileType::Dir => "dir",
        }
    }
}

/// Disposition the service applies when serving a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadMode {
    /// Serve inline (`Content-Disposition` absent).
    #[default]
    Open,
    /// Serve as an attachment.
    Download,
}

impl DownloadMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadMode::Open => "open",
            DownloadMode::Download => "download",
        }
    }
}

/// Options for list and search operations.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub folder_path: String,
    pub limit: u32,
    pub offset: u32,
    pub sort_by: SortBy,
    pub sort_direction: SortDirection,
    /// Glob pattern entries must match. Required for search; optional for
    /// list (empty means "no filter").
    pub pattern: Option<String>,
    pub file_type: FileType,
    /// Request the extra capability fields for each entry.
    pub additional: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            folder_path: "/home".to_string(),
            limit: 25,
            offset: 0,
            sort_by: SortBy::default(),
            sort_direction: SortDirection::default(),
            pattern: None,
            file_type: FileType::default(),
            additional: false,
        }
    }
}

/// Options for share enumeration.
#[derive(Debug, Clone)]
pub struct ShareListOptions {
    pub only_writable: bool,
    pub limit: u32,
    pub offset: u32,
    pub sort_by: SortBy,
    pub sort_direction: SortDirection,
    pub additional: bool,
}

impl Default for ShareListOptions {
    fn default() -> Self {
        Self {
            only_writable: false,
            limit: 25,
            offset: 0,
            sort_by: SortBy::default(),
            sort_direction: SortDirection::default(),
            additional: false,
        }
    }
}

/// String form of a boolean parameter that does reach the wire
/// (`onlywritable`, `force_parent`, `recursive`, ...).
pub(crate) fn wire_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
