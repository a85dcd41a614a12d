//! The operation catalog: one data row per supported remote call.
//!
//! # Design
//! The upstream service family shares request plumbing through subclass
//! inheritance; here each operation is a plain table entry instead — a
//! [`Descriptor`] naming the API, CGI path, method, version and verb. The
//! request builder consumes descriptors uniformly, so adding an operation is
//! adding a row, not a type.
//!
//! Capability-string shaping lives here too: operations that accept an
//! `additional` flag each map `true` to a fixed comma-separated field list.
//! Centralizing the lists keeps list, search and share enumeration from
//! silently diverging.

use std::str::FromStr;

use crate::error::Error;
use crate::http::HttpMethod;

/// Namespace prefix shared by every API of the service.
pub const API_NAMESPACE: &str = "SYNO";

/// The service family all catalog rows belong to.
pub const SERVICE_NAME: &str = "FileStation";

/// Extra fields returned for list, search and create-folder results when
/// `additional` is requested.
const LIST_CAPABILITIES: &str = "real_path,size,owner,time,perm";

/// Extra fields returned for share enumeration when `additional` is
/// requested.
const SHARE_CAPABILITIES: &str = "real_path,owner,time,perm,volume_status";

/// Which routing branch `getinfo` on an object takes.
///
/// The two kinds route to different CGI paths for the same logical
/// operation; the table below preserves the upstream routing exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    List,
    Sharing,
}

impl FromStr for ObjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "List" => Ok(ObjectKind::List),
            "Sharing" => Ok(ObjectKind::Sharing),
            other => Err(Error::InvalidOperation(format!(
                "unknown \"{other}\" object kind"
            ))),
        }
    }
}

/// The fixed wire identity of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Logical API name; qualified on the wire as
    /// `SYNO.FileStation.<api>`.
    pub api: &'static str,
    /// Server-side endpoint the operation is routed to, under `/webapi/`.
    pub path: &'static str,
    pub method: &'static str,
    /// API version pinned by the operation; `None` means the client's
    /// default version applies.
    pub version: Option<u32>,
    pub verb: HttpMethod,
}

/// Every remote call the client supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Info,
    ListShares,
    ObjectInfo(ObjectKind),
    List,
    /// Same endpoint and method as [`Operation::List`]; kept as a separate
    /// entry point because the upstream client exposes it separately and the
    /// service may distinguish them server-side.
    Search,
    Upload,
    Download,
    Delete,
    CreateFolder,
}

impl Operation {
    pub fn descriptor(&self) -> Descriptor {
        match self {
            Operation::Info => Descriptor {
                api: "Info",
                path: "FileStation/info.cgi",
                method: "getinfo",
                version: None,
                verb: HttpMethod::Get,
            },
            Operation::ListShares => Descriptor {
                api: "List",
                path: "entry.cgi",
                method: "list_share",
                version: None,
                verb: HttpMethod::Get,
            },
            Operation::ObjectInfo(ObjectKind::List) => Descriptor {
                api: "List",
                path: "entry.cgi",
                method: "getinfo",
                version: None,
                verb: HttpMethod::Get,
            },
            Operation::ObjectInfo(ObjectKind::Sharing) => Descriptor {
                api: "Sharing",
                path: "FileStation/file_sharing.cgi",
                method: "getinfo",
                version: None,
                verb: HttpMethod::Get,
            },
            Operation::List | Operation::Search => Descriptor {
                api: "List",
                path: "entry.cgi",
                method: "list",
                version: Some(1),
                verb: HttpMethod::Get,
            },
            Operation::Upload => Descriptor {
                api: "Upload",
                path: "entry.cgi",
                method: "upload",
                version: Some(2),
                verb: HttpMethod::Post,
            },
            Operation::Download => Descriptor {
                api: "Download",
                path: "entry.cgi",
                method: "download",
                version: Some(2),
                verb: HttpMethod::Get,
            },
            Operation::Delete => Descriptor {
                api: "Delete",
                path: "entry.cgi",
                method: "delete",
                version: Some(1),
                verb: HttpMethod::Post,
            },
            Operation::CreateFolder => Descriptor {
                api: "CreateFolder",
                path: "entry.cgi",
                method: "create",
                version: Some(1),
                verb: HttpMethod::Post,
            },
        }
    }

    /// Fully-qualified `api` field value for the wire.
    pub fn qualified_api(&self) -> String {
        format!("{API_NAMESPACE}.{SERVICE_NAME}.{}", self.descriptor().api)
    }

    /// The capability string an `additional=true` flag expands to, for
    /// operations that accept one.
    pub fn capability_fields(&self) -> Option<&'static str> {
        match self {
            Operation::List | Operation::Search | Operation::CreateFolder => {
                Some(LIST_CAPABILITIES)
            }
            Operation::ListShares => Some(SHARE_CAPABILITIES),
            _ => None,
        }
    }

    /// Serialize the `additional` flag for the wire: the operation's
    /// capability string when requested, the empty string otherwise (meaning
    /// "omit extra fields"). A literal boolean never reaches the wire here.
    pub fn shape_additional(&self, additional: bool) -> &'static str {
        if additional {
            self.capability_fields().unwrap_or("")
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_kind_parses_known_values() {
        assert_eq!("List".parse::<ObjectKind>().unwrap(), ObjectKind::List);
        assert_eq!(
            "Sharing".parse::<ObjectKind>().unwrap(),
            ObjectKind::Sharing
        );
    }

    #[test]
    fn object_kind_rejects_unknown_values() {
        let err = "Bogus".parse::<ObjectKind>().unwrap_err();
        assert!(matches!(err, Error::InvalidOperation(_)));
    }

    #[test]
    fn search_reuses_list_descriptor() {
        assert_eq!(Operation::Search.descriptor(), Operation::List.descriptor());
    }

    #[test]
    fn object_info_kinds_route_to_distinct_paths() {
        let list = Operation::ObjectInfo(ObjectKind::List).descriptor();
        let sharing = Operation::ObjectInfo(ObjectKind::Sharing).descriptor();
        assert_eq!(list.path, "entry.cgi");
        assert_eq!(sharing.path, "FileStation/file_sharing.cgi");
        assert_eq!(list.method, sharing.method);
    }

    #[test]
    fn upload_and_download_pin_version_two() {
        assert_eq!(Operation::Upload.descriptor().version, Some(2));
        assert_eq!(Operation::Download.descriptor().version, Some(2));
    }

    #[test]
    fn info_shares_and_object_info_use_client_default_version() {
        assert_eq!(Operation::Info.descriptor().version, None);
        assert_eq!(Operation::ListShares.descriptor().version, None);
        assert_eq!(Operation::ObjectInfo(ObjectKind::List).descriptor().version, None);
        assert_eq!(
            Operation::ObjectInfo(ObjectKind::Sharing).descriptor().version,
            None
        );
    }

    #[test]
    fn qualified_api_carries_namespace_and_service() {
        assert_eq!(Operation::List.qualified_api(), "SYNO.FileStation.List");
        assert_eq!(
            Operation::ObjectInfo(ObjectKind::Sharing).qualified_api(),
            "SYNO.FileStation.Sharing"
        );
    }

    #[test]
    fn capability_strings_differ_between_list_and_shares() {
        assert_eq!(
            Operation::List.shape_additional(true),
            "real_path,size,owner,time,perm"
        );
        assert_eq!(
            Operation::ListShares.shape_additional(true),
            "real_path,owner,time,perm,volume_status"
        );
        assert_eq!(Operation::List.shape_additional(false), "");
        assert_eq!(Operation::Delete.shape_additional(true), "");
    }
}
