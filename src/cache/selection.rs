//! Choosing the authoritative snapshot out of a cache directory listing

use super::CacheFileName;

/// How the current snapshot is picked from the cache directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Last recognized entry in directory-listing order.
    ///
    /// Listing order is platform dependent, so this is not necessarily the
    /// most recent snapshot.
    #[default]
    Listing,
    /// Snapshot with the greatest embedded timestamp
    Newest,
    /// Snapshot recorded in the manifest sidecar, else [`SelectionPolicy::Newest`]
    Manifest,
}

impl SelectionPolicy {
    /// All policies, in the order they are listed to users
    pub const ALL: [SelectionPolicy; 3] = [
        SelectionPolicy::Listing,
        SelectionPolicy::Newest,
        SelectionPolicy::Manifest,
    ];

    /// Parses a policy name as accepted on the command line
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "listing" | "list" => Some(SelectionPolicy::Listing),
            "newest" | "latest" => Some(SelectionPolicy::Newest),
            "manifest" => Some(SelectionPolicy::Manifest),
            _ => None,
        }
    }

    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            SelectionPolicy::Listing => "listing",
            SelectionPolicy::Newest => "newest",
            SelectionPolicy::Manifest => "manifest",
        }
    }
}

/// Picks the current snapshot from `listing` (in directory-listing order).
///
/// `manifest_hint` is the file name recorded in the manifest; it is only
/// consulted by [`SelectionPolicy::Manifest`] and ignored if the listing no
/// longer contains that file.
pub fn select<'a>(
    listing: &'a [CacheFileName],
    policy: SelectionPolicy,
    manifest_hint: Option<&str>,
) -> Option<&'a CacheFileName> {
    match policy {
        SelectionPolicy::Listing => listing.last(),
        SelectionPolicy::Newest => newest(listing),
        SelectionPolicy::Manifest => manifest_hint
            .and_then(|hint| listing.iter().find(|file| file.as_str() == hint))
            .or_else(|| newest(listing)),
    }
}

fn newest(listing: &[CacheFileName]) -> Option<&CacheFileName> {
    listing.iter().max_by_key(|file| file.timestamp())
}
