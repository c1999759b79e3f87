// src/migrate/links.rs

//! Embed links for legacy and migrated activities
//!
//! The two formats address content differently and must not be unified:
//! legacy embeds name the course module, new embeds name the package file.

use crate::db::models::FileCoordinates;
use url::Url;

/// Builds site-relative embed links from the site root URL
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    site: Url,
}

impl LinkBuilder {
    pub fn new(site: Url) -> Self {
        Self { site }
    }

    /// Path of the site root without a trailing slash ("" at the domain root)
    fn path_prefix(&self) -> &str {
        self.site.path().trim_end_matches('/')
    }

    /// Legacy embed link, e.g. `/mod/hvp/embed.php?id=42`
    pub fn legacy_embed(&self, cmid: i64) -> String {
        format!("{}/mod/hvp/embed.php?id={}", self.path_prefix(), cmid)
    }

    /// Absolute URL of a stored file
    pub fn pluginfile_url(&self, file: &FileCoordinates) -> String {
        format!(
            "{}/pluginfile.php/{}/{}/{}/{}{}{}",
            self.site.as_str().trim_end_matches('/'),
            file.context_id,
            file.component,
            file.file_area,
            file.item_id,
            file.file_path,
            file.file_name
        )
    }

    /// New-format embed link; the package URL is percent-encoded into the query
    pub fn package_embed(&self, file: &FileCoordinates) -> String {
        format!(
            "{}/h5p/embed.php?url={}",
            self.path_prefix(),
            urlencoding::encode(&self.pluginfile_url(file))
        )
    }
}
