//! Output formatting and persistence for summary replies.
//!
//! Supports pretty-printing, JSON logging, and writing JSON files.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::worker::SummaryReply;

/// Logs a reply using Rust's debug pretty-print format.
pub fn print_pretty(reply: &SummaryReply) {
    debug!("{:#?}", reply);
}

/// Logs a reply as pretty-printed JSON.
pub fn print_json(reply: &SummaryReply) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(reply)?);
    Ok(())
}

/// Writes a [`SummaryReply`] as JSON to `path`, replacing any existing file.
///
/// Creates missing parent directories.
pub fn write_json(path: &str, reply: &SummaryReply) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let body = serde_json::to_vec(reply)?;
    fs::write(path, body).with_context(|| format!("writing {path}"))?;
    debug!(path, sites = reply.sites.len(), "Summary written");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::types::SiteIndex;
    use std::env;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&SummaryReply::failure("nothing"));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&SummaryReply::success(None, None, SiteIndex::new())).unwrap();
    }

    #[test]
    fn test_write_json_creates_parent_dirs() {
        let dir = temp_path("por_summary_test_out");
        let _ = fs::remove_dir_all(&dir);
        let path = format!("{dir}/nested/summary.json");

        write_json(&path, &SummaryReply::success(None, None, SiteIndex::new())).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            r#"{"status":"success","minYear":null,"maxYear":null,"sites":{}}"#
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_json_overwrites() {
        let path = temp_path("por_summary_test_overwrite.json");
        let _ = fs::remove_file(&path);

        write_json(&path, &SummaryReply::failure("first")).unwrap();
        write_json(&path, &SummaryReply::success(None, None, SiteIndex::new())).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(r#"{"status":"success""#));

        fs::remove_file(&path).unwrap();
    }
}
