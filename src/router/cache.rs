//! On-disk route cache.
//!
//! The cache stores the registered [`RouteSpec`]s as JSON. When the file exists
//! the definition callback is skipped and the table is rebuilt from the cached
//! specs; otherwise the callback runs and its result is written out.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::error::RouteDefinitionError;
use super::table::{RouteSpec, RouteTable};

/// Bumped whenever the cached layout changes; stale files are rebuilt.
pub const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    routes: Vec<RouteSpec>,
}

/// Fail unless the directory that will hold `path` exists and is writable.
///
/// # Errors
///
/// [`RouteDefinitionError::CacheNotWritable`] otherwise.
pub fn ensure_writable(path: &Path) -> Result<(), RouteDefinitionError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let writable = fs::metadata(&dir)
        .map(|meta| meta.is_dir() && !meta.permissions().readonly())
        .unwrap_or(false);
    if writable {
        Ok(())
    } else {
        Err(RouteDefinitionError::CacheNotWritable(path.to_path_buf()))
    }
}

/// Load the table from `path` if present, else build it with `define` and store it.
///
/// # Errors
///
/// Propagates definition errors and cache I/O or format failures.
pub fn load_or_build<F>(path: &Path, define: F) -> Result<RouteTable, RouteDefinitionError>
where
    F: FnOnce() -> Result<RouteTable, RouteDefinitionError>,
{
    ensure_writable(path)?;

    if let Some(table) = load(path)? {
        info!(
            cache_file = %path.display(),
            routes_count = table.len(),
            "Route table loaded from cache"
        );
        return Ok(table);
    }

    let table = define()?;
    store(path, &table)?;
    info!(
        cache_file = %path.display(),
        routes_count = table.len(),
        "Route cache written"
    );
    Ok(table)
}

/// Read a cache file. A missing file or an outdated version yields `None`.
///
/// # Errors
///
/// I/O failures other than "not found", malformed JSON, or cached routes that
/// no longer register cleanly.
pub fn load(path: &Path) -> Result<Option<RouteTable>, RouteDefinitionError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(RouteDefinitionError::CacheIo {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let cached: CacheFile =
        serde_json::from_str(&raw).map_err(|source| RouteDefinitionError::CacheFormat {
            path: path.to_path_buf(),
            source,
        })?;
    if cached.version != CACHE_FORMAT_VERSION {
        debug!(
            cache_file = %path.display(),
            found = cached.version,
            expected = CACHE_FORMAT_VERSION,
            "Ignoring route cache with different format version"
        );
        return Ok(None);
    }

    let mut table = RouteTable::new();
    for spec in cached.routes {
        let method = http::Method::from_bytes(spec.method.as_bytes())
            .map_err(|_| RouteDefinitionError::InvalidMethod(spec.method.clone()))?;
        table.add(method, &spec.pattern, &spec.handler)?;
    }
    Ok(Some(table))
}

/// Write `table` to `path` as JSON.
///
/// # Errors
///
/// Serialization or I/O failures.
pub fn store(path: &Path, table: &RouteTable) -> Result<(), RouteDefinitionError> {
    let cached = CacheFile {
        version: CACHE_FORMAT_VERSION,
        routes: table.routes().to_vec(),
    };
    let json =
        serde_json::to_string_pretty(&cached).map_err(|source| RouteDefinitionError::CacheFormat {
            path: path.to_path_buf(),
            source,
        })?;
    fs::write(path, json).map_err(|source| RouteDefinitionError::CacheIo {
        path: path.to_path_buf(),
        source,
    })
}
