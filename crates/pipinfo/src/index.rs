//! Fetching project metadata from a pypi style json api

use crate::{Error, PipData, PypiProject};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi";

/// Names that would leave the `/{name}/json` path segment. Anything else goes to the index, which
/// answers unknown names with a 404
static UNSAFE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^$|^\.{1,2}$|[/\\?#%\s]").unwrap());

/// Fetches `{index_url}/{name}/json`, e.g. https://pypi.org/pypi/tqdm/json
///
/// https://warehouse.pypa.io/api-reference/json.html
pub fn pip_data(index_url: &str, name: &str) -> Result<PipData, Error> {
    if UNSAFE_NAME.is_match(name) {
        return Err(Error::InvalidName(name.to_string()));
    }
    let url = format!("{}/{}/json", index_url.trim_end_matches('/'), name);
    debug!("Getting releases from {}", url);
    let project: PypiProject = ureq::get(&url)
        .set("Accept", "application/json")
        .set(
            "User-Agent",
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
        )
        .call()
        .map_err(|err| Error::Retrieval {
            name: name.to_string(),
            source: Box::new(err),
        })?
        .into_json()
        .map_err(|err| Error::InvalidResponse {
            name: name.to_string(),
            source: err,
        })?;
    Ok(PipData::new(name, project))
}
