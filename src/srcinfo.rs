//! Reporting the checksum and url of source distributions

use pipinfo::{PipData, PypiRelease};
use std::convert::Infallible;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use tracing::debug;

/// Which releases `srcinfo` reports
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum VersionSelector {
    /// The highest version
    Latest,
    /// Every version with a source distribution
    All,
    Exact(String),
}

impl FromStr for VersionSelector {
    type Err = Infallible;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        Ok(match selector {
            "latest" => VersionSelector::Latest,
            "all" => VersionSelector::All,
            version => VersionSelector::Exact(version.to_string()),
        })
    }
}

/// One reported source distribution
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SourceInfo {
    pub name: String,
    pub version: String,
    pub sha256: String,
    pub url: String,
}

impl SourceInfo {
    /// `None` if the file has no sha256 digest
    fn from_release(name: &str, version: &str, release: &PypiRelease) -> Option<Self> {
        Some(Self {
            name: name.to_string(),
            version: version.to_string(),
            sha256: release.digests.sha256.clone()?,
            url: release.url.clone(),
        })
    }
}

/// `<name> <version> sha256 <hexdigest> <url>`
impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} sha256 {} {}",
            self.name, self.version, self.sha256, self.url
        )
    }
}

/// Selects the source distributions to report. Fails with
/// [`pipinfo::Error::NoVersionInfo`] if a single requested version has no source distribution,
/// while [`VersionSelector::All`] silently skips those versions.
pub fn select_source_infos(
    pip_data: &PipData,
    selector: &VersionSelector,
) -> Result<Vec<SourceInfo>, pipinfo::Error> {
    let name = pip_data.name();
    let single = |version: &str| -> Result<Vec<SourceInfo>, pipinfo::Error> {
        let (version, release) = pip_data.required_source_data(version)?;
        Ok(SourceInfo::from_release(name, version, release).into_iter().collect())
    };
    match selector {
        VersionSelector::Exact(version) => single(version),
        VersionSelector::Latest => {
            let latest = pip_data
                .latest_version()
                .ok_or_else(|| pipinfo::Error::NoVersionInfo {
                    name: name.to_string(),
                    version: "latest".to_string(),
                })?;
            debug!("Latest version of {} is {}", name, latest);
            single(latest)
        }
        VersionSelector::All => Ok(pip_data
            .source_releases()
            .filter_map(|(version, release)| SourceInfo::from_release(name, version, release))
            .collect()),
    }
}

/// Fetches the metadata of `name` from the index and writes one line per selected source
/// distribution to `out`. Nothing is written if the lookup fails.
pub fn srcinfo(
    index_url: &str,
    name: &str,
    selector: &VersionSelector,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let pip_data = pipinfo::pip_data(index_url, name)?;
    for source_info in select_source_infos(&pip_data, selector)? {
        writeln!(out, "{}", source_info)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::srcinfo::{select_source_infos, SourceInfo, VersionSelector};
    use pipinfo::{PipData, PypiProject};
    use serde_json::json;

    fn file(version: &str, packagetype: &str) -> serde_json::Value {
        let filename = if packagetype == "sdist" {
            format!("demo-{}.tar.gz", version)
        } else {
            format!("demo-{}-py3-none-any.whl", version)
        };
        json!({
            "filename": filename,
            "packagetype": packagetype,
            "url": format!("https://files.example.org/{}", filename),
            "digests": {"sha256": format!("{}-{}", packagetype, version)}
        })
    }

    fn demo() -> PipData {
        let project: PypiProject = serde_json::from_value(json!({"releases": {
            "0.9": [file("0.9", "sdist")],
            "1.0": [file("1.0", "bdist_wheel"), file("1.0", "sdist")],
            "1.1": [file("1.1", "bdist_wheel")],
        }}))
        .unwrap();
        PipData::new("demo", project)
    }

    #[test]
    fn test_selector_parsing() {
        let parse = |selector: &str| selector.parse::<VersionSelector>().unwrap();
        assert_eq!(parse("latest"), VersionSelector::Latest);
        assert_eq!(parse("all"), VersionSelector::All);
        assert_eq!(parse("1.0"), VersionSelector::Exact("1.0".to_string()));
    }

    #[test]
    fn test_line_format() {
        let source_info = SourceInfo {
            name: "demo".to_string(),
            version: "1.0".to_string(),
            sha256: "abcdef".to_string(),
            url: "https://files.example.org/demo-1.0.tar.gz".to_string(),
        };
        assert_eq!(
            source_info.to_string(),
            "demo 1.0 sha256 abcdef https://files.example.org/demo-1.0.tar.gz"
        );
    }

    #[test]
    fn test_exact() {
        let infos =
            select_source_infos(&demo(), &VersionSelector::Exact("1.0".to_string())).unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].sha256, "sdist-1.0");
        assert_eq!(infos[0].url, "https://files.example.org/demo-1.0.tar.gz");
    }

    #[test]
    fn test_all_skips_wheel_only_releases() {
        let versions: Vec<String> = select_source_infos(&demo(), &VersionSelector::All)
            .unwrap()
            .into_iter()
            .map(|info| info.version)
            .collect();
        assert_eq!(versions, ["1.0", "0.9"]);
    }

    #[test]
    fn test_latest_without_sdist() {
        let err = select_source_infos(&demo(), &VersionSelector::Latest).unwrap_err();
        assert_eq!(err.to_string(), "No version information for demo 1.1");
        assert_eq!(err.exit_code(), 15);
    }

    #[test]
    fn test_latest_without_releases() {
        let project: PypiProject = serde_json::from_value(json!({"releases": {}})).unwrap();
        let err = select_source_infos(&PipData::new("empty", project), &VersionSelector::Latest)
            .unwrap_err();
        assert_eq!(err.to_string(), "No version information for empty latest");
    }
}
