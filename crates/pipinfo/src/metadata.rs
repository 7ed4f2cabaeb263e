//! The subset of the pypi json api we read, and the version bookkeeping on top of it

use crate::Error;
use pep440_rs::Version;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

/// https://warehouse.pypa.io/api-reference/json.html#get--pypi--project_name--json
#[derive(Deserialize, Clone, Debug)]
pub struct PypiProject {
    pub releases: HashMap<String, Vec<PypiRelease>>,
}

/// One file of a release
///
/// https://warehouse.pypa.io/api-reference/json.html#get--pypi--project_name--json
#[derive(Deserialize, Clone, Debug)]
pub struct PypiRelease {
    pub filename: String,
    pub packagetype: PackageType,
    pub python_version: Option<String>,
    pub size: Option<u64>,
    pub url: String,
    #[serde(default)]
    pub digests: Digests,
    #[serde(default)]
    pub yanked: bool,
    pub upload_time_iso_8601: Option<String>,
}

impl PypiRelease {
    /// A source distribution we can report, i.e. one with a sha256 digest
    pub fn is_source(&self) -> bool {
        self.packagetype == PackageType::Sdist && self.digests.sha256.is_some()
    }
}

#[derive(Deserialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct Digests {
    pub sha256: Option<String>,
    pub md5: Option<String>,
}

/// https://github.com/pypa/warehouse/blob/4d4c7940063db51e8ee03de78afdff6d4e9140ae/warehouse/filters.py#L33-L41
#[derive(Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    BdistDmg,
    BdistDumb,
    BdistEgg,
    BdistMsi,
    BdistRpm,
    BdistWheel,
    BdistWininst,
    Sdist,
    #[serde(other)]
    Unknown,
}

/// The releases of one project with the versions sorted highest first
#[derive(Clone, Debug)]
pub struct PipData {
    name: String,
    releases: HashMap<String, Vec<PypiRelease>>,
    versions: Vec<String>,
}

impl PipData {
    pub fn new(name: impl Into<String>, project: PypiProject) -> Self {
        let mut keyed: Vec<(Option<Version>, &String)> = project
            .releases
            .keys()
            .map(|key| (Version::from_str(key).ok(), key))
            .collect();
        // Legacy versions that aren't PEP 440 go last
        keyed.sort_by(|(a_version, a_key), (b_version, b_key)| {
            match (a_version, b_version) {
                (Some(a), Some(b)) => b.cmp(a).then_with(|| b_key.cmp(a_key)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => b_key.cmp(a_key),
            }
        });
        let versions = keyed.into_iter().map(|(_, key)| key.clone()).collect();
        Self {
            name: name.into(),
            releases: project.releases,
            versions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All release versions, highest first
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// The highest version, pre-releases included. `None` if the project has no releases
    pub fn latest_version(&self) -> Option<&str> {
        self.versions.first().map(String::as_str)
    }

    /// Returns the release key matching `version`, either literally or as an equal PEP 440
    /// version (`1.0` matches `1.0.0`)
    pub fn resolve_version(&self, version: &str) -> Option<&str> {
        if let Some((key, _)) = self.releases.get_key_value(version) {
            return Some(key.as_str());
        }
        let requested = Version::from_str(version).ok()?;
        self.versions
            .iter()
            .find(|key| {
                Version::from_str(key)
                    .map(|candidate| candidate.cmp(&requested) == Ordering::Equal)
                    .unwrap_or(false)
            })
            .map(String::as_str)
    }

    /// All files of one release
    pub fn release(&self, version: &str) -> Result<&[PypiRelease], Error> {
        self.resolve_version(version)
            .and_then(|key| self.releases.get(key))
            .map(Vec::as_slice)
            .ok_or_else(|| self.no_version_info(version))
    }

    /// The source distribution of a release, `None` if the release only has other files
    pub fn release_source_data(&self, version: &str) -> Result<Option<&PypiRelease>, Error> {
        Ok(self.release(version)?.iter().find(|file| file.is_source()))
    }

    /// Like [`Self::release_source_data`], but a missing source distribution is an error
    pub fn required_source_data(&self, version: &str) -> Result<(&str, &PypiRelease), Error> {
        let key = self
            .resolve_version(version)
            .ok_or_else(|| self.no_version_info(version))?;
        let source = self
            .release_source_data(key)?
            .ok_or_else(|| self.no_version_info(version))?;
        Ok((key, source))
    }

    /// The source distribution of every version that has one, highest version first
    pub fn source_releases(&self) -> impl Iterator<Item = (&str, &PypiRelease)> {
        self.versions.iter().filter_map(|version| {
            let source = self.releases.get(version)?.iter().find(|file| file.is_source());
            if source.is_none() {
                debug!("No source distribution for {} {}", self.name, version);
            }
            Some((version.as_str(), source?))
        })
    }

    fn no_version_info(&self, version: &str) -> Error {
        Error::NoVersionInfo {
            name: self.name.clone(),
            version: version.to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{Error, PackageType, PipData, PypiProject};
    use serde_json::json;

    fn sdist(filename: &str) -> serde_json::Value {
        json!({
            "filename": filename,
            "packagetype": "sdist",
            "python_version": "source",
            "size": 1234,
            "url": format!("https://files.example.org/{}", filename),
            "digests": {"sha256": format!("sha-{}", filename), "md5": "0000"},
            "yanked": false,
            "upload_time_iso_8601": "2022-03-01T12:00:00.000000Z"
        })
    }

    fn wheel(filename: &str) -> serde_json::Value {
        json!({
            "filename": filename,
            "packagetype": "bdist_wheel",
            "python_version": "py3",
            "url": format!("https://files.example.org/{}", filename),
            "digests": {"sha256": "ffff"}
        })
    }

    fn demo() -> PipData {
        let project: PypiProject = serde_json::from_value(json!({
            "info": {"name": "demo"},
            "releases": {
                "1.9.0": [wheel("demo-1.9.0-py3-none-any.whl"), sdist("demo-1.9.0.tar.gz")],
                "1.10.0": [sdist("demo-1.10.0.tar.gz")],
                "2.0.0rc1": [wheel("demo-2.0.0rc1-py3-none-any.whl")],
                "2.0.0": [sdist("demo-2.0.0.tar.gz")],
                "not.a.version": [sdist("demo-legacy.tar.gz")],
                "0.1": []
            }
        }))
        .unwrap();
        PipData::new("demo", project)
    }

    #[test]
    fn test_versions_highest_first() {
        let pip_data = demo();
        assert_eq!(
            pip_data.versions(),
            ["2.0.0", "2.0.0rc1", "1.10.0", "1.9.0", "0.1", "not.a.version"]
        );
        assert_eq!(pip_data.latest_version(), Some("2.0.0"));
    }

    #[test]
    fn test_source_data_skips_wheels() {
        let pip_data = demo();
        let source = pip_data.release_source_data("1.9.0").unwrap().unwrap();
        assert_eq!(source.filename, "demo-1.9.0.tar.gz");
        assert_eq!(source.packagetype, PackageType::Sdist);
        assert_eq!(source.digests.sha256.as_deref(), Some("sha-demo-1.9.0.tar.gz"));
        assert!(pip_data.release_source_data("2.0.0rc1").unwrap().is_none());
    }

    #[test]
    fn test_missing_release() {
        let err = demo().release("3.0.0").unwrap_err();
        assert!(matches!(err, Error::NoVersionInfo { .. }));
        assert_eq!(err.to_string(), "No version information for demo 3.0.0");
        assert_eq!(err.exit_code(), 15);
    }

    #[test]
    fn test_required_source_data_without_sdist() {
        let err = demo().required_source_data("2.0.0rc1").unwrap_err();
        assert_eq!(err.to_string(), "No version information for demo 2.0.0rc1");
    }

    #[test]
    fn test_pep440_equal_version() {
        let pip_data = demo();
        assert_eq!(pip_data.resolve_version("2.0"), Some("2.0.0"));
        let (version, source) = pip_data.required_source_data("1.10").unwrap();
        assert_eq!(version, "1.10.0");
        assert_eq!(source.url, "https://files.example.org/demo-1.10.0.tar.gz");
    }

    #[test]
    fn test_source_releases() {
        let pip_data = demo();
        let versions: Vec<&str> = pip_data
            .source_releases()
            .map(|(version, _)| version)
            .collect();
        assert_eq!(versions, ["2.0.0", "1.10.0", "1.9.0", "not.a.version"]);
    }

    #[test]
    fn test_unknown_package_type() {
        let project: PypiProject = serde_json::from_value(json!({
            "releases": {"1.0": [{
                "filename": "demo-1.0.zip",
                "packagetype": "bdist_something_new",
                "url": "https://files.example.org/demo-1.0.zip"
            }]}
        }))
        .unwrap();
        let pip_data = PipData::new("demo", project);
        assert_eq!(pip_data.release("1.0").unwrap()[0].packagetype, PackageType::Unknown);
        assert!(pip_data.release_source_data("1.0").unwrap().is_none());
    }
}
