use std::path::{Path, PathBuf};

use tracing::warn;

/// Failures while locating the CSV resource of a package.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("resource not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("resource is not a CSV file: {}", .0.display())]
    NotCsv(PathBuf),

    #[error("no CSV resource in package {}", .0.display())]
    NoCsvResource(PathBuf),

    #[error("cannot list package {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn has_csv_suffix(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Accept `path` only if it names an existing `.csv` file.
pub fn csv_resource_path(path: &Path) -> Result<PathBuf, DiscoveryError> {
    if !path.is_file() {
        warn!(path = %path.display(), "resource not found");
        return Err(DiscoveryError::NotFound(path.to_path_buf()));
    }
    if !has_csv_suffix(path) {
        warn!(path = %path.display(), "resource is not a CSV file");
        return Err(DiscoveryError::NotCsv(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

/// List the `.csv` files directly inside a package directory, sorted by name.
pub fn find_csv_resources(package_dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let io_error = |source| DiscoveryError::Io {
        path: package_dir.to_path_buf(),
        source,
    };

    let mut resources = Vec::new();
    for entry in std::fs::read_dir(package_dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && has_csv_suffix(&path) {
            resources.push(path);
        }
    }
    resources.sort();
    Ok(resources)
}

/// Pick the CSV resource to extract from a package.
///
/// A `preferred` file name wins. Otherwise the first resource by name is
/// used, with a warning when the package holds more than one.
pub fn select_csv_resource(
    package_dir: &Path,
    preferred: Option<&str>,
) -> Result<PathBuf, DiscoveryError> {
    if let Some(name) = preferred {
        return csv_resource_path(&package_dir.join(name));
    }

    let mut resources = find_csv_resources(package_dir)?;
    if resources.len() > 1 {
        warn!(
            package = %package_dir.display(),
            count = resources.len(),
            chosen = %resources[0].display(),
            "several CSV resources found, using the first"
        );
    }
    if resources.is_empty() {
        return Err(DiscoveryError::NoCsvResource(package_dir.to_path_buf()));
    }
    Ok(resources.swap_remove(0))
}

/// Resolve a user-supplied path: a CSV file is used directly, a directory is
/// treated as a package and searched.
pub fn resolve_csv_path(path: &Path, preferred: Option<&str>) -> Result<PathBuf, DiscoveryError> {
    if path.is_dir() {
        select_csv_resource(path, preferred)
    } else {
        csv_resource_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn package(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in files {
            std::fs::write(dir.path().join(name), "name,color\n").unwrap();
        }
        dir
    }

    #[test]
    fn csv_path_is_accepted() {
        let dir = package(&["colors.csv"]);
        let path = dir.path().join("colors.csv");
        assert_eq!(csv_resource_path(&path).unwrap(), path);
    }

    #[test]
    fn uppercase_suffix_is_accepted() {
        let dir = package(&["COLORS.CSV"]);
        assert!(csv_resource_path(&dir.path().join("COLORS.CSV")).is_ok());
    }

    #[test]
    fn non_csv_is_rejected() {
        let dir = package(&["colors.txt"]);
        let err = csv_resource_path(&dir.path().join("colors.txt")).unwrap_err();
        assert!(matches!(err, DiscoveryError::NotCsv(_)));
    }

    #[test]
    fn missing_resource_is_rejected() {
        let err = csv_resource_path(Path::new("/nonexistent/colors.csv")).unwrap_err();
        assert!(matches!(err, DiscoveryError::NotFound(_)));
    }

    #[test]
    fn finds_only_csv_files_sorted() {
        let dir = package(&["b.csv", "notes.md", "a.csv", "graph.sbs"]);
        let found = find_csv_resources(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.csv", "b.csv"]);
    }

    #[test]
    fn first_resource_wins_when_ambiguous() {
        let dir = package(&["zeta.csv", "alpha.csv"]);
        let chosen = select_csv_resource(dir.path(), None).unwrap();
        assert_eq!(chosen, dir.path().join("alpha.csv"));
    }

    #[test]
    fn preferred_resource_overrides_order() {
        let dir = package(&["zeta.csv", "alpha.csv"]);
        let chosen = select_csv_resource(dir.path(), Some("zeta.csv")).unwrap();
        assert_eq!(chosen, dir.path().join("zeta.csv"));
    }

    #[test]
    fn empty_package_has_no_resource() {
        let dir = package(&["readme.txt"]);
        let err = select_csv_resource(dir.path(), None).unwrap_err();
        assert!(matches!(err, DiscoveryError::NoCsvResource(_)));
    }

    #[test]
    fn resolve_handles_files_and_directories() {
        let dir = package(&["palette.csv"]);
        let expected = dir.path().join("palette.csv");
        assert_eq!(resolve_csv_path(dir.path(), None).unwrap(), expected);
        assert_eq!(resolve_csv_path(&expected, None).unwrap(), expected);
    }
}
