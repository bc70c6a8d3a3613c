//! `devkit clean`: remove build outputs and the install directory.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, instrument};

use crate::io::fs::remove_if_exists;
use crate::io::paths::ProjectPaths;

/// Paths removed by a clean; skipped ones were already absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub removed: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Remove the library build dir, the dev build dir, and the install dir.
#[instrument(skip_all)]
pub fn clean(paths: &ProjectPaths) -> Result<CleanReport> {
    let steps = [
        ("build", &paths.build_dir),
        ("dev build", &paths.dev_build_dir),
        ("lib", &paths.install_dir),
    ];
    let mut report = CleanReport::default();
    for (label, path) in steps {
        println!("clean: {label}");
        if remove_if_exists(path)? {
            report.removed.push(path.clone());
        } else {
            debug!(path = %path.display(), "nothing to clean");
            report.skipped.push(path.clone());
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestProject;

    #[test]
    fn removes_existing_and_skips_missing() {
        let test = TestProject::new().expect("project");
        test.write("build/build.ninja", "").expect("write");
        test.write("lib/lib/libremi.so", "").expect("write");
        test.write("dev/src/Application.cpp", "").expect("write");
        let project = test.project();

        let report = clean(&project.paths).expect("clean");

        assert_eq!(
            report.removed,
            vec![project.paths.build_dir.clone(), project.paths.install_dir.clone()]
        );
        assert_eq!(report.skipped, vec![project.paths.dev_build_dir.clone()]);
        assert!(!test.path("build").exists());
        assert!(!test.path("lib").exists());
        assert!(test.path("dev/src/Application.cpp").exists());
    }

    #[test]
    fn clean_is_repeatable() {
        let test = TestProject::new().expect("project");
        let project = test.project();
        clean(&project.paths).expect("first");
        let report = clean(&project.paths).expect("second");
        assert!(report.removed.is_empty());
        assert_eq!(report.skipped.len(), 3);
    }
}
