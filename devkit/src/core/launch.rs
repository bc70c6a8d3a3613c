//! Deciding how a freshly built artifact is run.

use std::path::{Path, PathBuf};

/// Page a web build is served as.
pub const INDEX_PAGE: &str = "index.html";

/// What to do with a build directory after compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    /// Emscripten output: rename `page` to `index.html` and serve `dir`.
    Web { dir: PathBuf, page: PathBuf },
    /// Run `executable` with `dir` as working directory.
    Native { dir: PathBuf, executable: PathBuf },
}

/// Resolve the launch for artifact `stem` in `dir`.
///
/// `<stem>.html` wins over `<stem>.exe`, which wins over a bare `<stem>`.
/// `exists` is injected so the decision stays testable without a filesystem.
pub fn resolve_launch(dir: &Path, stem: &str, exists: impl Fn(&Path) -> bool) -> Launch {
    let page = dir.join(format!("{stem}.html"));
    if exists(&page) {
        return Launch::Web {
            dir: dir.to_path_buf(),
            page,
        };
    }
    let exe = dir.join(format!("{stem}.exe"));
    let executable = if exists(&exe) { exe } else { dir.join(stem) };
    Launch::Native {
        dir: dir.to_path_buf(),
        executable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(paths: &[&str]) -> impl Fn(&Path) -> bool {
        let owned: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
        move |path: &Path| owned.iter().any(|p| p == path)
    }

    #[test]
    fn html_means_web_build() {
        let launch = resolve_launch(
            Path::new("/b"),
            "dev",
            only(&["/b/dev.html", "/b/dev.exe"]),
        );
        assert_eq!(
            launch,
            Launch::Web {
                dir: PathBuf::from("/b"),
                page: PathBuf::from("/b/dev.html"),
            }
        );
    }

    #[test]
    fn exe_preferred_over_bare_binary() {
        let launch = resolve_launch(Path::new("/b"), "example", only(&["/b/example.exe"]));
        assert_eq!(
            launch,
            Launch::Native {
                dir: PathBuf::from("/b"),
                executable: PathBuf::from("/b/example.exe"),
            }
        );
    }

    #[test]
    fn falls_back_to_bare_binary() {
        let launch = resolve_launch(Path::new("/b"), "dev", only(&[]));
        assert_eq!(
            launch,
            Launch::Native {
                dir: PathBuf::from("/b"),
                executable: PathBuf::from("/b/dev"),
            }
        );
    }
}
