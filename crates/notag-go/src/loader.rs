//! Go package discovery.
//!
//! Walks a directory tree, parses every `.go` file, and groups files into
//! compilation units the way the Go tool does: one unit per
//! (directory, package clause) pair.

use notag_core::{AnalyzerConfig, UnitContext};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::GoError;
use crate::module::ModuleResolver;
use crate::parser::GoFile;

/// Directory names the Go tool never treats as packages.
const SKIPPED_DIRS: &[&str] = &["vendor", "testdata"];

const EXCLUDE_MATCH: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One Go package: a compilation unit.
#[derive(Debug)]
pub struct GoPackage {
    /// Package name and import path.
    pub context: UnitContext,
    /// Directory relative to the analysis root.
    pub dir: PathBuf,
    /// Files of the package, sorted by path.
    pub files: Vec<GoFile>,
}

/// Discovers and parses Go packages under a root directory.
#[derive(Debug, Clone)]
pub struct PackageLoader {
    root: PathBuf,
    exclude: Vec<glob::Pattern>,
    include_tests: bool,
    respect_gitignore: bool,
}

impl PackageLoader {
    /// Creates a loader for `root` with default settings.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude: Vec::new(),
            include_tests: true,
            respect_gitignore: true,
        }
    }

    /// Creates a loader for `root` using the `[analyzer]` settings.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is not a valid glob.
    pub fn from_config(
        root: impl Into<PathBuf>,
        config: &AnalyzerConfig,
    ) -> Result<Self, GoError> {
        Self::new(root)
            .include_tests(config.include_tests)
            .respect_gitignore(config.respect_gitignore)
            .excludes(&config.exclude)
    }

    /// Adds an exclude glob, matched against paths relative to the root.
    ///
    /// `*` never crosses a `/`; `**` spans whole directories. A leading
    /// `**/` also matches at the root, so `**/gen/**` excludes `gen/a.go`
    /// and `x/gen/a.go` but not `agent/a.go`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid glob.
    pub fn exclude(mut self, pattern: &str) -> Result<Self, GoError> {
        self.exclude.push(glob::Pattern::new(pattern)?);
        if let Some(anchored) = pattern.strip_prefix("**/") {
            self.exclude.push(glob::Pattern::new(anchored)?);
        }
        Ok(self)
    }

    /// Adds several exclude globs.
    ///
    /// # Errors
    ///
    /// Returns an error for the first invalid pattern.
    pub fn excludes<I, S>(self, patterns: I) -> Result<Self, GoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        patterns
            .into_iter()
            .try_fold(self, |loader, p| loader.exclude(p.as_ref()))
    }

    /// Sets whether `_test.go` files are loaded (default: true).
    #[must_use]
    pub fn include_tests(mut self, include: bool) -> Self {
        self.include_tests = include;
        self
    }

    /// Sets whether `.gitignore` rules are honoured (default: true).
    #[must_use]
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Finds all `.go` files to check, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory walk fails.
    pub fn discover(&self) -> Result<Vec<PathBuf>, GoError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .filter_entry(|entry| entry.depth() == 0 || !is_ignored_by_go(entry.file_name()));

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("go") {
                continue;
            }
            if !self.include_tests && is_test_file(path) {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Discovers, parses, and groups files into packages sorted by import path.
    ///
    /// Files without a `package` clause are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the walk fails or a file cannot be read.
    pub fn load(&self) -> Result<Vec<GoPackage>, GoError> {
        let mut groups: BTreeMap<(PathBuf, String), Vec<GoFile>> = BTreeMap::new();

        for path in self.discover()? {
            let source = std::fs::read_to_string(&path).map_err(|e| GoError::Io {
                path: path.clone(),
                source: e,
            })?;
            let file = GoFile::parse(self.relative(&path), source)?;

            let Some(name) = file.package_name().map(str::to_owned) else {
                warn!("No package clause in {}, skipping", path.display());
                continue;
            };
            let dir = path.parent().unwrap_or(&self.root).to_path_buf();
            groups.entry((dir, name)).or_default().push(file);
        }

        let mut resolver = ModuleResolver::new(&self.root);
        let mut packages: Vec<GoPackage> = groups
            .into_iter()
            .map(|((dir, name), files)| {
                let import_path = resolver.import_path(&dir, &name);
                debug!("Package {import_path} ({name}): {} file(s)", files.len());
                GoPackage {
                    context: UnitContext::new(name, import_path),
                    dir: self.relative(&dir),
                    files,
                }
            })
            .collect();

        packages.sort_by(|a, b| {
            a.context
                .package_path
                .cmp(&b.context.package_path)
                .then_with(|| a.context.package_name.cmp(&b.context.package_name))
        });
        Ok(packages)
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let rel = self.relative(path);
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_path_with(&rel, EXCLUDE_MATCH))
    }
}

/// Names the Go tool ignores: `vendor`, `testdata`, and anything starting
/// with `.` or `_`.
fn is_ignored_by_go(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    SKIPPED_DIRS.contains(&name.as_ref()) || name.starts_with('.') || name.starts_with('_')
}

fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_test.go"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, "go.mod", "module example.com/app\n");
        write(root, "main.go", "package main\n");
        write(root, "models/user.go", "package models\n");
        write(root, "models/order.go", "package models\n");
        write(root, "models/user_test.go", "package models\n");
        write(root, "models/export_test.go", "package models_test\n");
        write(root, "vendor/dep/dep.go", "package dep\n");
        write(root, "models/testdata/fixture.go", "package fixture\n");
        write(root, "_scratch/x.go", "package scratch\n");
        write(root, "generated/gen.go", "package generated\n");
        write(root, "docs/README.md", "not go\n");
        tmp
    }

    fn summary(packages: &[GoPackage]) -> Vec<(String, String, usize)> {
        packages
            .iter()
            .map(|p| {
                (
                    p.context.package_path.clone(),
                    p.context.package_name.clone(),
                    p.files.len(),
                )
            })
            .collect()
    }

    #[test]
    fn groups_files_into_packages() {
        let tmp = project();
        let packages = PackageLoader::new(tmp.path()).load().unwrap();

        assert_eq!(
            summary(&packages),
            vec![
                ("example.com/app".into(), "main".into(), 1),
                ("example.com/app/generated".into(), "generated".into(), 1),
                ("example.com/app/models".into(), "models".into(), 3),
                ("example.com/app/models_test".into(), "models_test".into(), 1),
            ]
        );
    }

    #[test]
    fn package_files_are_sorted_and_relative() {
        let tmp = project();
        let packages = PackageLoader::new(tmp.path()).load().unwrap();
        let models = packages
            .iter()
            .find(|p| p.context.package_name == "models")
            .unwrap();

        use notag_core::SyntaxTree;
        let paths: Vec<&Path> = models.files.iter().map(SyntaxTree::path).collect();
        assert_eq!(
            paths,
            [
                Path::new("models/order.go"),
                Path::new("models/user.go"),
                Path::new("models/user_test.go"),
            ]
        );
        assert_eq!(models.dir, PathBuf::from("models"));
    }

    #[test]
    fn excludes_and_test_toggle() {
        let tmp = project();
        let packages = PackageLoader::new(tmp.path())
            .include_tests(false)
            .exclude("**/generated/**")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(
            summary(&packages),
            vec![
                ("example.com/app".into(), "main".into(), 1),
                ("example.com/app/models".into(), "models".into(), 2),
            ]
        );
    }

    #[test]
    fn from_config_applies_analyzer_section() {
        let tmp = project();
        let config = AnalyzerConfig {
            exclude: vec!["models/**".into()],
            include_tests: false,
            ..AnalyzerConfig::default()
        };
        let packages = PackageLoader::from_config(tmp.path(), &config)
            .unwrap()
            .load()
            .unwrap();
        let names: Vec<&str> = packages
            .iter()
            .map(|p| p.context.package_name.as_str())
            .collect();
        assert_eq!(names, ["main", "generated"]);
    }

    #[test]
    fn exclude_globs_match_whole_path_components() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "agent/a.go", "package agent\n");
        write(tmp.path(), "internal/generic/g.go", "package generic\n");
        write(tmp.path(), "gen/x.go", "package gen\n");
        write(tmp.path(), "internal/gen/y.go", "package gen\n");

        let packages = PackageLoader::new(tmp.path())
            .exclude("**/gen/**")
            .unwrap()
            .load()
            .unwrap();
        let dirs: Vec<PathBuf> = packages.iter().map(|p| p.dir.clone()).collect();
        assert_eq!(
            dirs,
            [PathBuf::from("agent"), PathBuf::from("internal/generic")]
        );
    }

    #[test]
    fn root_inside_module_keeps_full_import_path() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "go.mod", "module example.com/app\n");
        write(
            tmp.path(),
            "internal/store/s.go",
            "package store\n\ntype Item struct {\n\tA int `yaml:\"a\"`\n}\n",
        );

        let packages = PackageLoader::new(tmp.path().join("internal/store"))
            .load()
            .unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(
            packages[0].context.package_path,
            "example.com/app/internal/store"
        );
        assert_eq!(packages[0].dir, PathBuf::new());
    }

    #[test]
    fn invalid_exclude_pattern_is_an_error() {
        let err = PackageLoader::new(".").exclude("[").unwrap_err();
        assert!(matches!(err, GoError::Pattern(_)));
    }

    #[test]
    fn files_without_package_clause_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "broken.go", "type T struct{}\n");
        write(tmp.path(), "ok.go", "package ok\n");
        let packages = PackageLoader::new(tmp.path()).load().unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].context.package_name, "ok");
    }
}
