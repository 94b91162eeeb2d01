//! Import path resolution from `go.mod`.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// A Go module: the directory holding `go.mod` and its module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    /// Directory containing `go.mod`.
    pub dir: PathBuf,
    /// Module path from the `module` directive.
    pub path: String,
}

/// Reads the module path from the contents of a `go.mod` file.
#[must_use]
pub fn parse_module_path(go_mod: &str) -> Option<String> {
    let mut in_block = false;
    for line in go_mod.lines() {
        let line = line.split("//").next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let value = if in_block {
            if line == ")" {
                in_block = false;
                continue;
            }
            line
        } else {
            let Some(rest) = line.strip_prefix("module") else {
                continue;
            };
            if !rest.starts_with(|c: char| c.is_whitespace() || c == '(') {
                continue;
            }
            let rest = rest.trim();
            if rest == "(" {
                in_block = true;
                continue;
            }
            rest
        };

        let value = value.trim_matches(|c| c == '"' || c == '`');
        if !value.is_empty() {
            return Some(value.to_owned());
        }
    }
    None
}

/// Resolves package import paths, caching `go.mod` lookups per directory.
///
/// The nearest `go.mod` is searched for up the whole directory tree, so a
/// root inside a module still yields fully-qualified import paths.
#[derive(Debug)]
pub struct ModuleResolver {
    root: PathBuf,
    cache: HashMap<PathBuf, Option<GoModule>>,
}

impl ModuleResolver {
    /// Creates a resolver for packages under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    /// Nearest module enclosing `dir`, searching parent directories.
    ///
    /// The returned `dir` is absolute.
    pub fn module_for(&mut self, dir: &Path) -> Option<GoModule> {
        self.lookup(&absolute(dir))
    }

    fn lookup(&mut self, dir: &Path) -> Option<GoModule> {
        if let Some(cached) = self.cache.get(dir) {
            return cached.clone();
        }

        let found = std::fs::read_to_string(dir.join("go.mod"))
            .ok()
            .and_then(|content| parse_module_path(&content))
            .map(|path| GoModule {
                dir: dir.to_path_buf(),
                path,
            })
            .or_else(|| dir.parent().and_then(|parent| self.lookup(parent)));

        self.cache.insert(dir.to_path_buf(), found.clone());
        found
    }

    /// Import path of the package named `package_name` in `dir`.
    ///
    /// Falls back to the directory relative to the root when no `go.mod` is
    /// found, or to the package name for the root itself. External test
    /// packages (`foo_test`) get a `_test` suffix.
    pub fn import_path(&mut self, dir: &Path, package_name: &str) -> String {
        let base = match self.module_for(dir) {
            Some(module) => {
                let abs = absolute(dir);
                let rel = slash_path(abs.strip_prefix(&module.dir).unwrap_or(Path::new("")));
                if rel.is_empty() {
                    module.path
                } else {
                    format!("{}/{rel}", module.path)
                }
            }
            None => {
                let rel = slash_path(dir.strip_prefix(&self.root).unwrap_or(dir));
                if rel.is_empty() {
                    package_name.trim_end_matches("_test").to_owned()
                } else {
                    rel
                }
            }
        };

        if package_name.ends_with("_test") {
            format!("{base}_test")
        } else {
            base
        }
    }
}

/// Canonical form of `dir`, or its lexically absolute form if it does not
/// exist.
fn absolute(dir: &Path) -> PathBuf {
    dir.canonicalize()
        .or_else(|_| std::path::absolute(dir))
        .unwrap_or_else(|_| dir.to_path_buf())
}

/// Joins the normal components of `path` with `/`.
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
