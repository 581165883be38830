//! Test file discovery
//!
//! Finds `.na` files whose names match the configured patterns, walking
//! directories up to a maximum depth and pruning excluded names.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{DiscoveryError, Result};

/// Extension every test file must carry
pub const TEST_FILE_EXTENSION: &str = "na";

/// Options controlling test discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// File name globs that mark a test file
    pub patterns: Vec<String>,
    /// Names to prune while walking
    pub exclude: Vec<String>,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Deepest directory level searched below each root (root children are level 0)
    pub max_depth: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            patterns: vec!["test_*.na".to_string(), "*_test.na".to_string()],
            exclude: vec![
                ".*".to_string(),
                "__pycache__".to_string(),
                "*.egg-info".to_string(),
            ],
            recursive: true,
            max_depth: 10,
        }
    }
}

/// How an exclude pattern matches an entry name
#[derive(Debug, Clone)]
enum NameMatcher {
    /// Glob over the entry name
    Glob(GlobMatcher),
    /// Substring of the entry name
    Contains(String),
}

/// A compiled exclusion rule.
///
/// A pattern starting with `.` also excludes every dotted name; any other
/// name is still checked against the pattern itself.
#[derive(Debug, Clone)]
struct ExcludeRule {
    hidden: bool,
    matcher: NameMatcher,
}

impl ExcludeRule {
    fn parse(pattern: &str) -> Result<Self> {
        let matcher = if pattern.contains('*') {
            NameMatcher::Glob(compile_glob(pattern)?.compile_matcher())
        } else {
            NameMatcher::Contains(pattern.to_string())
        };
        Ok(Self {
            hidden: pattern.starts_with('.'),
            matcher,
        })
    }

    fn matches(&self, name: &str) -> bool {
        if self.hidden && name.starts_with('.') {
            return true;
        }
        match &self.matcher {
            NameMatcher::Glob(matcher) => matcher.is_match(name),
            NameMatcher::Contains(part) => name.contains(part.as_str()),
        }
    }
}

/// Discovers test files on disk
#[derive(Debug, Clone)]
pub struct TestDiscovery {
    options: DiscoveryOptions,
    patterns: GlobSet,
    exclude: Vec<ExcludeRule>,
}

impl TestDiscovery {
    /// Compile the options into a discovery instance
    pub fn new(options: DiscoveryOptions) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &options.patterns {
            builder.add(compile_glob(pattern)?);
        }
        let patterns = builder.build().map_err(|e| DiscoveryError::InvalidPattern {
            pattern: options.patterns.join(", "),
            message: e.to_string(),
        })?;

        let exclude = options
            .exclude
            .iter()
            .map(|p| ExcludeRule::parse(p))
            .collect::<Result<Vec<_>>>()?;

        debug!(patterns = ?options.patterns, "initialized test discovery");
        Ok(Self {
            options,
            patterns,
            exclude,
        })
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Discover test files under `paths`.
    ///
    /// File arguments are kept when they are test files; directories are
    /// walked. The result holds no two entries resolving to the same file
    /// and is sorted.
    pub fn discover(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut found = Vec::new();

        for path in paths {
            if path.is_file() {
                if self.is_test_file(path) {
                    debug!(path = %path.display(), "discovered test file");
                    found.push(path.clone());
                }
            } else if path.is_dir() {
                let files = self.walk_directory(path);
                debug!(path = %path.display(), count = files.len(), "walked directory");
                found.extend(files);
            } else {
                warn!(path = %path.display(), "path does not exist");
            }
        }

        let mut unique = remove_duplicates(found);
        unique.sort();

        info!(count = unique.len(), "discovery completed");
        unique
    }

    /// Whether `path` has the test extension and a matching file name
    pub fn is_test_file(&self, path: &Path) -> bool {
        if path.extension().map_or(true, |ext| ext != TEST_FILE_EXTENSION) {
            return false;
        }
        path.file_name()
            .is_some_and(|name| self.patterns.is_match(Path::new(name)))
    }

    /// Whether an entry name is pruned during walks
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|rule| rule.matches(name))
    }

    fn walk_directory(&self, root: &Path) -> Vec<PathBuf> {
        let depth = if self.options.recursive {
            self.options.max_depth.saturating_add(1)
        } else {
            1
        };

        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(depth)
            .into_iter()
            .filter_entry(|entry| !self.prune(entry));

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && self.is_test_file(path) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                }
            }
        }
        files
    }

    fn prune(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0 && self.is_excluded(&entry.file_name().to_string_lossy())
    }
}

fn compile_glob(pattern: &str) -> Result<Glob> {
    Glob::new(pattern).map_err(|e| {
        DiscoveryError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.kind().to_string(),
        }
        .into()
    })
}

/// Keep the first path resolving to each file
fn remove_duplicates(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    files
        .into_iter()
        .filter(|path| {
            let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
            seen.insert(resolved)
        })
        .collect()
}
