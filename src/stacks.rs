//! Stack config file discovery.
//!
//! Expands the absolute stack directory globs into concrete files. Globs
//! support `**` for recursive matching when it forms a whole path segment;
//! inside a longer segment (`stacks/**.yaml`) it matches like `*`. Patterns
//! without an extension are qualified with `.yaml` first.

use crate::config::DEFAULT_STACK_CONFIG_FILE_EXTENSION;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use tracing::debug;

/// Find all stack config files matched by `path_globs`.
///
/// Matches keep pattern order, and the glob's sorted order within each
/// pattern. Files matched by more than one pattern appear more than once.
pub fn find_stack_config_files(path_globs: &[String]) -> ConfigResult<Vec<String>> {
    let mut files = Vec::new();

    for path_glob in path_globs {
        let pattern = single_segment_wildcards(&with_default_extension(path_glob));
        let entries = glob::glob(&pattern).map_err(|source| ConfigError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;

        let before = files.len();
        for entry in entries {
            files.push(entry?.to_string_lossy().into_owned());
        }
        debug!(
            pattern = %pattern,
            matches = files.len() - before,
            "Expanded stack path glob"
        );
    }

    if files.is_empty() {
        return Err(ConfigError::NoStackFiles {
            globs: serde_json::to_string_pretty(path_globs)?,
        });
    }

    Ok(files)
}

/// Qualify an extension-less glob with the default stack file extension.
///
/// An existing directory becomes `<dir>/*.yaml`. Anything else gets `.yaml`
/// appended, so `stacks/*` becomes `stacks/*.yaml`.
pub fn with_default_extension(pattern: &str) -> String {
    let path = Path::new(pattern);
    if path.extension().is_some() {
        return pattern.to_string();
    }
    if path.is_dir() {
        return path
            .join(format!("*{}", DEFAULT_STACK_CONFIG_FILE_EXTENSION))
            .to_string_lossy()
            .into_owned();
    }
    format!("{}{}", pattern, DEFAULT_STACK_CONFIG_FILE_EXTENSION)
}

/// Collapse `**` that shares a path segment with other characters into `*`.
///
/// A segment that is exactly `**` is left alone and still recurses.
pub fn single_segment_wildcards(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut segment = String::new();
    for c in pattern.chars() {
        if std::path::is_separator(c) {
            push_segment(&mut out, &segment);
            out.push(c);
            segment.clear();
        } else {
            segment.push(c);
        }
    }
    push_segment(&mut out, &segment);
    out
}

fn push_segment(out: &mut String, segment: &str) {
    if segment == "**" || !segment.contains("**") {
        out.push_str(segment);
        return;
    }
    let mut prev_star = false;
    for c in segment.chars() {
        if c == '*' {
            if !prev_star {
                out.push(c);
            }
            prev_star = true;
        } else {
            out.push(c);
            prev_star = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "vars: {}\n").unwrap();
    }

    fn glob_in(temp: &TempDir, pattern: &str) -> String {
        temp.path().join(pattern).to_string_lossy().into_owned()
    }

    #[test]
    fn test_extension_appended_to_wildcard() {
        assert_eq!(with_default_extension("/x/stacks/*"), "/x/stacks/*.yaml");
        assert_eq!(with_default_extension("/x/stacks/**/*"), "/x/stacks/**/*.yaml");
    }

    #[test]
    fn test_existing_extension_kept() {
        assert_eq!(with_default_extension("/x/stacks/*.yml"), "/x/stacks/*.yml");
        assert_eq!(with_default_extension("/x/stacks/prod.yaml"), "/x/stacks/prod.yaml");
    }

    #[test]
    fn test_directory_gets_wildcard() {
        let temp = TempDir::new().unwrap();
        let dir = glob_in(&temp, "stacks");
        fs::create_dir_all(&dir).unwrap();
        assert_eq!(
            with_default_extension(&dir),
            temp.path().join("stacks").join("*.yaml").to_string_lossy()
        );
    }

    #[test]
    fn test_finds_files_in_directory_without_extension() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("fixtures/stacks/x.yaml"));

        let files = find_stack_config_files(&[glob_in(&temp, "fixtures/stacks")]).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("x.yaml"));
        assert!(Path::new(&files[0]).is_absolute());
    }

    #[test]
    fn test_recursive_glob() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("stacks/uw2-dev.yaml"));
        touch(&temp.path().join("stacks/catalog/vpc.yaml"));
        touch(&temp.path().join("stacks/catalog/eks/cluster.yaml"));
        touch(&temp.path().join("stacks/README.md"));

        let files = find_stack_config_files(&[glob_in(&temp, "stacks/**/*")]).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| f.ends_with(".yaml")));
    }

    #[test]
    fn test_preserves_pattern_order_and_duplicates() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("a/one.yaml"));
        touch(&temp.path().join("b/two.yaml"));

        let files = find_stack_config_files(&[
            glob_in(&temp, "b/*"),
            glob_in(&temp, "a/*"),
            glob_in(&temp, "b/*"),
        ])
        .unwrap();
        assert_eq!(files.len(), 3);
        assert!(files[0].ends_with("two.yaml"));
        assert!(files[1].ends_with("one.yaml"));
        assert!(files[2].ends_with("two.yaml"));
    }

    #[test]
    fn test_no_matches_reports_globs() {
        let temp = TempDir::new().unwrap();
        let pattern = glob_in(&temp, "missing/*");

        let err = find_stack_config_files(&[pattern.clone()]).unwrap_err();
        assert!(matches!(err, ConfigError::NoStackFiles { .. }));
        let expected = serde_json::to_string_pretty(&vec![pattern]).unwrap();
        assert!(err.to_string().contains(&expected));
    }

    #[test]
    fn test_single_segment_wildcards() {
        assert_eq!(single_segment_wildcards("/x/stacks/**.yaml"), "/x/stacks/*.yaml");
        assert_eq!(single_segment_wildcards("/x/**/a**b.yaml"), "/x/**/a*b.yaml");
        assert_eq!(single_segment_wildcards("/x/stacks/**/*.yaml"), "/x/stacks/**/*.yaml");
    }

    #[test]
    fn test_trailing_double_star_matches_like_single_star() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("stacks/a.yaml"));
        touch(&temp.path().join("stacks/catalog/vpc.yaml"));

        let files = find_stack_config_files(&[glob_in(&temp, "stacks/**")]).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.yaml"));
    }

    #[test]
    fn test_malformed_pattern() {
        let err = find_stack_config_files(&["/x/stacks/[a.yaml".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_glob_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("stacks/locked");
        touch(&locked.join("a.yaml"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still list the directory; nothing to assert then.
        let readable = fs::read_dir(&locked).is_ok();
        let result = find_stack_config_files(&[glob_in(&temp, "stacks/*/*")]);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if !readable {
            let err = result.unwrap_err();
            assert!(matches!(err, ConfigError::Glob(_)));
            assert_eq!(err.code(), crate::error::ErrorCode::GlobFailed);
        }
    }
}
