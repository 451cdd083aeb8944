use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use enumgen_errors::{CompilerError, FilesystemError};

/// Expands `include` globs relative to `root`, drops anything matched by an
/// `exclude` pattern and returns the survivors sorted. Matching nothing is an
/// error: a generation without schemas can only report unknown types.
pub fn match_paths(
    root: &Path,
    include: &[String],
    exclude: &[String],
) -> Result<Vec<PathBuf>, CompilerError> {
    let anchored = |pattern: &str| root.join(pattern).display().to_string();

    let mut found = BTreeSet::new();
    for pattern in include {
        for path in glob::glob(&anchored(pattern))? {
            found.insert(path?);
        }
    }

    let excluded = exclude
        .iter()
        .map(|pattern| glob::Pattern::new(&anchored(pattern)))
        .collect::<Result<Vec<_>, _>>()?;

    let matched: Vec<PathBuf> = found
        .into_iter()
        .filter(|path| {
            let skip = excluded
                .iter()
                .any(|pattern| pattern.matches_path(path));
            if skip {
                tracing::trace!("excluding schema '{}'", path.display());
            }
            !skip
        })
        .inspect(|path| tracing::trace!("including schema '{}'", path.display()))
        .collect();

    if matched.is_empty() {
        return Err(FilesystemError::empty_file_list()
            .unlocated()
            .build());
    }

    Ok(matched)
}

#[cfg(test)]
mod test {
    use super::*;

    fn touch(
        root: &Path,
        name: &str,
    ) {
        let path = root.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "enums = []").unwrap();
    }

    #[test]
    fn include_then_exclude() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["schemas/storage.toml", "schemas/compute.yaml", "schemas/legacy.toml"] {
            touch(dir.path(), name);
        }

        let found = match_paths(
            dir.path(),
            &["schemas/*.toml".into(), "schemas/*.yaml".into()],
            &["**/legacy.*".into()],
        )
        .unwrap();

        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["compute.yaml", "storage.toml"]);
    }

    #[test]
    fn nothing_matched() {
        let dir = tempfile::tempdir().unwrap();
        let err = match_paths(dir.path(), &["*.toml".into()], &[]).unwrap_err();
        assert_eq!(err.error_code().to_string(), "KFS2002");
    }

    #[test]
    fn bad_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let err = match_paths(dir.path(), &["[".into()], &[]).unwrap_err();
        assert!(err.message().starts_with("glob pattern error"));
    }
}
