use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::core::error::{InjectError, InjectResult};

/// Find the identifier module by file name under `root`.
///
/// The first match of the walk wins; entries are visited in file-name order
/// so the result is stable. `node_modules` is never searched.
pub fn find_identifier_module(root: &Path, file_name: &str) -> InjectResult<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != "node_modules")
        .filter_map(|e| e.ok())
        .find(|e| e.file_type().is_file() && e.file_name() == file_name)
        .map(|e| e.into_path())
        .ok_or_else(|| InjectError::IdentifierModuleNotFound {
            name: file_name.to_string(),
            root: root.to_path_buf(),
        })
}

/// Module specifier for importing `module` from `from_file`.
///
/// Forward slashes, no extension, and a `./` prefix unless the path already
/// climbs with `..`.
pub fn relative_import_path(from_file: &Path, module: &Path) -> InjectResult<String> {
    let error = || InjectError::ImportPath {
        from: from_file.to_path_buf(),
        to: module.to_path_buf(),
    };

    let from_dir = normalized(from_file.parent().unwrap_or(Path::new("")));
    let stem = module.with_extension("");
    let target = normalized(&stem);

    // Both sides must be anchored the same way for the diff to mean anything.
    if from_dir.first().map(is_anchor) != target.first().map(is_anchor) {
        return Err(error());
    }

    let common = from_dir
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for component in &from_dir[common..] {
        match component {
            Component::Normal(_) => segments.push("..".to_string()),
            _ => return Err(error()),
        }
    }
    for component in &target[common..] {
        match component {
            Component::Normal(name) => segments.push(name.to_string_lossy().to_string()),
            Component::ParentDir => segments.push("..".to_string()),
            _ => return Err(error()),
        }
    }
    if segments.is_empty() {
        return Err(error());
    }

    let path = segments.join("/");
    if path.starts_with("..") {
        Ok(path)
    } else {
        Ok(format!("./{}", path))
    }
}

fn normalized(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn is_anchor(component: &Component<'_>) -> bool {
    matches!(component, Component::Prefix(_) | Component::RootDir)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn import(from: &str, module: &str) -> String {
        relative_import_path(Path::new(from), Path::new(module)).unwrap()
    }

    #[test]
    fn test_sibling_gets_dot_slash() {
        assert_eq!(import("/p/src/page.tsx", "/p/src/tKeys.ts"), "./tKeys");
    }

    #[test]
    fn test_nested_module() {
        assert_eq!(
            import("/p/src/page.tsx", "/p/src/i18n/tKeys.ts"),
            "./i18n/tKeys"
        );
    }

    #[test]
    fn test_parent_directories() {
        assert_eq!(
            import("/p/src/app/[locale]/page.tsx", "/p/src/tKeys.ts"),
            "../../tKeys"
        );
        assert_eq!(
            import("/p/src/app/page.tsx", "/p/lib/keys/tKeys.ts"),
            "../../lib/keys/tKeys"
        );
    }

    #[test]
    fn test_relative_inputs() {
        assert_eq!(import("./src/a/b.ts", "./src/tKeys.ts"), "../tKeys");
        assert_eq!(import("src/b.ts", "src/tKeys.ts"), "./tKeys");
    }

    #[test]
    fn test_mixed_anchoring_fails() {
        let err = relative_import_path(Path::new("src/a.ts"), Path::new("/p/tKeys.ts")).unwrap_err();
        assert!(matches!(err, InjectError::ImportPath { .. }));
    }

    #[test]
    fn test_find_identifier_module() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("node_modules").join("pkg")).unwrap();
        fs::write(root.join("node_modules").join("pkg").join("tKeys.ts"), "").unwrap();
        fs::create_dir_all(root.join("src").join("i18n")).unwrap();
        fs::write(root.join("src").join("i18n").join("tKeys.ts"), "").unwrap();

        let found = find_identifier_module(root, "tKeys.ts").unwrap();
        assert_eq!(found, root.join("src").join("i18n").join("tKeys.ts"));
    }

    #[test]
    fn test_find_identifier_module_missing() {
        let dir = tempdir().unwrap();
        let err = find_identifier_module(dir.path(), "tKeys.ts").unwrap_err();
        assert!(err.to_string().contains("skiver generate"));
        assert!(err.is_fatal());
    }
}
