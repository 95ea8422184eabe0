use crate::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Find every `*.tsv` file below `search_root`, depth-first with entries
/// sorted by file name.
///
/// Hidden files and directories (leading `.`) are never entered, and files
/// for which `exclude` returns true (by file name) are skipped.
pub fn discover_input_tables<F>(search_root: &Path, exclude: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&str) -> bool,
{
    if !search_root.is_dir() {
        return Err(Error::InputNotFound(format!(
            "directory {} does not exist",
            search_root.display()
        )));
    }

    let mut tables = Vec::new();
    let walker = WalkDir::new(search_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in walker {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }
        if path.extension().is_none_or(|e| e != "tsv") {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if exclude(&file_name) {
            continue;
        }

        tables.push(path.to_path_buf());
    }

    if tables.is_empty() {
        return Err(Error::InputNotFound(format!(
            "no *.tsv files under {}",
            search_root.display()
        )));
    }

    Ok(tables)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_nested_tables_in_name_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("b_run")).unwrap();
        fs::write(root.join("b_run/persistence.tsv"), "x").unwrap();
        fs::write(root.join("a.tsv"), "x").unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();

        let found = discover_input_tables(root, |_| false).unwrap();

        assert_eq!(found, vec![root.join("a.tsv"), root.join("b_run/persistence.tsv")]);
    }

    #[test]
    fn test_hidden_entries_are_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join(".snapshot")).unwrap();
        fs::write(root.join(".snapshot/a.tsv"), "x").unwrap();
        fs::write(root.join("._a.tsv"), "x").unwrap();
        fs::write(root.join("b.tsv"), "x").unwrap();

        let found = discover_input_tables(root, |_| false).unwrap();

        assert_eq!(found, vec![root.join("b.tsv")]);
    }

    #[test]
    fn test_hidden_search_root_is_still_walked() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join(".cache");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("run.tsv"), "x").unwrap();

        let found = discover_input_tables(&root, |_| false).unwrap();

        assert_eq!(found, vec![root.join("run.tsv")]);
    }

    #[test]
    fn test_excluded_names_are_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Iraq_summary_stats.tsv"), "x").unwrap();
        fs::write(temp.path().join("run.tsv"), "x").unwrap();

        let found =
            discover_input_tables(temp.path(), |name| name.ends_with("_summary_stats.tsv")).unwrap();

        assert_eq!(found, vec![temp.path().join("run.tsv")]);
    }

    #[test]
    fn test_missing_directory_is_input_not_found() {
        let temp = TempDir::new().unwrap();
        let result = discover_input_tables(&temp.path().join("delta5"), |_| false);
        assert!(matches!(result, Err(Error::InputNotFound(_))));
    }

    #[test]
    fn test_directory_without_tables_is_input_not_found() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("readme.md"), "x").unwrap();
        let result = discover_input_tables(temp.path(), |_| false);
        assert!(matches!(result, Err(Error::InputNotFound(_))));
    }
}
