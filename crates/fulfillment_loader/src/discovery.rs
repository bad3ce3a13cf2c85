//! Resolution of a logical table to its physical files.

use crate::LoaderError;
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

/// Returns the glob pattern `<dir>/<table>*.csv`, with `dir` escaped.
pub fn table_pattern(dir: &Path, table: &str) -> String {
    let dir = Pattern::escape(&dir.to_string_lossy());
    if dir.is_empty() {
        format!("{table}*.csv")
    } else {
        format!("{}/{table}*.csv", dir.trim_end_matches('/'))
    }
}

/// Lists the files of `table` in `dir`, sorted by path.
///
/// Unreadable directory entries are skipped; an empty result is not an error.
pub fn discover(dir: &Path, table: &str) -> Result<Vec<PathBuf>, LoaderError> {
    let pattern = table_pattern(dir, table);

    let mut paths: Vec<PathBuf> = glob(&pattern)?
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_prefix_match_is_sorted_and_exact() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "df_Orders_2024.csv",
            "df_Orders.csv",
            "df_OrderItems.csv",
            "df_Orders.txt",
            "other.csv",
        ] {
            fs::write(dir.path().join(name), "order_id\nA\n").unwrap();
        }
        fs::create_dir(dir.path().join("df_Orders_dir.csv")).unwrap();

        let names: Vec<String> = discover(dir.path(), "df_Orders")
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["df_Orders.csv", "df_Orders_2024.csv"]);
    }

    #[test]
    fn test_missing_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = discover(&dir.path().join("test"), "df_payments").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_pattern_escapes_directory() {
        assert_eq!(
            table_pattern(Path::new("data/raw[1]/train"), "df_products"),
            "data/raw[[]1[]]/train/df_products*.csv"
        );
    }
}
