/*
 * Decides whether a file name belongs in the result set. Matching is a
 * case-insensitive substring test of the query against the file name (never
 * the full path), optionally combined with an exact, case-insensitive
 * comparison of the file's extension against a filter such as ".txt".
 *
 * Everything here is pure; `FileNameMatcher` only caches the lowercased
 * query and filter so the per-candidate loop does not re-allocate them.
 */
use super::models::{SearchRequest, normalize_extension_filter};
use std::path::Path;

/*
 * One-shot form of the matching rule. An empty `extension_filter` means no
 * filter; "txt" and ".txt" are equivalent.
 */
pub fn matches(filename: &str, query: &str, extension_filter: &str) -> bool {
    FileNameMatcher::new(query, normalize_extension_filter(extension_filter).as_deref())
        .is_match(filename)
}

#[derive(Debug, Clone)]
pub struct FileNameMatcher {
    query_lower: String,
    // Stored without the leading '.', lowercased.
    extension_lower: Option<String>,
}

impl FileNameMatcher {
    // `extension_filter` is expected in normalized form (leading '.').
    pub fn new(query: &str, extension_filter: Option<&str>) -> Self {
        FileNameMatcher {
            query_lower: query.to_lowercase(),
            extension_lower: extension_filter
                .map(|ext| ext.strip_prefix('.').unwrap_or(ext).to_lowercase()),
        }
    }

    pub fn for_request(request: &SearchRequest) -> Self {
        Self::new(request.query(), request.extension_filter())
    }

    pub fn is_match(&self, filename: &str) -> bool {
        if let Some(wanted) = &self.extension_lower {
            let actual = Path::new(filename)
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase());
            if actual.as_deref() != Some(wanted.as_str()) {
                return false;
            }
        }
        filename.to_lowercase().contains(&self.query_lower)
    }

    // Convenience for callers holding a path; only the final component is matched.
    pub fn is_path_match(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.is_match(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_matches_case_insensitive_with_extension() {
        assert!(matches("Report.TXT", "report", ".txt"));
        assert!(!matches("Report.TXT", "report", ".csv"));
        assert!(matches("myreport.txt", "REPORT", ""));
    }

    #[test]
    fn test_extension_filter_with_and_without_dot_behave_identically() {
        for name in ["a.txt", "b.TXT", "c.log", "txt", "notes.txt.bak", "archive.tar.gz"] {
            assert_eq!(
                matches(name, "", "txt"),
                matches(name, "", ".txt"),
                "Filters 'txt' and '.txt' disagree on {name}"
            );
        }
    }

    #[test]
    fn test_extension_is_exact_not_substring() {
        assert!(!matches("data.txtx", "data", ".txt"));
        assert!(!matches("data.tx", "data", ".txt"));
        assert!(!matches("txt", "txt", ".txt"), "A bare name has no extension");
        assert!(matches("data.TxT", "data", ".tXt"));
    }

    #[test]
    fn test_query_matches_file_name_not_directory() {
        let matcher = FileNameMatcher::new("project", None);
        assert!(!matcher.is_path_match(Path::new("/home/project/readme.md")));
        assert!(matcher.is_path_match(Path::new("/home/other/project_plan.md")));
    }

    #[test]
    fn test_random_casing_of_file_name_still_matches() {
        // Arrange
        let mut rng = rand::rng();
        let base = "quarterly_report_final.txt";

        for _ in 0..64 {
            let scrambled: String = base
                .chars()
                .map(|c| {
                    if rng.random_bool(0.5) {
                        c.to_ascii_uppercase()
                    } else {
                        c
                    }
                })
                .collect();

            // Act & Assert
            assert!(
                matches(&scrambled, "REPORT_final", "TXT"),
                "Expected '{scrambled}' to match regardless of case"
            );
        }
    }

    #[test]
    fn test_unicode_names_fold_case() {
        assert!(matches("Ärger.md", "ärg", ".md"));
    }
}
