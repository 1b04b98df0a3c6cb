use std::fs;
use std::path::Path;

use crate::error::AppResult;

const REPORT_MARKER: &str = ".xml";

/// Names of the JUnit result files in `dir`, in directory enumeration order.
pub fn list_report_files(dir: &Path) -> AppResult<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_report_file(&name) {
            files.push(name);
        }
    }
    Ok(files)
}

fn is_report_file(name: &str) -> bool {
    name.contains(REPORT_MARKER)
}
