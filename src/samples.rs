use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;

/// Read one sample per line. Lines are trimmed; blank lines and `#`
/// comments are skipped.
pub fn read_samples<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut samples = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        samples.push(line.to_string());
    }
    Ok(samples)
}

pub fn load_samples(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    read_samples(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_skips_comments_and_blanks() {
        let text = "# 普通样本\n河南科技职业大学杨怡宁\n\n   \n  黄淮学院—潘豫皖  \n#end\n";
        let samples = read_samples(text.as_bytes()).unwrap();
        assert_eq!(samples, vec!["河南科技职业大学杨怡宁", "黄淮学院—潘豫皖"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_samples(&dir.path().join("samples.txt")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
