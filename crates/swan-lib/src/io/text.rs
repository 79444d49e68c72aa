use anyhow::{Context, Result};
use std::path::Path;

/// Parse a whitespace-delimited sample series, ignoring blank/comment lines.
pub fn parse_sample_series(text: &str) -> Result<Vec<f64>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        for token in trimmed.split_whitespace() {
            let val: f64 = token
                .parse()
                .with_context(|| format!("line {} is not f64: {}", idx + 1, token))?;
            out.push(val);
        }
    }
    if out.is_empty() {
        anyhow::bail!("no numeric samples found");
    }
    Ok(out)
}

/// Read a whitespace-delimited sample series from disk.
pub fn read_sample_series(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_sample_series(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens_across_lines() {
        let series = parse_sample_series("1.0 2.5\n# comment\n\n-3e-1\n").unwrap();
        assert_eq!(series, vec![1.0, 2.5, -0.3]);
    }

    #[test]
    fn reports_the_offending_line() {
        let err = parse_sample_series("1.0\nined\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(parse_sample_series("# nothing here\n").is_err());
        assert!(parse_sample_series("").is_err());
    }

    #[test]
    fn reads_series_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.txt");
        std::fs::write(&path, "0.5\n1.5\n").unwrap();
        assert_eq!(read_sample_series(&path).unwrap(), vec![0.5, 1.5]);
        assert!(read_sample_series(&dir.path().join("missing.txt")).is_err());
    }
}
