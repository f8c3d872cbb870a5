//! Subcommand bodies, kept free of process I/O so they can be tested.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jsonkit_lib::{DeserializeOptions, SerializeOptions};
use serde_json::Value;

/// Load `path` as untyped JSON and render it with `layout`.
pub fn fmt_file(path: &Path, parse: DeserializeOptions, layout: SerializeOptions) -> Result<String> {
    let value: Value = jsonkit_lib::deserialize_from_file_with(path, parse)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let text = jsonkit_lib::serialize(&value, layout)?;
    Ok(text)
}

/// Write one status line per file and return how many failed to parse.
pub fn check_files(paths: &[PathBuf], parse: DeserializeOptions, out: &mut impl Write) -> Result<usize> {
    let mut failed = 0;
    for path in paths {
        match jsonkit_lib::deserialize_from_file_with::<Value>(path, parse) {
            Ok(_) => writeln!(out, "ok    {}", path.display())?,
            Err(e) => {
                failed += 1;
                tracing::debug!(path = %path.display(), kind = ?e.kind(), "Check failed");
                writeln!(out, "FAIL  {} ({:?}): {}", path.display(), e.kind(), e)?;
            }
        }
    }
    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fmt_file_pretty_without_nulls() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("in.json");
        fs::write(&path, r#"{"b":1,"a":null,"c":[true,],}"#).unwrap();

        let layout = SerializeOptions::default()
            .with_prettify(true)
            .with_exclude_null_fields(true);
        let text = fmt_file(&path, DeserializeOptions::default(), layout).unwrap();
        assert_eq!(text, "{\n  \"b\": 1,\n  \"c\": [\n    true\n  ]\n}");
    }

    #[test]
    fn test_fmt_file_strict_rejects_trailing_comma() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("in.json");
        fs::write(&path, "[1,]").unwrap();

        let err = fmt_file(&path, DeserializeOptions::strict(), SerializeOptions::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed to load"));
    }

    #[test]
    fn test_check_files_counts_failures() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("good.json");
        let bad = tmp.path().join("bad.json");
        fs::write(&good, "{}").unwrap();
        fs::write(&bad, "invalid json").unwrap();
        let missing = tmp.path().join("missing.json");

        let mut out = Vec::new();
        let failed = check_files(
            &[good, bad, missing],
            DeserializeOptions::default(),
            &mut out,
        )
        .unwrap();

        assert_eq!(failed, 2);
        let report = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert!(lines[0].starts_with("ok"));
        assert!(lines[1].contains("(Parse)"));
        assert!(lines[2].contains("(FileNotFound)"));
    }
}
