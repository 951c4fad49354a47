use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};

/// Serialize `value` as pretty JSON to `path`, atomically: write a hidden
/// temp file next to it, then rename over the target.
pub fn write_json_atomic<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("report path {:?} has no file name", path))?;
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    {
        let file = fs::File::create(&tmp_path)
            .with_context(|| format!("creating {:?}", tmp_path))?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut w, value).context("serializing report JSON")?;
        // trailing newline
        w.write_all(b"\n")?;
        w.flush().with_context(|| format!("flushing {:?}", tmp_path))?;
    }

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn writes_pretty_json_and_leaves_no_temp_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("report.json");
        let mut value = BTreeMap::new();
        value.insert("Sold", 2);

        write_json_atomic(&value, &path)?;
        write_json_atomic(&value, &path)?;

        let text = fs::read_to_string(&path)?;
        assert!(text.ends_with("}\n"));
        let back: BTreeMap<String, u32> = serde_json::from_str(&text)?;
        assert_eq!(back["Sold"], 2);
        assert!(!dir.path().join(".report.json.tmp").exists());
        Ok(())
    }
}
