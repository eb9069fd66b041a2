// Jsonlines I/O: one compact JSON record per line.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read every record of a jsonlines file. Blank lines are skipped.
pub fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut records = Vec::new();

    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid record", path.display(), lineno + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Buffered jsonlines writer.
pub struct JsonlWriter {
    path: PathBuf,
    out: BufWriter<File>,
    written: usize,
}

impl JsonlWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        self.out
            .write_all(b"\n")
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        self.written += 1;
        Ok(())
    }

    /// Flush and return the number of records written.
    pub fn finish(mut self) -> Result<usize> {
        self.out
            .flush()
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(self.written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        id: String,
        head: Vec<Option<usize>>,
    }

    #[test]
    fn test_written_records_are_compact_lines() {
        let path = std::env::temp_dir().join("corefprep-jsonl-test.jsonlines");
        let mut writer = JsonlWriter::create(&path).unwrap();
        writer
            .write(&Record { id: "a".into(), head: vec![Some(1), None] })
            .unwrap();
        writer.write(&Record { id: "b".into(), head: vec![] }).unwrap();
        assert_eq!(writer.finish().unwrap(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\"id\":\"a\",\"head\":[1,null]}\n{\"id\":\"b\",\"head\":[]}\n");

        let records: Vec<Record> = read_all(&path).unwrap();
        assert_eq!(records[0].head, vec![Some(1), None]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_reports_line_number() {
        let path = std::env::temp_dir().join("corefprep-jsonl-bad.jsonlines");
        std::fs::write(&path, "{\"id\":\"a\",\"head\":[]}\nnot json\n").unwrap();
        let err = read_all::<Record>(&path).unwrap_err().to_string();
        assert!(err.ends_with(":2: invalid record"), "got: {err}");
        std::fs::remove_file(&path).unwrap();
    }
}
