//! JSON dataset persistence

use crate::record::Record;
use crate::PersistenceError;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the crawl's records to one JSON file
///
/// The file holds a pretty-printed array of records; keys keep their
/// declaration order and non-ASCII text is written as-is.
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    path: PathBuf,
}

impl DatasetWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, records: &[Record]) -> Result<(), PersistenceError> {
        let file = File::create(&self.path).map_err(|source| self.io_error(source))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, records).map_err(|source| {
            PersistenceError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;
        writer.write_all(b"\n").map_err(|source| self.io_error(source))?;
        writer.flush().map_err(|source| self.io_error(source))?;

        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Reads a dataset written by `DatasetWriter`
pub fn load_dataset(path: &Path) -> Result<Vec<Record>, PersistenceError> {
    let file = File::open(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| PersistenceError::Serialize {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{IdentificationAttributes, Offense, SummaryRecord};
    use tempfile::TempDir;

    fn record(name: &str, kno: &str) -> Record {
        let mut identification = IdentificationAttributes::new();
        identification.insert("Hair", "BRN");
        identification.insert("Eyes", "GRN");
        Record {
            summary: SummaryRecord {
                name: name.to_string(),
                kno: kno.to_string(),
                ..Default::default()
            },
            profile_url: format!("https://example.com/sor_id/offender.aspx?id={}", kno),
            image_url: String::new(),
            local_image_path: Some(format!("offender_images/bonner/{}.jpg", kno)),
            identification,
            offenses: vec![Offense::new("18-4116", "INDECENT EXPOSURE", "2010", "ADA")],
        }
    }

    #[test]
    fn test_write_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bonner_county_offenders.json");
        let records = vec![record("MUÑOZ, JOSÉ", "1"), record("DOE, JOHN", "2")];

        DatasetWriter::new(&path).write(&records).unwrap();
        let loaded = load_dataset(&path).unwrap();

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_output_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        DatasetWriter::new(&path).write(&[record("MUÑOZ, JOSÉ", "1")]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"name\": \"MUÑOZ, JOSÉ\""));
        assert!(text.find("\"Hair\"").unwrap() < text.find("\"Eyes\"").unwrap());
        assert!(text.find("\"profile_url\"").unwrap() < text.find("\"offenses\"").unwrap());
    }

    #[test]
    fn test_empty_dataset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        DatasetWriter::new(&path).write(&[]).unwrap();
        assert!(load_dataset(&path).unwrap().is_empty());
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let result = DatasetWriter::new(&path).write(&[]);
        assert!(matches!(result, Err(PersistenceError::Io { .. })));
    }
}
