use crate::error::LoadError;
use crate::index::SimilarityIndex;
use crate::vectorizer::VectorizerOptions;
use crate::Record;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Source column names, matched case-insensitively after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub title: String,
    pub genre: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self { title: "title".into(), genre: "genre".into() }
    }
}

#[derive(Debug, Default)]
pub struct LoadedDataset {
    pub records: Vec<Record>,
    /// Rows skipped for a missing or blank title or genre
    pub dropped: usize,
    pub files: usize,
}

impl LoadedDataset {
    fn push(&mut self, title: Option<String>, genre: Option<String>) {
        match (title, genre) {
            (Some(title), Some(genre_text)) => self.records.push(Record { title, genre_text }),
            _ => self.dropped += 1,
        }
    }
}

enum Format {
    Csv,
    Json,
    Jsonl,
}

fn format_of(path: &Path) -> Option<Format> {
    match path.extension().and_then(|s| s.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("csv") => Some(Format::Csv),
        Some("json") => Some(Format::Json),
        Some("jsonl") => Some(Format::Jsonl),
        _ => None,
    }
}

/// Load (title, genre) records from a CSV/JSON/JSONL file or a directory of them.
pub fn load_records<P: AsRef<Path>>(path: P, columns: &Columns) -> Result<LoadedDataset, LoadError> {
    let input_path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(input_path).to_path_buf();
                LoadError::Io { path, source: e.into() }
            })?;
            let p = entry.path();
            if p.is_file() && format_of(p).is_some() {
                files.push(p.to_path_buf());
            }
        }
        if files.is_empty() {
            return Err(LoadError::NoInputFiles(input_path.to_path_buf()));
        }
    } else {
        if format_of(input_path).is_none() {
            return Err(LoadError::UnsupportedFormat(input_path.to_path_buf()));
        }
        files.push(input_path.to_path_buf());
    }

    let mut dataset = LoadedDataset::default();
    for file in &files {
        match format_of(file) {
            Some(Format::Csv) => load_csv(file, columns, &mut dataset)?,
            Some(Format::Json) => load_json(file, columns, &mut dataset)?,
            Some(Format::Jsonl) => load_jsonl(file, columns, &mut dataset)?,
            None => {}
        }
        dataset.files += 1;
    }

    if dataset.dropped > 0 {
        tracing::warn!(dropped = dataset.dropped, "skipped rows without title or genre");
    }
    tracing::info!(records = dataset.records.len(), files = dataset.files, "dataset loaded");
    Ok(dataset)
}

/// Load a dataset and build its index. Also returns the number of dropped rows.
pub fn load_index<P: AsRef<Path>>(path: P, columns: &Columns, options: VectorizerOptions) -> crate::Result<(SimilarityIndex, usize)> {
    let dataset = load_records(path, columns)?;
    let index = SimilarityIndex::build_with(&dataset.records, options)?;
    Ok((index, dataset.dropped))
}

fn column_matches(header: &str, wanted: &str) -> bool {
    header.trim().to_lowercase() == wanted.trim().to_lowercase()
}

fn clean(value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() { None } else { Some(v.to_string()) }
}

fn load_csv(file: &Path, columns: &Columns, dataset: &mut LoadedDataset) -> Result<(), LoadError> {
    let csv_err = |source| LoadError::Csv { path: file.to_path_buf(), source };
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(file).map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();

    let find = |wanted: &str| {
        headers.iter().position(|h| column_matches(h, wanted)).ok_or_else(|| LoadError::MissingColumn {
            path: file.to_path_buf(),
            column: wanted.to_string(),
            found: headers.iter().map(str::to_string).collect(),
        })
    };
    let title_idx = find(&columns.title)?;
    let genre_idx = find(&columns.genre)?;

    for row in reader.records() {
        let row = row.map_err(csv_err)?;
        dataset.push(row.get(title_idx).and_then(clean), row.get(genre_idx).and_then(clean));
    }
    Ok(())
}

fn load_jsonl(file: &Path, columns: &Columns, dataset: &mut LoadedDataset) -> Result<(), LoadError> {
    let f = File::open(file).map_err(|source| LoadError::Io { path: file.to_path_buf(), source })?;
    let reader = BufReader::new(f);
    for line in reader.lines() {
        let line = line.map_err(|source| LoadError::Io { path: file.to_path_buf(), source })?;
        if line.trim().is_empty() { continue; }
        let value: Value = serde_json::from_str(&line).map_err(|source| LoadError::Json { path: file.to_path_buf(), source })?;
        ingest_value(&value, columns, dataset);
    }
    Ok(())
}

fn load_json(file: &Path, columns: &Columns, dataset: &mut LoadedDataset) -> Result<(), LoadError> {
    let f = File::open(file).map_err(|source| LoadError::Io { path: file.to_path_buf(), source })?;
    let json: Value = serde_json::from_reader(BufReader::new(f)).map_err(|source| LoadError::Json { path: file.to_path_buf(), source })?;
    match json {
        Value::Array(arr) => {
            for v in &arr {
                ingest_value(v, columns, dataset);
            }
        }
        Value::Object(_) => ingest_value(&json, columns, dataset),
        other => {
            let source = serde::de::Error::custom(format!("expected an object or an array of objects, found {other}"));
            return Err(LoadError::Json { path: file.to_path_buf(), source });
        }
    }
    Ok(())
}

fn ingest_value(value: &Value, columns: &Columns, dataset: &mut LoadedDataset) {
    let Value::Object(obj) = value else {
        dataset.dropped += 1;
        return;
    };
    let field = |wanted: &str| {
        obj.iter()
            .find(|(k, _)| column_matches(k, wanted))
            .and_then(|(_, v)| scalar_text(v))
    };
    dataset.push(field(&columns.title), field(&columns.genre));
}

/// Text of a JSON value; genre lists are joined with spaces.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => clean(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            if parts.is_empty() { None } else { Some(parts.join(" ")) }
        }
        Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecsysError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn csv_headers_match_case_insensitively() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies.csv");
        fs::write(&path, " Title ,YEAR, GENRE\nSholay,1975,Action Adventure\n,1990,Drama\nDon,1978,\n").unwrap();

        let ds = load_records(&path, &Columns::default()).unwrap();
        assert_eq!(ds.records, vec![Record::new("Sholay", "Action Adventure")]);
        assert_eq!(ds.dropped, 2);
    }

    #[test]
    fn csv_missing_column_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies.csv");
        fs::write(&path, "title,year\nSholay,1975\n").unwrap();

        let err = load_records(&path, &Columns::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { ref column, .. } if column == "genre"));
    }

    #[test]
    fn json_array_and_genre_lists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies.json");
        fs::write(&path, r#"[{"Title": "Lagaan", "genre": ["Drama", "Sport"]}, {"title": null, "genre": "Drama"}]"#).unwrap();

        let ds = load_records(&path, &Columns::default()).unwrap();
        assert_eq!(ds.records, vec![Record::new("Lagaan", "Drama Sport")]);
        assert_eq!(ds.dropped, 1);
    }

    #[test]
    fn directory_is_walked_in_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.jsonl"), "{\"title\":\"B\",\"genre\":\"comedy\"}\n\n").unwrap();
        fs::write(dir.path().join("a.csv"), "title,genre\nA,drama\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let ds = load_records(dir.path(), &Columns::default()).unwrap();
        assert_eq!(ds.files, 2);
        assert_eq!(ds.records, vec![Record::new("A", "drama"), Record::new("B", "comedy")]);
    }

    #[test]
    fn scalar_json_document_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.json");
        fs::write(&path, "42\n").unwrap();

        let err = load_records(&path, &Columns::default()).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn broken_link_in_directory_is_an_io_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "title,genre\nA,drama\n").unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing.csv"), dir.path().join("b.csv")).unwrap();

        let err = load_records(dir.path(), &Columns::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn load_index_reports_dropped_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies.csv");
        fs::write(&path, "title,genre\nA,action\nB,\nC,action drama\n").unwrap();

        let (index, dropped) = load_index(&path, &Columns::default(), VectorizerOptions::default()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn load_index_wraps_loader_failures() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies.csv");
        fs::write(&path, "title,year\nA,1975\n").unwrap();

        let err = load_index(&path, &Columns::default(), VectorizerOptions::default()).unwrap_err();
        assert!(matches!(err, RecsysError::Load(LoadError::MissingColumn { .. })));
    }

    #[test]
    fn load_index_rejects_header_only_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies.csv");
        fs::write(&path, "title,genre\n").unwrap();

        let err = load_index(&path, &Columns::default(), VectorizerOptions::default()).unwrap_err();
        assert!(matches!(err, RecsysError::EmptyDataset));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_records("movies.xlsx", &Columns::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }

    #[test]
    fn custom_column_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies.csv");
        fs::write(&path, "name,genres\nDil Se,Romance Drama\n").unwrap();

        let columns = Columns { title: "Name".into(), genre: "Genres".into() };
        let ds = load_records(&path, &columns).unwrap();
        assert_eq!(ds.records.len(), 1);
    }
}
