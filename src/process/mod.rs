// src/process/mod.rs

pub mod dates;
pub mod generate;
pub mod rows;

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::error::IndexError;
use crate::files;
use crate::process::generate::DocGenerator;
use crate::process::rows::RowReader;
use crate::schema::Reconciler;
use crate::sink::Sink;

/// Run one report file through the pipeline into `sink`. With no explicit
/// `file_name`, the file with the most recent name-date is picked.
pub fn process_file(
    reconciler: &mut Reconciler,
    sink: &mut Sink,
    data_path: &Path,
    file_name: Option<&str>,
    index: &str,
    day_first: bool,
) -> Result<u64> {
    let file_name = match file_name {
        Some(name) => name.to_string(),
        None => files::latest_file(data_path)?,
    };
    let data_file = data_path.join(&file_name);
    if !data_file.is_file() {
        return Err(IndexError::MissingFile { path: data_file }.into());
    }

    let generator = DocGenerator::new(&file_name, index, day_first)?;
    let reader = RowReader::open(&data_file)?;

    info!(file = %file_name, date = generator.file_date(), "processing");
    let accepted = sink.accept(generator.generate(reconciler, reader))?;
    info!(file = %file_name, docs = accepted, "processed");
    Ok(accepted)
}

/// Process every report file found in `data_path`, sequentially, through
/// the same reconciliation session.
pub fn process_all_files(
    reconciler: &mut Reconciler,
    sink: &mut Sink,
    data_path: &Path,
    index: &str,
    day_first: bool,
) -> Result<u64> {
    let file_map = files::scan_directory(data_path)?;
    let mut total = 0;
    for name in file_map.keys() {
        total += process_file(reconciler, sink, data_path, Some(name), index, day_first)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::generate::{Document, DATE_DATA_FILE};
    use crate::schema::CanonicalSchema;
    use std::fs;
    use tempfile::tempdir;

    fn reconciler() -> Reconciler {
        Reconciler::new(CanonicalSchema::from_fields([
            "Province/State",
            "Country/Region",
            "Last Update",
        ]))
    }

    #[test]
    fn end_to_end_summary_row() -> Result<()> {
        let tmp = tempdir()?;
        let name = "01-01-2021.csv";
        fs::write(
            tmp.path().join(name),
            "Province_State,Country_Region,Last_Update\nX,Y,2021-01-01 10:00\n",
        )?;

        let mut rec = reconciler();
        let generator = DocGenerator::new(name, "covid_summary", false).unwrap();
        let reader = RowReader::open(tmp.path().join(name))?;
        let docs: Vec<Document> = generator
            .generate(&mut rec, reader)
            .collect::<Result<_>>()?;

        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.index, "covid_summary");
        assert_eq!(doc.fields["Province/State"], "X");
        assert_eq!(doc.fields["Country/Region"], "Y");
        assert_eq!(doc.fields["Last Update"], "2021-01-01");
        assert_eq!(doc.fields[DATE_DATA_FILE], "2021-01-01");
        assert_eq!(doc.fields.len(), 4);
        Ok(())
    }

    #[test]
    fn process_file_defaults_to_latest() -> Result<()> {
        let tmp = tempdir()?;
        fs::write(
            tmp.path().join("12-31-2020.csv"),
            "Province_State\nOld\nOlder\n",
        )?;
        fs::write(tmp.path().join("01-01-2021.csv"), "Province_State\nNew\n")?;

        let mut rec = reconciler();
        let mut sink = Sink::Check;
        let accepted = process_file(&mut rec, &mut sink, tmp.path(), None, "covid_summary", false)?;
        // Only the most recent file's single row.
        assert_eq!(accepted, 1);
        Ok(())
    }

    #[test]
    fn process_all_files_walks_the_directory() -> Result<()> {
        let tmp = tempdir()?;
        fs::write(
            tmp.path().join("12-31-2020.csv"),
            "Province_State\nA\nB\n",
        )?;
        fs::write(tmp.path().join("01-01-2021.csv"), "Province_State\nC\n")?;

        let mut rec = reconciler();
        let mut sink = Sink::Check;
        let accepted =
            process_all_files(&mut rec, &mut sink, tmp.path(), "covid_summary", false)?;
        assert_eq!(accepted, 3);
        Ok(())
    }

    #[test]
    fn named_file_must_exist() {
        let tmp = tempdir().unwrap();
        let mut rec = reconciler();
        let mut sink = Sink::Check;
        let err = process_file(
            &mut rec,
            &mut sink,
            tmp.path(),
            Some("01-01-2021.csv"),
            "covid_summary",
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("01-01-2021.csv"));
    }

    #[test]
    fn check_mode_surfaces_schema_drift() -> Result<()> {
        let tmp = tempdir()?;
        let name = "01-01-2021.csv";
        fs::write(tmp.path().join(name), "zzzz\nX\n")?;

        let mut rec = reconciler();
        let mut sink = Sink::Check;
        let err = process_file(
            &mut rec,
            &mut sink,
            tmp.path(),
            Some(name),
            "covid_summary",
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("zzzz"));
        Ok(())
    }

    #[test]
    fn aliases_learned_in_one_file_carry_to_the_next() -> Result<()> {
        let tmp = tempdir()?;
        fs::write(tmp.path().join("12-31-2020.csv"), "Province-State\nA\n")?;
        fs::write(tmp.path().join("01-01-2021.csv"), "Province-State\nB\n")?;

        let mut rec = reconciler();
        let before = rec.alias_count();
        let mut sink = Sink::Check;
        process_all_files(&mut rec, &mut sink, tmp.path(), "covid_summary", false)?;
        // One learning event across both files; the session remembers.
        assert_eq!(rec.alias_count(), before + 1);
        Ok(())
    }
}
