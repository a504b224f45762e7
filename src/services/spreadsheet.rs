use std::path::Path;

use rust_xlsxwriter::{Workbook, XlsxError};

use crate::domain::job::{JobTable, COLUMNS};

/// Default export filename, written into the working directory.
pub const EXPORT_FILE: &str = "Glassdoor Jobs.xlsx";

/// Writes the table to a single-sheet workbook: header row, one row per
/// record, no index column. An existing file at `path` is replaced.
pub fn save_table(table: &JobTable, path: impl AsRef<Path>) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (column, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, column as u16, *name)?;
    }
    for (row, cells) in table.rows().iter().enumerate() {
        for (column, value) in cells.iter().enumerate() {
            worksheet.write_string(row as u32 + 1, column as u16, value.as_str())?;
        }
    }

    workbook.save(path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use calamine::{open_workbook, Data, Reader, Xlsx};

    use super::*;
    use crate::domain::job::JobRecord;

    fn tmp_file(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("jobscout_{}", name));
        let _ = fs::remove_file(&path);
        path
    }

    fn read_rows(path: &PathBuf) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();

        range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::String(value) => value.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    fn sample_records() -> Vec<JobRecord> {
        vec![
            JobRecord {
                company: "Acme Corp".to_string(),
                position: "Data Scientist".to_string(),
                location: "Chicago, IL".to_string(),
                rating: Some("3.5".to_string()),
                salary_estimate: Some("$80K - $120K".to_string()),
                size: Some("1001 to 5000 employees".to_string()),
                founded: Some("1987".to_string()),
                company_type: Some("Company - Private".to_string()),
                industry: Some("Computer Hardware & Software".to_string()),
                sector: Some("Information Technology".to_string()),
                revenue: Some("$100 to $500 million (USD)".to_string()),
            },
            JobRecord {
                company: "Stealth Startup".to_string(),
                position: "ML Engineer".to_string(),
                location: "Remote".to_string(),
                rating: None,
                salary_estimate: None,
                size: None,
                founded: None,
                company_type: None,
                industry: None,
                sector: None,
                revenue: None,
            },
        ]
    }

    #[test]
    fn export_round_trips_rows_and_columns() {
        let table = JobTable::from_records(sample_records());
        let path = tmp_file("round_trip.xlsx");

        save_table(&table, &path).unwrap();
        let cells = read_rows(&path);

        assert_eq!(cells[0], COLUMNS.map(String::from).to_vec());
        assert_eq!(cells[1], table.rows()[0].to_vec());
        assert_eq!(cells[2], table.rows()[1].to_vec());
        assert_eq!(cells.len(), 3);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn export_replaces_an_existing_file() {
        let both = JobTable::from_records(sample_records());
        let one = JobTable::from_records(sample_records()[..1].to_vec());
        let path = tmp_file("replace.xlsx");

        save_table(&both, &path).unwrap();
        save_table(&one, &path).unwrap();
        let cells = read_rows(&path);

        // Header plus the single surviving record.
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1][0], "Acme Corp");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn empty_table_exports_header_only() {
        let table = JobTable::new();
        let path = tmp_file("empty.xlsx");

        save_table(&table, &path).unwrap();
        let cells = read_rows(&path);

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0], COLUMNS.map(String::from).to_vec());

        let _ = fs::remove_file(&path);
    }
}
