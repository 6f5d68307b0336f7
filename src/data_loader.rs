// src/data_loader.rs

use log::info;

use crate::error::{DataTableError, Result};

/// One row of the data set, values aligned with `TableData::fields`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub values: Vec<String>,
}

impl Record {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Record {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn get(&self, field: usize) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableData {
    pub fields: Vec<String>,
    pub rows: Vec<Record>,
}

impl TableData {
    pub fn new(fields: Vec<String>, rows: Vec<Record>) -> Self {
        TableData { fields, rows }
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    pub fn value(&self, row: usize, field: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(field))
    }
}

pub trait DataLoader {
    fn load(&self, path: &str) -> Result<TableData>;
}

pub struct CsvLoader;

impl DataLoader for CsvLoader {
    fn load(&self, path: &str) -> Result<TableData> {
        let mut reader = csv::Reader::from_path(path)?;
        let fields = reader
            .headers()?
            .iter()
            .map(String::from)
            .collect::<Vec<String>>();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            // Short records are padded so every row lines up with the header.
            let mut values: Vec<String> = record.iter().map(String::from).collect();
            values.resize(fields.len(), String::new());
            rows.push(Record { values });
        }

        info!("loaded {} rows with {} fields from {}", rows.len(), fields.len(), path);
        Ok(TableData::new(fields, rows))
    }
}

pub fn get_loader(extension: &str) -> Result<Box<dyn DataLoader>> {
    match extension.to_lowercase().as_str() {
        "csv" => Ok(Box::new(CsvLoader)),

        _ => Err(DataTableError::UnsupportedFormat(extension.to_string())),
    }
}

/// People shown when no file is given.
pub fn sample_data() -> TableData {
    TableData::new(
        ["id", "nombre", "apellido", "email", "pais"]
            .into_iter()
            .map(String::from)
            .collect(),
        vec![
            Record::new(["1", "Juan", "Pérez", "JuanPerez@gmail.com", "Argentina"]),
            Record::new(["2", "María", "Gómez", "Maria@outlook.com", "Brasil"]),
            Record::new(["3", "Pedro", "Martínez", "pp@photmail.com", "Perú"]),
        ],
    )
}
