use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::Point;

/// The location database as plain text cells. Columns nobody here knows about are written back
/// untouched.
pub struct LocationTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl LocationTable {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Self::parse(file).with_context(|| format!("reading {}", path.display()))
    }

    pub fn parse<R: Read>(input: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(input);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        for required in ["id", "lat", "lon"] {
            if !headers.iter().any(|header| header == required) {
                bail!("no {required} column");
            }
        }
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    pub fn write<W: Write>(&self, output: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(output);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        self.write(BufWriter::new(file))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Appends an empty column unless one with this name exists already.
    pub fn column_or_insert(&mut self, name: &str) -> usize {
        if let Some(column) = self.column(name) {
            return column;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    pub fn get(&self, row: usize, column: usize) -> &str {
        &self.rows[row][column]
    }

    pub fn set(&mut self, row: usize, column: usize, value: String) {
        self.rows[row][column] = value;
    }

    pub fn id(&self, row: usize) -> &str {
        match self.column("id") {
            Some(column) => self.get(row, column),
            None => "",
        }
    }

    pub fn find(&self, id: &str) -> Option<usize> {
        (0..self.len()).find(|row| self.id(*row) == id)
    }

    pub fn point(&self, row: usize) -> Result<Point> {
        let coordinate = |name: &str| -> Result<f64> {
            let Some(column) = self.column(name) else {
                bail!("no {name} column");
            };
            let value = self.get(row, column);
            value
                .trim()
                .parse()
                .with_context(|| format!("bad {name} {value:?} for {}", self.id(row)))
        };
        Ok(Point::new(coordinate("lon")?, coordinate("lat")?))
    }
}
