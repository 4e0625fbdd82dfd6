//! Utilities for working with CSV files. Fields are separated by commas and never quoted.

use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

pub struct CsvWriter<W: Write = BufWriter<File>> {
    writer: W,
}
impl CsvWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}
impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn append<R>(&mut self, record: R) -> Result<(), io::Error>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        let mut first = true;
        for datum in record.into_iter() {
            if first {
                first = false;
            } else {
                self.writer.write_all(",".as_bytes())?;
            }
            let str: &str = datum.as_ref();
            self.writer.write_all(str.as_bytes())?;
        }
        self.writer.write_all("\n".as_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), io::Error> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

pub struct CsvReader<R: BufRead = BufReader<File>> {
    lines: Lines<R>,
}
impl CsvReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}
impl<R: BufRead> CsvReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    pub fn read(&mut self) -> Option<Result<Vec<String>, io::Error>> {
        self.lines
            .next()
            .map(|line| line.map(|line| line.split(',').map(ToString::to_string).collect()))
    }
}

impl<R: BufRead> Iterator for CsvReader<R> {
    type Item = Result<Vec<String>, io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_records() {
        let data = "game_id,home_odds\n2023020001,-150\n\n2023020002,+130";
        let records: Vec<_> = CsvReader::new(data.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            vec![
                vec!["game_id".to_string(), "home_odds".to_string()],
                vec!["2023020001".to_string(), "-150".to_string()],
                vec!["".to_string()],
                vec!["2023020002".to_string(), "+130".to_string()],
            ],
            records
        );
    }

    #[test]
    fn write_records() {
        let mut writer = CsvWriter::new(Vec::new());
        writer.append(["game_id", "profit"]).unwrap();
        writer.append(vec!["1".to_string(), "66.67".to_string()]).unwrap();
        writer.flush().unwrap();
        assert_eq!(
            "game_id,profit\n1,66.67\n",
            String::from_utf8(writer.into_inner()).unwrap()
        );
    }
}
