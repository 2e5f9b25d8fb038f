use std::path::PathBuf;

use csv_core::WriteResult;

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Format {
    Table,
    Jsonl,
    Csv,
}

#[derive(clap::Parser)]
#[group(id = "output::Args")]
pub struct Args {
    /// Write to this file instead of the terminal.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
    #[arg(long, short='f', value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("could not open the specified output file at {1:?}")]
    OpenOutputFile(#[source] std::io::Error, PathBuf),
    #[error("could not write data to the output file at {1:?}")]
    WriteFile(#[source] std::io::Error, PathBuf),
    #[error("could not write data to the terminal")]
    WriteStdout(#[source] std::io::Error),
    #[error("could not serialize a record to JSON")]
    SerializeJson(#[source] serde_json::Error),
    #[error("csv headers must be written before any record")]
    LateCsvHeaders,
}

impl Args {
    pub fn to_output(self) -> Result<Output, Error> {
        let io = match &self.output {
            None => Box::new(std::io::stdout().lock()) as Box<dyn std::io::Write>,
            Some(path) => Box::new(
                std::fs::OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)
                    .map_err(|e| Error::OpenOutputFile(e, path.clone()))?,
            ) as Box<_>,
        };
        Ok(Output::new(io, self.format, self.output))
    }
}

pub struct Output {
    path: Option<PathBuf>,
    io: Box<dyn std::io::Write>,
    formatter: Formatter,
}

enum Formatter {
    Csv { written_records: bool },
    Table { comfy: comfy_table::Table },
    Jsonl,
}

impl Output {
    pub fn new(io: Box<dyn std::io::Write>, format: Format, path: Option<PathBuf>) -> Self {
        let formatter = match format {
            Format::Table => {
                let mut comfy = comfy_table::Table::new();
                comfy.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
                Formatter::Table { comfy }
            }
            Format::Jsonl => Formatter::Jsonl,
            Format::Csv => Formatter::Csv { written_records: false },
        };
        Output { path, io, formatter }
    }

    pub fn table_headers(&mut self, hdrs: &[&'static str]) -> Result<(), Error> {
        match &mut self.formatter {
            Formatter::Csv { written_records } => {
                if *written_records {
                    return Err(Error::LateCsvHeaders);
                }
                *written_records = true;
                self.write_csv_row(hdrs)?;
            }
            Formatter::Table { comfy } => {
                comfy.set_header(hdrs.to_vec());
            }
            Formatter::Jsonl => {}
        }
        Ok(())
    }

    fn write_csv_row<V: AsRef<str>>(&mut self, values: &[V]) -> Result<(), Error> {
        // Quoting at most doubles a field, plus the surrounding quotes.
        let max_len = 2 + 2 * values.iter().map(|v| v.as_ref().len()).max().unwrap_or(0);
        let mut output = vec![0; max_len];
        let mut writer = csv_core::Writer::new();
        let mut row = Vec::new();
        for (idx, value) in values.iter().enumerate() {
            if idx != 0 {
                let (_, ob) = writer.delimiter(&mut output);
                row.extend_from_slice(&output[..ob]);
            }
            let mut input = value.as_ref().as_bytes();
            loop {
                let (result, ib, ob) = writer.field(input, &mut output);
                row.extend_from_slice(&output[..ob]);
                input = &input[ib..];
                if let WriteResult::InputEmpty = result {
                    break;
                }
            }
        }
        let (_, ob) = writer.terminator(&mut output);
        row.extend_from_slice(&output[..ob]);
        self.io.write_all(&row).map_err(|e| self.write_error(e))
    }

    pub fn result<R: serde::Serialize>(
        &mut self,
        table_row: impl FnOnce() -> Vec<String>,
        serde_record: impl FnOnce() -> R,
    ) -> Result<(), Error> {
        match &mut self.formatter {
            Formatter::Csv { written_records } => {
                *written_records = true;
                let values = table_row();
                self.write_csv_row(&values)?;
            }
            Formatter::Table { comfy } => {
                comfy.add_row(table_row());
            }
            Formatter::Jsonl => {
                serde_json::to_writer(&mut self.io, &serde_record())
                    .map_err(Error::SerializeJson)?;
                writeln!(self.io).map_err(|e| self.write_error(e))?
            }
        }
        Ok(())
    }

    fn write_error(&self, e: std::io::Error) -> Error {
        match &self.path {
            None => Error::WriteStdout(e),
            Some(p) => Error::WriteFile(e, p.into()),
        }
    }

    pub fn commit(mut self) -> Result<(), Error> {
        if let Formatter::Table { comfy } = &self.formatter {
            writeln!(self.io, "{comfy}").map_err(|e| self.write_error(e))?;
        }
        self.io.flush().map_err(|e| self.write_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);
    impl std::io::Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn render(format: Format) -> String {
        let sink = Sink::default();
        let mut output = Output::new(Box::new(sink.clone()), format, None);
        output.table_headers(&["channel", "value"]).unwrap();
        output
            .result(
                || vec!["supply-air-flap-position".into(), "open, \"really\"".into()],
                || serde_json::json!({ "channel": "supply-air-flap-position", "value": "open" }),
            )
            .unwrap();
        output.commit().unwrap();
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn csv_rows_are_quoted() {
        assert_eq!(
            render(Format::Csv),
            "channel,value\nsupply-air-flap-position,\"open, \"\"really\"\"\"\n"
        );
    }

    #[test]
    fn jsonl_skips_headers() {
        assert_eq!(
            render(Format::Jsonl),
            "{\"channel\":\"supply-air-flap-position\",\"value\":\"open\"}\n"
        );
    }

    #[test]
    fn table_contains_cells() {
        let table = render(Format::Table);
        assert!(table.contains("channel"));
        assert!(table.contains("supply-air-flap-position"));
    }

    #[test]
    fn headers_after_records() {
        let mut output = Output::new(Box::new(Sink::default()), Format::Csv, None);
        output.result(|| vec!["a".into()], || "a").unwrap();
        assert!(matches!(output.table_headers(&["x"]), Err(Error::LateCsvHeaders)));
    }
}
