use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// One trial of an experiment: the independent variable (packet loss) and
/// all handshake times measured under it. Constructed from a CSV line.
///
/// ```ignore
/// 0,41.32,40.87,43.10,41.95
/// 0.1,41.90,42.33,40.76,44.02
/// 1,44.81,41.20,47.65,42.19
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    /// The independent variable, e.g. packet loss in percent.
    pub value: f64,

    /// Raw handshake times in milliseconds.
    pub samples: Vec<f64>,
}

/// Take a reader (file, string, etc.) and return all well-formed rows.
///
/// Rows are skipped, never fatal: a blank line, a first field that is not a
/// decimal, or a sample that is not a decimal drops that row only. Empty
/// sample fields are ignored.
pub fn read_rows<R: Read>(rdr: R) -> Vec<MeasurementRow> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    reader
        .records()
        .enumerate()
        .filter_map(|(line, record)| match record {
            Ok(record) => {
                let row = parse_record(&record);
                if row.is_none() {
                    debug!("skipping malformed row {}: {:?}", line + 1, record);
                }
                row
            }
            Err(e) => {
                debug!("skipping unreadable row {}: {}", line + 1, e);
                None
            }
        })
        .collect()
}

/// Opens `path` and reads all well-formed rows. Only failing to open the file
/// is an error.
pub fn load_rows<P: AsRef<Path>>(path: P) -> io::Result<Vec<MeasurementRow>> {
    let file = File::open(path)?;
    Ok(read_rows(file))
}

fn parse_record(record: &csv::StringRecord) -> Option<MeasurementRow> {
    let mut fields = record.iter();
    let value = fields.next()?.parse::<f64>().ok()?;
    let samples = fields
        .filter(|f| !f.is_empty())
        .map(|f| f.parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .ok()?;

    Some(MeasurementRow {
        value: value,
        samples: samples,
    })
}
