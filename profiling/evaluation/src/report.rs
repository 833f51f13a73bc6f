//! Tabular summary of a result tree, one CSV row per (algorithm, swept value,
//! latency, packet loss).

use super::errors::*;
use super::index::pool;
use super::{ResultFile, Spread, Summary, SweepAxis};
use std::io::Write;

/// A row of the summary report. Statistics are empty when the loss value had
/// no samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    /// Signature algorithm.
    pub algorithm: String,
    /// Swept parameter name (`initcwnd` or `mtu`).
    pub axis: String,
    /// Swept parameter value.
    pub value: f64,
    /// One-way delay in ms.
    pub latency: f64,
    /// Packet loss in percent.
    pub loss: f64,
    /// Number of pooled samples.
    pub count: usize,
    /// Median handshake time (ms).
    pub median: Option<f64>,
    /// 90th percentile handshake time (ms).
    pub p90: Option<f64>,
    /// Mean handshake time (ms).
    pub mean: Option<f64>,
    /// Standard error of the mean (ms).
    pub stderr: Option<f64>,
}

/// Loads `files` and summarizes every packet loss value of every series, in
/// (algorithm, value, latency, loss) order.
pub fn summarize(files: &[ResultFile], axis: SweepAxis) -> Vec<SummaryRecord> {
    let mut records = Vec::new();
    for (key, by_loss) in pool(files) {
        for (loss, samples) in by_loss {
            let summary = Summary::of(&samples);
            let spread = Spread::of(&samples);
            records.push(SummaryRecord {
                algorithm: key.algorithm.clone(),
                axis: axis.name().to_string(),
                value: key.value.value(),
                latency: key.latency.value(),
                loss: loss.value(),
                count: summary.map_or(0, |s| s.count),
                median: summary.map(|s| s.median),
                p90: summary.map(|s| s.p90),
                mean: spread.map(|s| s.mean),
                stderr: spread.map(|s| s.stderr),
            });
        }
    }
    records
}

/// Writes `records` as CSV with a header line.
pub fn write_report<W: Write>(records: &[SummaryRecord], out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::fixture::DataDir;
    use crate::{scan, ScanFilter};

    #[test]
    fn test_summarize_tree() {
        let data = DataDir::new("report-summarize");
        data.write("initcwnd=10/latency=20.000ms/falcon512.csv", "0,2,4,6\n6\n");
        data.write("initcwnd=20/latency=20.000ms/falcon512.csv", "0,10\n");

        let files = scan(data.path(), SweepAxis::Initcwnd, &ScanFilter::new()).unwrap();
        let records = summarize(&files, SweepAxis::Initcwnd);
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.algorithm, "falcon512");
        assert_eq!(first.axis, "initcwnd");
        assert_eq!((first.value, first.loss, first.count), (10.0, 0.0, 3));
        assert_eq!(first.median, Some(4.0));
        assert_eq!(first.mean, Some(4.0));

        let empty = &records[1];
        assert_eq!((empty.value, empty.loss, empty.count), (10.0, 6.0, 0));
        assert_eq!(empty.median, None);
        assert_eq!(empty.stderr, None);

        assert_eq!(records[2].value, 20.0);
        assert!(records.iter().all(|r| r.latency == 20.0));
    }

    #[test]
    fn test_write_report() {
        let records = vec![SummaryRecord {
            algorithm: "mayo1".to_string(),
            axis: "mtu".to_string(),
            value: 1500.0,
            latency: 20.0,
            loss: 0.1,
            count: 0,
            median: None,
            p90: None,
            mean: None,
            stderr: None,
        }];
        let mut out = Vec::new();
        write_report(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("algorithm,axis,value,latency,loss,count,median,p90,mean,stderr")
        );
        assert_eq!(lines.next(), Some("mayo1,mtu,1500.0,20.0,0.1,0,,,,"));
    }
}
