//! The three chart families produced from a `ResultIndex`:
//!
//! * initcwnd sweep: one chart per (algorithm, metric), one line per initcwnd,
//!   packet loss on the x axis;
//! * MTU sweep: the same with one line per MTU;
//! * categories: one chart per (family, packet loss), one line per
//!   algorithm, initcwnd on the x axis.
//!
//! Jitter is applied to copies of the points right before drawing. Latencies
//! are never mixed in one chart: when the data holds several, every chart is
//! drawn once per latency and the file name carries the latency.

use super::chart::{self, ChartSpec, Legend, Line, Marker, Style, Ticks};
use super::errors::*;
use super::{points, AxisValue, Family, Jitter, Metric, ResultIndex, ScanFilter, EXCLUDED_ALGORITHM};
use plotters::style::RGBColor;
use std::path::{Path, PathBuf};

/// initcwnd values that get a line (exponentially spaced).
pub const INITCWND_LINES: [f64; 5] = [5.0, 10.0, 20.0, 40.0, 80.0];

/// Relative jitter for initcwnd median charts.
pub const INITCWND_MEDIAN_JITTER: f64 = 0.035;

/// MTU values that get a line, with the initcwnd they were paired with.
pub const MTU_LINES: [(f64, u32); 3] = [(1500.0, 12), (3000.0, 6), (9000.0, 2)];

/// Relative jitter for MTU median charts.
pub const MTU_MEDIAN_JITTER: f64 = 0.02;

/// Packet loss values that get a category chart.
pub const CATEGORY_LOSSES: [f64; 4] = [0.0, 6.0, 12.0, 18.0];

/// Standard deviation (ms) of the normal jitter for category charts.
pub const CATEGORY_JITTER: f64 = 0.75;

const RED: RGBColor = RGBColor(255, 0, 0);
const ORANGE: RGBColor = RGBColor(255, 165, 0);
const GOLD: RGBColor = RGBColor(255, 215, 0);
const LIME: RGBColor = RGBColor(0, 255, 0);
const GREEN: RGBColor = RGBColor(0, 128, 0);
const DARK_GREEN: RGBColor = RGBColor(0, 100, 0);
const BLUE: RGBColor = RGBColor(0, 0, 255);
const INDIGO: RGBColor = RGBColor(75, 0, 130);
const PURPLE: RGBColor = RGBColor(128, 0, 128);

const INITCWND_STYLES: [Style; 5] = [
    Style::new(RED, Marker::Circle),
    Style::new(ORANGE, Marker::Square),
    Style::new(GOLD, Marker::Triangle),
    Style::new(LIME, Marker::Cross),
    Style::new(GREEN, Marker::Triangle),
];

const MTU_STYLES: [Style; 3] = [
    Style::new(RED, Marker::Circle),
    Style::new(GREEN, Marker::Square),
    Style::new(BLUE, Marker::Triangle),
];

const STANDARDISED_STYLES: [Style; 6] = [
    Style::new(LIME, Marker::Cross),
    Style::new(INDIGO, Marker::Square),
    Style::new(DARK_GREEN, Marker::Cross),
    Style::new(RED, Marker::Circle),
    Style::new(GOLD, Marker::Circle),
    Style::new(ORANGE, Marker::Circle),
];

const CANDIDATE_STYLES: [Style; 4] = [
    Style::new(PURPLE, Marker::Circle),
    Style::new(BLUE, Marker::Circle),
    Style::new(RED, Marker::Circle),
    Style::new(GREEN, Marker::Cross),
];

fn loss_ticks(metric: Metric) -> Ticks {
    let end = match metric {
        Metric::Median => 20.0,
        Metric::P90 => 18.0,
    };
    Ticks {
        start: 0.0,
        end: end,
        step: 2.0,
    }
}

fn sweep_spec(algorithm: &str, metric: Metric, ticks: Ticks, legend: Legend) -> ChartSpec {
    ChartSpec {
        title: format!("{} - {} Handshake Time", algorithm, metric.title()),
        x_desc: "Packet Loss (%)".to_string(),
        y_desc: "Handshake Time (ms)".to_string(),
        x_ticks: ticks,
        legend: legend,
    }
}

/// Output file name of an initcwnd chart.
pub fn initcwnd_file_name(algorithm: &str, metric: Metric) -> String {
    format!("{}_{}.svg", algorithm.to_lowercase(), metric.tag())
}

/// Output file name of an MTU chart.
pub fn mtu_file_name(algorithm: &str, metric: Metric) -> String {
    format!("{}_mtu_{}.svg", algorithm.to_lowercase(), metric.tag())
}

/// Output file name of a category chart.
pub fn category_file_name(family: Family, loss: f64) -> String {
    format!("{}_{}.svg", family.file_stem(), AxisValue(loss))
}

/// Appends the latency to a file name, e.g. `falcon512_median_200ms.svg`.
pub fn tagged_file_name(name: &str, latency: Option<AxisValue>) -> String {
    match latency {
        Some(l) => format!("{}_{}ms.svg", name.trim_end_matches(".svg"), l),
        None => name.to_string(),
    }
}

fn tagged_title(title: String, latency: Option<AxisValue>) -> String {
    match latency {
        Some(l) => format!("{} ({} ms latency)", title, l),
        None => title,
    }
}

/// Files read by the initcwnd charts.
pub fn initcwnd_filter(latency: Option<f64>) -> ScanFilter {
    ScanFilter::new().latency(latency)
}

/// Files read by the MTU charts. The excluded algorithm is left out.
pub fn mtu_filter(latency: Option<f64>) -> ScanFilter {
    ScanFilter::new().exclude(EXCLUDED_ALGORITHM).latency(latency)
}

/// Files read by the category charts. The excluded algorithm is left out.
pub fn category_filter(latency: Option<f64>) -> ScanFilter {
    ScanFilter::new().exclude(EXCLUDED_ALGORITHM).latency(latency)
}

/// Splits `index` per latency. The latency is only returned when there is
/// more than one, so single-latency runs keep plain file names.
pub fn latency_slices(index: &ResultIndex) -> Vec<(ResultIndex, Option<AxisValue>)> {
    let latencies = index.latencies();
    if latencies.len() <= 1 {
        return vec![(index.clone(), None)];
    }
    latencies
        .into_iter()
        .map(|l| (index.at_latency(l), Some(l)))
        .collect()
}

/// One line per allowed initcwnd value, packet loss on the x axis.
pub fn initcwnd_lines(index: &ResultIndex, algorithm: &str, metric: Metric) -> Vec<Line> {
    let by_value = index.by_algorithm(algorithm);
    INITCWND_LINES
        .iter()
        .filter_map(|&cwnd| {
            by_value.get(&AxisValue(cwnd)).map(|series| Line {
                label: format!("initcwnd = {}", AxisValue(cwnd)),
                points: points(series, metric),
            })
        })
        .collect()
}

/// One line per MTU in `MTU_LINES`, packet loss on the x axis.
pub fn mtu_lines(index: &ResultIndex, algorithm: &str, metric: Metric) -> Vec<Line> {
    let by_value = index.by_algorithm(algorithm);
    MTU_LINES
        .iter()
        .filter_map(|&(mtu, cwnd)| {
            by_value.get(&AxisValue(mtu)).map(|series| Line {
                label: format!("MTU={} (initcwnd={})", AxisValue(mtu), cwnd),
                points: points(series, metric),
            })
        })
        .collect()
}

/// One line per algorithm of `family`, median at `loss` against initcwnd,
/// sorted by label.
pub fn category_lines(index: &ResultIndex, family: Family, loss: f64) -> Vec<Line> {
    index
        .at_loss(loss, Metric::Median)
        .into_iter()
        .filter(|&(ref alg, _)| Family::of(alg) == Some(family))
        .map(|(alg, by_cwnd)| Line {
            label: alg,
            points: by_cwnd.into_iter().map(|(c, m)| (c.value(), m)).collect(),
        })
        .collect()
}

fn scaled(lines: Vec<Line>, jitter: &mut Jitter, percent: f64) -> Vec<Line> {
    lines
        .into_iter()
        .map(|l| Line {
            points: jitter.scale(&l.points, percent),
            label: l.label,
        })
        .collect()
}

fn shifted(lines: Vec<Line>, jitter: &mut Jitter, amount: f64) -> Vec<Line> {
    lines
        .into_iter()
        .map(|l| Line {
            points: jitter.shift(&l.points, amount),
            label: l.label,
        })
        .collect()
}

fn render_into(out_dir: &Path, name: String, spec: &ChartSpec, lines: &[Line], styles: &[Style]) -> Result<Option<PathBuf>> {
    let path = chart::output_path(out_dir, &name)?;
    if chart::render(&path, spec, lines, styles)? {
        Ok(Some(path))
    } else {
        Ok(None)
    }
}

/// Renders median and 90th percentile charts for every algorithm in an
/// initcwnd index. Returns the written files.
pub fn plot_initcwnd(index: &ResultIndex, out_dir: &Path, jitter: &mut Jitter) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (slice, tag) in latency_slices(index) {
        for algorithm in slice.algorithms() {
            for &metric in Metric::all().iter() {
                let mut lines = initcwnd_lines(&slice, algorithm, metric);
                if metric == Metric::Median {
                    lines = scaled(lines, jitter, INITCWND_MEDIAN_JITTER);
                }
                let mut spec = sweep_spec(algorithm, metric, loss_ticks(metric), Legend::UpperRight);
                spec.title = tagged_title(spec.title, tag);
                let name = tagged_file_name(&initcwnd_file_name(algorithm, metric), tag);
                written.extend(render_into(out_dir, name, &spec, &lines, &INITCWND_STYLES)?);
            }
        }
    }
    Ok(written)
}

/// Renders median and 90th percentile charts for every algorithm in an MTU
/// index. Returns the written files.
pub fn plot_mtu(index: &ResultIndex, out_dir: &Path, jitter: &mut Jitter) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (slice, tag) in latency_slices(index) {
        for algorithm in slice.algorithms() {
            for &metric in Metric::all().iter() {
                let mut lines = mtu_lines(&slice, algorithm, metric);
                if metric == Metric::Median {
                    lines = scaled(lines, jitter, MTU_MEDIAN_JITTER);
                }
                let mut spec = sweep_spec(algorithm, metric, loss_ticks(Metric::Median), Legend::UpperLeft);
                spec.title = tagged_title(spec.title, tag);
                let name = tagged_file_name(&mtu_file_name(algorithm, metric), tag);
                written.extend(render_into(out_dir, name, &spec, &lines, &MTU_STYLES)?);
            }
        }
    }
    Ok(written)
}

/// Renders one chart per (family, packet loss) from an initcwnd index.
/// Returns the written files.
pub fn plot_categories(index: &ResultIndex, out_dir: &Path, jitter: &mut Jitter) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (slice, tag) in latency_slices(index) {
        for &loss in CATEGORY_LOSSES.iter() {
            info!("plotting categories for {}% packet loss", loss);
            for &family in Family::all().iter() {
                let lines = shifted(category_lines(&slice, family, loss), jitter, CATEGORY_JITTER);
                let xs = lines.iter().flat_map(|l| l.points.iter().map(|p| p.0));
                let (lo, hi) = xs.fold((::std::f64::INFINITY, ::std::f64::NEG_INFINITY), |(lo, hi), x| {
                    (lo.min(x), hi.max(x))
                });
                if lo > hi {
                    continue;
                }
                let spec = ChartSpec {
                    title: tagged_title(format!("{}% Packet Loss", AxisValue(loss)), tag),
                    x_desc: "initcwnd size (MSS)".to_string(),
                    y_desc: "Median Handshake Time (ms)".to_string(),
                    x_ticks: Ticks {
                        start: lo - 5.0,
                        end: hi + 5.0,
                        step: 10.0,
                    },
                    legend: Legend::UpperRight,
                };
                let styles = match family {
                    Family::Standardised => &STANDARDISED_STYLES[..],
                    Family::Candidate => &CANDIDATE_STYLES[..],
                };
                let name = tagged_file_name(&category_file_name(family, loss), tag);
                written.extend(render_into(out_dir, name, &spec, &lines, styles)?);
            }
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::fixture::DataDir;
    use crate::{scan, ResultKey, ResultSeries, Summary, SweepAxis};

    fn summary(median: f64) -> Option<Summary> {
        Some(Summary {
            count: 3,
            median: median,
            p90: median * 1.5,
        })
    }

    fn index() -> ResultIndex {
        let mut index = ResultIndex::default();
        for &(alg, cwnd, base) in [
            ("falcon512", 10.0, 40.0),
            ("falcon512", 20.0, 38.0),
            ("falcon512", 15.0, 39.0),
            ("mayo1", 10.0, 45.0),
            ("rsa3072", 10.0, 30.0),
        ]
        .iter()
        {
            let mut series = ResultSeries::new();
            series.insert(AxisValue(0.0), summary(base));
            series.insert(AxisValue(6.0), summary(base * 2.0));
            series.insert(AxisValue(12.0), None);
            index.insert(ResultKey::new(alg, cwnd, 20.0), series);
        }
        index
    }

    #[test]
    fn test_file_names() {
        assert_eq!(initcwnd_file_name("Falcon512", Metric::Median), "falcon512_median.svg");
        assert_eq!(mtu_file_name("falcon512", Metric::P90), "falcon512_mtu_90th.svg");
        assert_eq!(
            category_file_name(Family::Candidate, 6.0),
            "candidate_signature_schemes_6.svg"
        );
    }

    #[test]
    fn test_initcwnd_lines_skip_null_points_and_unlisted_values() {
        let lines = initcwnd_lines(&index(), "falcon512", Metric::Median);
        // initcwnd 15 is not plotted
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].label, "initcwnd = 10");
        assert_eq!(lines[0].points, vec![(0.0, 40.0), (6.0, 80.0)]);
        assert_eq!(lines[1].label, "initcwnd = 20");
    }

    #[test]
    fn test_category_lines() {
        let lines = category_lines(&index(), Family::Standardised, 6.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].label, "falcon512");
        assert_eq!(lines[0].points, vec![(10.0, 80.0), (15.0, 78.0), (20.0, 76.0)]);

        let lines = category_lines(&index(), Family::Candidate, 0.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].label, "mayo1");

        // no data at 12% loss
        assert!(category_lines(&index(), Family::Standardised, 12.0).is_empty());
    }

    #[test]
    fn test_jitter_leaves_index_untouched() {
        let index = index();
        let before = initcwnd_lines(&index, "falcon512", Metric::Median);
        let dir = DataDir::new("figures-jitter");
        let mut jitter = Jitter::new(42);
        let written = plot_initcwnd(&index, dir.path(), &mut jitter).unwrap();
        assert!(!written.is_empty());
        assert_eq!(initcwnd_lines(&index, "falcon512", Metric::Median), before);
    }

    #[test]
    fn test_plot_categories_writes_per_family() {
        let dir = DataDir::new("figures-categories");
        let written = plot_categories(&index(), dir.path(), &mut Jitter::new(0)).unwrap();
        assert_eq!(
            file_names(&written),
            vec![
                "standardised_signature_schemes_0.svg",
                "candidate_signature_schemes_0.svg",
                "standardised_signature_schemes_6.svg",
                "candidate_signature_schemes_6.svg",
            ]
        );
    }

    fn file_names(written: &[PathBuf]) -> Vec<String> {
        written
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_tagged_file_name() {
        assert_eq!(tagged_file_name("falcon512_median.svg", None), "falcon512_median.svg");
        assert_eq!(
            tagged_file_name("falcon512_mtu_90th.svg", Some(AxisValue(200.0))),
            "falcon512_mtu_90th_200ms.svg"
        );
    }

    #[test]
    fn test_latencies_get_separate_charts() {
        let mut index = index();
        let mut far = ResultSeries::new();
        far.insert(AxisValue(0.0), summary(400.0));
        index.insert(ResultKey::new("falcon512", 10.0, 200.0), far);

        let slices = latency_slices(&index);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[1].1, Some(AxisValue(200.0)));
        let lines = initcwnd_lines(&slices[1].0, "falcon512", Metric::Median);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].points, vec![(0.0, 400.0)]);

        let dir = DataDir::new("figures-latency");
        let written = plot_initcwnd(&index, dir.path(), &mut Jitter::new(3)).unwrap();
        let names = file_names(&written);
        assert!(names.contains(&"falcon512_median_20ms.svg".to_string()));
        assert!(names.contains(&"falcon512_median_200ms.svg".to_string()));
        assert!(!names.contains(&"falcon512_median.svg".to_string()));
    }

    #[test]
    fn test_single_latency_keeps_plain_names() {
        let slices = latency_slices(&index());
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].1, None);
    }

    #[test]
    fn test_exclusion_per_chart_family() {
        let data = DataDir::new("figures-filters");
        for tree in &["initcwnd=10", "mtu=1500"] {
            data.write(&format!("{}/latency=20.000ms/falcon512.csv", tree), "0,1\n");
            data.write(&format!("{}/latency=20.000ms/sphincssha2128ssimple.csv", tree), "0,1\n");
        }
        let algorithms = |axis: SweepAxis, filter: ScanFilter| {
            scan(data.path(), axis, &filter)
                .unwrap()
                .into_iter()
                .map(|f| f.algorithm)
                .collect::<Vec<_>>()
        };

        assert_eq!(
            algorithms(SweepAxis::Initcwnd, initcwnd_filter(None)),
            vec!["falcon512", "sphincssha2128ssimple"]
        );
        assert_eq!(algorithms(SweepAxis::Mtu, mtu_filter(None)), vec!["falcon512"]);
        assert_eq!(algorithms(SweepAxis::Initcwnd, category_filter(None)), vec!["falcon512"]);
        assert!(algorithms(SweepAxis::Mtu, mtu_filter(Some(50.0))).is_empty());
    }
}
