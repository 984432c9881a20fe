/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt::{self, Write};

use crate::{MetricFamily, SeriesValue};

/// Writer for the Prometheus text exposition format, version 0.0.4.
pub struct TextEncoder;

impl TextEncoder {
    pub const CONTENT_TYPE: &'static str = "text/plain; version=0.0.4";

    pub fn encode<W: Write>(families: &[MetricFamily], w: &mut W) -> fmt::Result {
        for family in families {
            let name = family.name();
            w.write_str("# HELP ")?;
            w.write_str(name)?;
            w.write_char(' ')?;
            write_escaped(w, family.help(), false)?;
            w.write_char('\n')?;
            writeln!(w, "# TYPE {name} {}", family.metric_type())?;

            for series in family.series() {
                let labels = series.labels();
                match series.value() {
                    SeriesValue::Single(v) => {
                        write_sample(w, name, "", labels, None, *v)?;
                    }
                    SeriesValue::Summary {
                        quantiles,
                        sum,
                        count,
                    } => {
                        for (q, v) in quantiles {
                            write_sample(w, name, "", labels, Some(*q), *v)?;
                        }
                        write_sample(w, name, "_sum", labels, None, *sum)?;
                        write_name_labels(w, name, "_count", labels, None)?;
                        writeln!(w, " {count}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn write_sample<W: Write>(
    w: &mut W,
    name: &str,
    suffix: &str,
    labels: &[(String, String)],
    quantile: Option<f64>,
    value: f64,
) -> fmt::Result {
    write_name_labels(w, name, suffix, labels, quantile)?;
    w.write_char(' ')?;
    write_float(w, value)?;
    w.write_char('\n')
}

fn write_name_labels<W: Write>(
    w: &mut W,
    name: &str,
    suffix: &str,
    labels: &[(String, String)],
    quantile: Option<f64>,
) -> fmt::Result {
    w.write_str(name)?;
    w.write_str(suffix)?;
    if labels.is_empty() && quantile.is_none() {
        return Ok(());
    }

    w.write_char('{')?;
    for (i, (k, v)) in labels.iter().enumerate() {
        if i > 0 {
            w.write_char(',')?;
        }
        w.write_str(k)?;
        w.write_str("=\"")?;
        write_escaped(w, v, true)?;
        w.write_char('"')?;
    }
    if let Some(q) = quantile {
        if !labels.is_empty() {
            w.write_char(',')?;
        }
        w.write_str("quantile=\"")?;
        write_float(w, q)?;
        w.write_char('"')?;
    }
    w.write_char('}')
}

fn write_float<W: Write>(w: &mut W, v: f64) -> fmt::Result {
    if v.is_nan() {
        w.write_str("NaN")
    } else if v.is_infinite() {
        if v > 0.0 {
            w.write_str("+Inf")
        } else {
            w.write_str("-Inf")
        }
    } else {
        write!(w, "{v}")
    }
}

/// Escapes `\` and newline, plus `"` inside label values.
fn write_escaped<W: Write>(w: &mut W, s: &str, quote: bool) -> fmt::Result {
    for c in s.chars() {
        match c {
            '\\' => w.write_str("\\\\")?,
            '\n' => w.write_str("\\n")?,
            '"' if quote => w.write_str("\\\"")?,
            _ => w.write_char(c)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MetricType, Series};

    fn encode(families: &[MetricFamily]) -> String {
        let mut s = String::new();
        TextEncoder::encode(families, &mut s).unwrap();
        s
    }

    #[test]
    fn single() {
        let mut family = MetricFamily::new("load".to_string(), "GaugeFloat64", MetricType::Gauge);
        family.push(Series::new(Vec::new(), SeriesValue::Single(0.25)));
        family.push(Series::new(
            vec![("cpu".to_string(), "1".to_string())],
            SeriesValue::Single(3.0),
        ));
        assert_eq!(
            encode(&[family]),
            "# HELP load GaugeFloat64\n\
             # TYPE load gauge\n\
             load 0.25\n\
             load{cpu=\"1\"} 3\n"
        );
    }

    #[test]
    fn summary() {
        let mut family =
            MetricFamily::new("latency".to_string(), "Histogram", MetricType::Summary);
        family.push(Series::new(
            vec![("route".to_string(), "/".to_string())],
            SeriesValue::Summary {
                quantiles: vec![(0.5, 4.0), (0.95, 7.5)],
                sum: 120.0,
                count: 20,
            },
        ));
        assert_eq!(
            encode(&[family]),
            "# HELP latency Histogram\n\
             # TYPE latency summary\n\
             latency{route=\"/\",quantile=\"0.5\"} 4\n\
             latency{route=\"/\",quantile=\"0.95\"} 7.5\n\
             latency_sum{route=\"/\"} 120\n\
             latency_count{route=\"/\"} 20\n"
        );
    }

    #[test]
    fn special_values() {
        let mut family = MetricFamily::new("g".to_string(), "GaugeFloat64", MetricType::Gauge);
        for (i, v) in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY].into_iter().enumerate() {
            family.push(Series::new(
                vec![("i".to_string(), i.to_string())],
                SeriesValue::Single(v),
            ));
        }
        assert_eq!(
            encode(&[family]),
            "# HELP g GaugeFloat64\n\
             # TYPE g gauge\n\
             g{i=\"0\"} NaN\n\
             g{i=\"1\"} +Inf\n\
             g{i=\"2\"} -Inf\n"
        );
    }

    #[test]
    fn escape_label_value() {
        let mut family = MetricFamily::new("c".to_string(), "Counter", MetricType::Untyped);
        family.push(Series::new(
            vec![("path".to_string(), "C:\\tmp\n\"x\"".to_string())],
            SeriesValue::Single(1.0),
        ));
        let s = encode(&[family]);
        assert!(s.ends_with("c{path=\"C:\\\\tmp\\n\\\"x\\\"\"} 1\n"));
    }
}
