//! Tabular statistics report.
//!
//! One CSV row per image plus a trailing averages row. The averages are
//! computed values; the fusion-index average skips NA rows the same way a
//! spreadsheet AVERAGE skips text cells.

use std::path::Path;

use crate::store::ImageEntry;

use super::error::ProjectError;

const HEADER: &str = "Image name,Total nuclei,Tropomyosin positive nuclei,Fusion index,Fiber area (%)";

/// Write the per-image statistics report for `entries` to `path`.
pub fn write_report(entries: &[ImageEntry], path: &Path) -> Result<(), ProjectError> {
    let mut out = String::from(HEADER);
    out.push('\n');

    let mut total_sum = 0usize;
    let mut positive_sum = 0usize;
    let mut ratio_sum = 0.0f64;
    let mut ratio_count = 0usize;
    let mut area_sum = 0.0f64;

    for entry in entries {
        let stats = entry.stats();
        let name = entry.file_name().to_string_lossy().into_owned();

        let ratio_cell = match stats.positive_ratio {
            Some(ratio) => {
                ratio_sum += ratio;
                ratio_count += 1;
                format!("{:.2}", ratio)
            }
            None => "NA".to_string(),
        };

        total_sum += stats.total_nuclei;
        positive_sum += stats.positive_count;
        area_sum += stats.fiber_area_percent;

        out.push_str(&format!(
            "{},{},{},{},{:.2}\n",
            csv_field(&name),
            stats.total_nuclei,
            stats.positive_count,
            ratio_cell,
            stats.fiber_area_percent
        ));
    }

    if !entries.is_empty() {
        let n = entries.len() as f64;
        let ratio_cell = if ratio_count > 0 {
            format!("{:.2}", ratio_sum / ratio_count as f64)
        } else {
            "NA".to_string()
        };
        out.push_str(&format!(
            "Average,{:.2},{:.2},{},{:.2}\n",
            total_sum as f64 / n,
            positive_sum as f64 / n,
            ratio_cell,
            area_sum / n
        ));
    }

    std::fs::write(path, out)?;
    log::info!("wrote report for {} images to {:?}", entries.len(), path);
    Ok(())
}

/// Quote a CSV field when it needs it.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FiberSet, Nucleus};

    fn entry_with(path: &str, nuclei: Vec<Nucleus>, area_ratio: f64) -> ImageEntry {
        let mut entry = ImageEntry::new(path);
        entry.nuclei = nuclei;
        entry.fibers = FiberSet::with_data(vec![], area_ratio);
        entry
    }

    #[test]
    fn test_report_rows_and_average() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        let entries = vec![
            entry_with(
                "/img/a.png",
                vec![
                    Nucleus::inside(1.0, 1.0),
                    Nucleus::inside(2.0, 2.0),
                    Nucleus::outside(3.0, 3.0),
                    Nucleus::outside(4.0, 4.0),
                ],
                0.5,
            ),
            entry_with("/img/b.png", vec![], 0.25),
        ];

        write_report(&entries, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Image name,"));
        assert_eq!(lines[1], "a.png,4,2,0.50,50.00");
        assert_eq!(lines[2], "b.png,0,0,NA,25.00");
        // Ratio average over the single non-NA row.
        assert_eq!(lines[3], "Average,2.00,1.00,0.50,37.50");
    }

    #[test]
    fn test_empty_report_has_no_average_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_report(&[], &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_comma_in_name_is_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let entries = vec![entry_with("/img/a,b.png", vec![], 0.0)];
        write_report(&entries, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"a,b.png\""));
    }
}
