//! Long-format degree table: one row per (period, node).

use polars::prelude::*;
use std::fs::File;
use std::path::Path;

use crate::error::{NetworkError, Result};
use crate::loader::Snapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct DegreeRecord {
    pub period: String,
    pub year: i32,
    pub degree: u32,
    pub num_nodes: u32,
    pub num_edges: u32,
}

/// Rows for every node of every snapshot, ordered by year.
pub fn degree_records(snapshots: &[Snapshot]) -> Vec<DegreeRecord> {
    let mut records = Vec::new();
    for snapshot in snapshots {
        let network = snapshot.network();
        let label = snapshot.label();
        for (_, degree) in network.degrees() {
            records.push(DegreeRecord {
                period: label.to_string(),
                year: label.start_year(),
                degree: degree as u32,
                num_nodes: network.node_count() as u32,
                num_edges: network.edge_count() as u32,
            });
        }
    }
    records.sort_by_key(|r| r.year);
    records
}

pub fn degree_frame(records: &[DegreeRecord]) -> Result<DataFrame> {
    let period: Vec<&str> = records.iter().map(|r| r.period.as_str()).collect();
    let year: Vec<i32> = records.iter().map(|r| r.year).collect();
    let degree: Vec<u32> = records.iter().map(|r| r.degree).collect();
    let num_nodes: Vec<u32> = records.iter().map(|r| r.num_nodes).collect();
    let num_edges: Vec<u32> = records.iter().map(|r| r.num_edges).collect();

    let df = DataFrame::new(vec![
        Series::new("period", period),
        Series::new("year", year),
        Series::new("degree", degree),
        Series::new("num_nodes", num_nodes),
        Series::new("num_edges", num_edges),
    ])?;
    Ok(df)
}

/// Writes the frame as Parquet when `path` ends in `.parquet`, CSV otherwise.
pub fn write_degree_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|e| NetworkError::io(path, e))?;
    let parquet = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("parquet"));
    if parquet {
        ParquetWriter::new(&mut file).finish(df)?;
    } else {
        CsvWriter::new(&mut file).finish(df)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Link, Network};
    use crate::loader::PeriodLabel;

    fn snapshots() -> Vec<Snapshot> {
        let mut late = Network::new();
        late.upsert_edge("a", "b", Link::default());
        late.upsert_edge("b", "c", Link::default());
        let mut early = Network::new();
        early.upsert_edge("x", "y", Link::default());
        vec![
            Snapshot::new(PeriodLabel::Range(2013, 2016), "2013-2016.json", late),
            Snapshot::new(PeriodLabel::Year(2011), "2011.json", early),
        ]
    }

    #[test]
    fn test_degree_records_sorted_by_year() {
        let records = degree_records(&snapshots());
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].year, 2011);
        assert_eq!(records[1].year, 2011);
        assert_eq!(records[2].period, "2013-2016");
        let degrees: Vec<u32> = records[2..].iter().map(|r| r.degree).collect();
        assert_eq!(degrees, vec![1, 2, 1]);
        assert!(records[2..].iter().all(|r| r.num_nodes == 3 && r.num_edges == 2));
    }

    #[test]
    fn test_degree_frame_and_csv() {
        let records = degree_records(&snapshots());
        let mut df = degree_frame(&records).unwrap();
        assert_eq!(df.shape(), (5, 5));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("degrees.csv");
        write_degree_table(&mut df, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("period,year,degree,num_nodes,num_edges"));
        assert_eq!(lines.next(), Some("2011,2011,1,2,1"));
        assert_eq!(content.lines().count(), 6);
    }

    #[test]
    fn test_degree_frame_and_parquet() {
        let records = degree_records(&snapshots());
        let mut df = degree_frame(&records).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("degrees.parquet");
        write_degree_table(&mut df, &path).unwrap();

        let back = ParquetReader::new(File::open(&path).unwrap()).finish().unwrap();
        assert_eq!(back.shape(), (5, 5));
        assert_eq!(
            back.get_column_names(),
            vec!["period", "year", "degree", "num_nodes", "num_edges"]
        );
        let degrees: Vec<u32> = back
            .column("degree")
            .unwrap()
            .u32()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(degrees, vec![1, 1, 1, 2, 1]);
        let periods: Vec<&str> = back
            .column("period")
            .unwrap()
            .utf8()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(periods, vec!["2011", "2011", "2013-2016", "2013-2016", "2013-2016"]);
    }
}
