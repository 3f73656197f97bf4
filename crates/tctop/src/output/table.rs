//! Flat ranked table.

use std::io::Write;

use serde::Serialize;

use super::{
    ClassRow, DATA_COLUMNS, OutputOptions, Printable, Summary, write_cells, write_header,
};
use crate::rank::{Limit, Ranking};

const RANK_WIDTH: usize = 5;
const ID_WIDTH: usize = 10;

/// Classes in descending metric order, truncated to a row limit.
///
/// Percentages are taken against the whole ranking, not the shown rows.
#[derive(Debug, Clone, Copy)]
pub struct FlatReport<'a> {
    ranking: &'a Ranking,
    limit: Limit,
    capacity_bps: u64,
}

#[derive(Serialize)]
struct RankedRow {
    rank: usize,
    #[serde(flatten)]
    row: ClassRow,
}

impl<'a> FlatReport<'a> {
    pub fn new(ranking: &'a Ranking, limit: Limit, capacity_bps: u64) -> Self {
        Self {
            ranking,
            limit,
            capacity_bps,
        }
    }

    /// Rows to show, best first.
    pub fn rows(&self) -> Vec<ClassRow> {
        self.ranking
            .top(self.limit)
            .map(|record| ClassRow::new(record, self.ranking, self.capacity_bps))
            .collect()
    }
}

impl Printable for FlatReport<'_> {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> std::io::Result<()> {
        Summary::new(self.ranking, self.capacity_bps).write(w)?;
        write_header(w, &[("num.", RANK_WIDTH), ("cls_id", ID_WIDTH)])?;

        for (i, row) in self.rows().iter().enumerate() {
            let rank = format!("{}.", i + 1);
            let id = row.class_id.to_string();
            let data = row.data_cells();

            let mut cells = vec![(rank.as_str(), RANK_WIDTH), (id.as_str(), ID_WIDTH)];
            cells.extend(data.iter().map(String::as_str).zip(DATA_COLUMNS.map(|c| c.1)));
            write_cells(w, &cells)?;
        }
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        let classes: Vec<RankedRow> = self
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| RankedRow { rank: i + 1, row })
            .collect();
        serde_json::json!({
            "summary": Summary::new(self.ranking, self.capacity_bps),
            "classes": classes,
        })
    }
}
