//! Hierarchical report.
//!
//! Classes are printed depth-first from each root, siblings ordered by the
//! ranking metric, best first. Each level is indented by [`INDENT`] and
//! the id column shrinks by the same amount so the data columns line up.

use std::cmp::Ordering;
use std::io::Write;

use serde::Serialize;

use super::{
    ClassRow, DATA_COLUMNS, OutputOptions, Printable, Summary, write_cells, write_header,
};
use crate::handle::ClassId;
use crate::hierarchy::{ClassTree, Visit};
use crate::rank::{Ranking, compare_values};

/// Spaces added per tree level.
pub const INDENT: usize = 4;
const ID_WIDTH: usize = 10;

/// Class tree annotated with the values of one ranking.
#[derive(Debug, Clone, Copy)]
pub struct TreeReport<'a> {
    tree: &'a ClassTree,
    ranking: &'a Ranking,
    capacity_bps: u64,
}

#[derive(Debug, Serialize)]
struct TreeNode {
    depth: usize,
    #[serde(flatten)]
    row: ClassRow,
    children: Vec<TreeNode>,
}

impl<'a> TreeReport<'a> {
    pub fn new(tree: &'a ClassTree, ranking: &'a Ranking, capacity_bps: u64) -> Self {
        Self {
            tree,
            ranking,
            capacity_bps,
        }
    }

    /// Depth-first visits, siblings in descending metric order.
    ///
    /// Classes missing from the ranking sort last among their siblings.
    pub fn visits(&self) -> Vec<Visit> {
        let metric = self.ranking.metric();
        let value = |id: &ClassId| self.ranking.get(id).and_then(|r| metric.value(r));
        self.tree.walk(|a, b| descending(value(a), value(b)))
    }

    fn row(&self, class_id: ClassId) -> Option<ClassRow> {
        self.ranking
            .get(&class_id)
            .map(|record| ClassRow::new(record, self.ranking, self.capacity_bps))
    }

    /// Width of the id column at the root level.
    fn id_column_width(&self) -> usize {
        ID_WIDTH + self.tree.depth().saturating_sub(1) * INDENT
    }

    /// Fold preorder visits back into nested nodes.
    fn nodes(&self) -> Vec<TreeNode> {
        let mut roots = Vec::new();
        let mut stack: Vec<TreeNode> = Vec::new();

        for visit in self.visits() {
            while stack.last().is_some_and(|top| top.depth >= visit.depth) {
                attach(&mut stack, &mut roots);
            }
            stack.push(TreeNode {
                depth: visit.depth,
                row: self
                    .row(visit.class_id)
                    .unwrap_or_else(|| ClassRow::bare(visit.class_id)),
                children: Vec::new(),
            });
        }
        while !stack.is_empty() {
            attach(&mut stack, &mut roots);
        }
        roots
    }
}

/// Pop the top node and append it to its parent, or to `roots`.
fn attach(stack: &mut Vec<TreeNode>, roots: &mut Vec<TreeNode>) {
    if let Some(node) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    compare_values(b, a)
}

impl Printable for TreeReport<'_> {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> std::io::Result<()> {
        Summary::new(self.ranking, self.capacity_bps).write(w)?;
        let id_width = self.id_column_width();
        write_header(w, &[("Tree", id_width)])?;

        for visit in self.visits() {
            let indent = " ".repeat(visit.depth * INDENT);
            let id = format!("{}{}", indent, visit.class_id);

            // A class only known to the tree has nothing else to show.
            let Some(row) = self.row(visit.class_id) else {
                writeln!(w, "{}", id)?;
                continue;
            };

            let data = row.data_cells();
            let mut cells = vec![(id.as_str(), id_width)];
            cells.extend(data.iter().map(String::as_str).zip(DATA_COLUMNS.map(|c| c.1)));
            write_cells(w, &cells)?;
        }
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "summary": Summary::new(self.ranking, self.capacity_bps),
            "tree": self.nodes(),
            "orphans": self.tree.orphans(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use crate::rank::Metric;
    use crate::record::{ClassRates, ClassRecord, ClassStats};

    const A: ClassId = ClassId::new(1, 1);
    const B: ClassId = ClassId::new(1, 0x10);
    const C: ClassId = ClassId::new(1, 0x20);
    const D: ClassId = ClassId::new(1, 0x11);

    fn record(id: ClassId, parent: Option<ClassId>, rate: f64) -> ClassRecord {
        let mut r = ClassRecord::new(id, parent, ClassStats::default());
        r.rates = Some(ClassRates {
            bytes_per_sec: rate,
            packets_per_sec: 1.0,
        });
        r
    }

    fn records() -> Vec<ClassRecord> {
        vec![
            record(A, None, 600.0),
            record(B, Some(A), 100.0),
            record(C, Some(A), 400.0),
            record(D, Some(B), 100.0),
        ]
    }

    #[test]
    fn test_text_indents_by_depth() {
        let records = records();
        let tree = ClassTree::new(&records);
        let ranking = Ranking::new(Metric::RateBytesPerSec, records);
        let text = TreeReport::new(&tree, &ranking, 200_000_000)
            .render(OutputFormat::Text, &OutputOptions::default())
            .unwrap();
        let lines: Vec<&str> = text.lines().skip(5).collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("1:1 "));
        assert!(lines[1].starts_with("    1:20 "));
        assert!(lines[2].starts_with("    1:10 "));
        assert!(lines[3].starts_with("        1:11 "));

        // Data columns start at the same offset on every row.
        let offsets: Vec<usize> = lines.iter().map(|l| l.find("0.0.0.0").unwrap()).collect();
        assert!(offsets.iter().all(|&o| o == offsets[0]));
        assert_eq!(offsets[0], ID_WIDTH + 2 * INDENT + 1);
    }

    #[test]
    fn test_class_missing_from_ranking_prints_id() {
        let records = records();
        let tree = ClassTree::new(&records);
        let ranking = Ranking::new(Metric::RateBytesPerSec, records[..3].to_vec());
        let text = TreeReport::new(&tree, &ranking, 0)
            .render(OutputFormat::Text, &OutputOptions::default())
            .unwrap();
        assert_eq!(text.lines().last(), Some("        1:11"));
    }

    #[test]
    fn test_json_nesting() {
        let mut records = records();
        records.push(record(ClassId::new(1, 0x99), Some(ClassId::new(1, 0x50)), 5.0));
        let tree = ClassTree::new(&records);
        let ranking = Ranking::new(Metric::RateBytesPerSec, records);
        let json = TreeReport::new(&tree, &ranking, 0).to_json();

        let roots = json["tree"].as_array().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0]["class_id"], "1:1");
        assert_eq!(roots[0]["depth"], 0);

        let children = roots[0]["children"].as_array().unwrap();
        assert_eq!(children[0]["class_id"], "1:20");
        assert_eq!(children[1]["class_id"], "1:10");
        assert_eq!(children[1]["children"][0]["class_id"], "1:11");
        assert_eq!(children[1]["children"][0]["depth"], 2);

        assert_eq!(json["orphans"], serde_json::json!(["1:99"]));
    }
}
