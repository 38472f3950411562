use crate::scanner::{ScanReport, TargetKind};
use crate::utils::format_size;
use prettytable::{format, Cell, Row, Table};
use serde::Serialize;
use std::collections::BTreeMap;

/// Totals across a scan report
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    /// Total size of all measured targets
    pub total_size: u64,

    /// Total number of targets
    pub total_targets: usize,

    /// Statistics grouped by target kind
    pub by_kind: BTreeMap<TargetKind, KindStats>,
}

/// Statistics for one kind of target
#[derive(Debug, Clone, Default, Serialize)]
pub struct KindStats {
    /// Number of directories of this kind
    pub count: usize,

    /// Total measured size for this kind
    pub total_size: u64,

    /// Directories whose size could not be calculated
    pub unmeasured: usize,
}

impl Statistics {
    pub fn from_report(report: &ScanReport) -> Self {
        let mut by_kind: BTreeMap<TargetKind, KindStats> = BTreeMap::new();

        for target in report.targets() {
            let entry = by_kind.entry(target.kind).or_default();
            entry.count += 1;
            match target.size {
                Some(size) => entry.total_size = entry.total_size.saturating_add(size),
                None => entry.unmeasured += 1,
            }
        }

        Self {
            total_size: report.total_size(),
            total_targets: report.len(),
            by_kind,
        }
    }

    /// Build the per-kind summary table
    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.set_titles(Row::new(vec![
            Cell::new("Kind"),
            Cell::new("Count"),
            Cell::new("Total Size"),
        ]));

        for (kind, stats) in &self.by_kind {
            let size = if stats.unmeasured > 0 {
                format!(
                    "{} ({} unmeasured)",
                    format_size(stats.total_size),
                    stats.unmeasured
                )
            } else {
                format_size(stats.total_size)
            };

            table.add_row(Row::new(vec![
                Cell::new(kind.tag()),
                Cell::new(&stats.count.to_string()),
                Cell::new(&size),
            ]));
        }

        table
    }

    /// Print the summary table to stdout
    pub fn display_terminal(&self) {
        self.table().printstd();
    }
}
