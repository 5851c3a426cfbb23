// Text grid output for a finished run
use crate::scheduler::ResultMatrix;

pub trait Reporter {
    fn render(&self, matrix: &ResultMatrix) -> String;
}

/// Left-aligned columns padded to the widest entry, tab-writer style.
pub struct TableReporter {
    padding: usize,
}

impl TableReporter {
    pub fn new() -> Self {
        Self { padding: 2 }
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TableReporter {
    fn render(&self, matrix: &ResultMatrix) -> String {
        let columns = matrix.tickers().len() + 1;

        let mut rows: Vec<Vec<String>> = Vec::with_capacity(matrix.timeframes().len() + 2);
        rows.push(
            std::iter::once("Timeframe".to_string())
                .chain(matrix.tickers().iter().cloned())
                .collect(),
        );
        rows.push(vec!["---------".to_string(); columns]);
        for &timeframe in matrix.timeframes() {
            rows.push(
                std::iter::once(timeframe.to_string())
                    .chain(matrix.row(timeframe).iter().map(|c| c.to_string()))
                    .collect(),
            );
        }

        let mut widths = vec![0; columns];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        for row in &rows {
            let mut line = String::new();
            for (cell, width) in row.iter().zip(&widths) {
                line.push_str(&format!("{:<w$}", cell, w = width + self.padding));
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}
