use serde::{Deserialize, Serialize};

use crate::{Row, report};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub label: String,
}

impl Column {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Rows flattened to display strings under an ordered set of columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn build(columns: &[Column], rows: &[Row]) -> Self {
        Self {
            headers: columns.iter().map(|c| c.label.clone()).collect(),
            rows: rows
                .iter()
                .map(|row| {
                    columns
                        .iter()
                        .map(|column| report::text(row, &column.key))
                        .collect()
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cells_follow_column_order() {
        let rows: Vec<Row> = serde_json::from_value(json!([
            {"count": 3, "deviceType": "Switch", "extra": true},
            {"deviceType": "Gateway"},
        ]))
        .unwrap();
        let columns = [Column::new("deviceType", "Device"), Column::new("count", "Count")];

        let table = TableView::build(&columns, &rows);
        assert_eq!(table.headers, ["Device", "Count"]);
        assert_eq!(table.rows[0], ["Switch", "3"]);
        assert_eq!(table.rows[1], ["Gateway", ""]);
    }

    #[test]
    fn no_rows_is_empty() {
        let table = TableView::build(&[Column::new("a", "A")], &[]);
        assert!(table.is_empty());
        assert_eq!(table.headers, ["A"]);
    }
}
