use dioxus::prelude::*;
use types::table::TableView;

#[component]
pub fn ReportTable(table: TableView) -> Element {
    rsx! {
        div { class: "table-container",
            table {
                thead {
                    tr {
                        for header in table.headers.iter() {
                            th { "{header}" }
                        }
                    }
                }
                tbody {
                    for (index, row) in table.rows.iter().enumerate() {
                        tr { key: "{index}",
                            for cell in row.iter() {
                                td { "{cell}" }
                            }
                        }
                    }
                }
            }
            if table.is_empty() {
                p { class: "table-empty", "No data for the selected criteria." }
            }
        }
    }
}
