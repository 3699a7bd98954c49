use serde_json::Value;

use crate::models::Supplier;
use crate::utils::escape_html;

const COLUMNS: [(&str, &str); 7] = [
    ("ID", "col-md-1"),
    ("Name", "col-md-2"),
    ("Phone", "col-md-2"),
    ("Address", "col-md-2"),
    ("Available", "col-md-1"),
    ("Rating", "col-md-2"),
    ("Product List", "col-md-2"),
];

fn cells(supplier: &Supplier) -> [String; 7] {
    [
        supplier.id.clone(),
        supplier.name.clone(),
        supplier.phone.clone(),
        supplier.address.clone(),
        supplier.available.to_string(),
        supplier.rating.clone(),
        Value::Array(supplier.product_list.clone()).to_string(),
    ]
}

/// Renders search results as the page's striped table, one body row per
/// supplier in the order given.
pub fn results_table_html(suppliers: &[Supplier]) -> String {
    let mut html = String::from("<table class=\"table-striped\" cellpadding=\"10\">\n<thead>\n<tr>\n");
    for (title, class) in COLUMNS {
        html.push_str(&format!("<th class=\"{class}\">{title}</th>\n"));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for supplier in suppliers {
        html.push_str("<tr>");
        for ((_, class), cell) in COLUMNS.iter().zip(cells(supplier)) {
            html.push_str(&format!("<td class=\"{class}\">{}</td>", escape_html(&cell)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>");
    html
}

/// Same table as aligned plain text, for terminals.
pub fn results_table_text(suppliers: &[Supplier]) -> String {
    let rows: Vec<[String; 7]> = suppliers.iter().map(cells).collect();

    let mut widths = COLUMNS.map(|(title, _)| title.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |values: Vec<&str>| {
        values
            .iter()
            .zip(widths)
            .map(|(v, w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(COLUMNS.iter().map(|(title, _)| *title).collect())];
    out.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    for row in &rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}
