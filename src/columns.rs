use crate::chain::{COLUMNS, Field};
use crate::records::{ColumnValue, RECORD_COLUMNS};

/// Render the raw-table layout and the published column order.
pub fn listing() -> String {
    let mut out = String::from("Raw snapshot columns\n====================\n\n");
    out.push_str("   0  (label, ignored)\n");
    for c in &COLUMNS {
        let side = match c.field {
            Field::Call(_) => "call",
            Field::Strike => "",
            Field::Put(_) => "put",
        };
        out.push_str(&format!("  {:>2}  {:<10} {:<4} {:?}\n", c.index, c.label, side, c.field));
    }

    out.push_str("\nPublished columns (sheet row 2, data from row 3)\n");
    out.push_str("================================================\n\n");
    for (i, c) in RECORD_COLUMNS.iter().enumerate() {
        let from = match c.value {
            ColumnValue::Chain(f) => format!("{f:?}"),
            ColumnValue::CallDelta | ColumnValue::PutDelta => "computed".to_string(),
        };
        out.push_str(&format!("  {:>2}  {:<13} {}\n", i + 1, c.name, from));
    }
    out
}

/// Print the column listing.
pub fn run() -> anyhow::Result<()> {
    print!("{}", listing());
    Ok(())
}
