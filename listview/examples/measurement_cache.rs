// Example: persisting measured heights across list instances (e.g. navigating away and back).
use listview::{ListView, ListViewHandle, ListViewOptions, MeasuredRow, RowAttrs, RowStyle};

fn options() -> ListViewOptions<String, String> {
    ListViewOptions::new(
        10_000,
        |i| format!("msg-{i}"),
        |k: &String| k.strip_prefix("msg-").and_then(|s| s.parse().ok()),
        |_, _| 40,
        |key: &String, _style: RowStyle, _index: usize, _attrs: RowAttrs<String>| key.clone(),
    )
    .with_initial_draw(50)
}

fn main() {
    let mut a = ListView::new(options());
    a.reconcile((0..50).map(|i| MeasuredRow::new(format!("msg-{i}"), 40 + (i % 3) * 20)));
    let saved = a.export_known_heights();
    println!("saved {} heights", saved.len());

    let mut b = ListView::new(options());
    b.import_known_heights(saved);
    println!(
        "row 49 before: {:?}, after restore: {:?}",
        ListView::new(options()).row_position(49),
        b.row_position(49)
    );
}
