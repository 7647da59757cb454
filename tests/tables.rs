mod common;

use common::{Mono, block, state};
use flowdoc_pdf::config::TableStyle;
use flowdoc_pdf::layout::{Column, Table, band_fill};
use flowdoc_pdf::model::{FontDescriptor, Rgb};
use flowdoc_pdf::Error;
use pretty_assertions::assert_eq;

const HEADER: Rgb = [30, 60, 120];
const BAND: Rgb = [240, 240, 250];

fn style() -> TableStyle {
    TableStyle {
        header_font: FontDescriptor::new("Mono", 8.0).bold(),
        header_height: 20.0,
        body_font: FontDescriptor::new("Mono", 8.0),
        row_height: 20.0,
        header_fill: HEADER,
        band_fill: BAND,
        border: None,
        space_after: 0.0,
        ..TableStyle::default()
    }
}

fn table(columns: usize, rows: usize) -> Table {
    let cols = (0..columns).map(|c| Column::new(format!("H{c}"), 40.0)).collect();
    let mut table = Table::new(cols, style());
    for r in 0..rows {
        table.push_row((0..columns).map(|c| format!("r{r}c{c}")));
    }
    table
}

#[test]
fn band_fill_alternates_on_odd_rows() {
    for i in 0..10 {
        assert_eq!(band_fill(i, BAND).is_some(), i % 2 == 1, "row {i}");
    }
}

#[test]
fn body_rows_are_banded_by_index() {
    let t = table(2, 5);
    for i in 0..5 {
        assert_eq!(t.body_row(i).unwrap().fill, band_fill(i, BAND));
    }
    // Same answer on a second pass.
    assert_eq!(t.body_row(3).unwrap().fill, Some(BAND));
}

#[test]
fn rendered_fills_follow_header_then_bands() {
    let mut state = state();
    table(2, 4).render(&mut state, &Mono).unwrap();
    let pages = common::resolve(&state.finish());
    assert_eq!(pages.len(), 1);
    let fills: Vec<(f32, Rgb)> = pages[0].fills().collect();
    // Header cells at y=20, rows 1 and 3 banded at y=60 and y=100.
    assert_eq!(
        fills,
        vec![(20.0, HEADER), (20.0, HEADER), (60.0, BAND), (60.0, BAND), (100.0, BAND), (100.0, BAND)]
    );
}

#[test]
fn short_row_is_rejected_before_anything_is_drawn() {
    let mut t = table(3, 2);
    t.rows[1] = vec!["a".to_string(), "b".to_string()];
    let mut state = state();
    let err = t.render(&mut state, &Mono).unwrap_err();
    match err {
        Error::ColumnCountMismatch { row, expected, found } => {
            assert_eq!((row, expected, found), (1, 3, 2));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(state.snapshot().is_empty(), "no page may be opened for a rejected table");
}

#[test]
fn header_repeats_on_continuation_pages() {
    // 240pt per page: header + 11 rows on page 1, header + 9 rows on page 2.
    let mut state = state();
    table(2, 20).render(&mut state, &Mono).unwrap();
    let pages = common::resolve(&state.finish());
    assert_eq!(pages.len(), 2);

    let first = common::page_texts(&pages[0]);
    let second = common::page_texts(&pages[1]);
    assert_eq!(&first[..2], &["H0", "H1"]);
    assert_eq!(&second[..4], &["H0", "H1", "r11c0", "r11c1"]);
    assert_eq!(first.len(), 2 + 11 * 2);
    assert_eq!(second.len(), 2 + 9 * 2);
}

#[test]
fn header_is_kept_with_the_first_row() {
    let mut state = state();
    // 30pt left: enough for the header alone, not for header plus one row.
    state.place(&block("filler", 210.0), &Mono).unwrap();
    table(2, 1).render(&mut state, &Mono).unwrap();
    let pages = common::resolve(&state.finish());
    assert_eq!(pages.len(), 2);
    assert_eq!(common::page_texts(&pages[0]), vec!["filler"]);
    assert_eq!(common::page_texts(&pages[1]), vec!["H0", "H1", "r0c0", "r0c1"]);
}

#[test]
fn table_row_checks_its_arity() {
    let err = flowdoc_pdf::layout::TableRow::new(
        4,
        vec!["only".to_string()],
        vec![10.0, 10.0],
        6.0,
        FontDescriptor::new("Mono", 8.0),
        [0, 0, 0],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::ColumnCountMismatch { row: 4, expected: 2, found: 1 }
    ));
}
