mod common;

use flowdoc_pdf::markup::{Item, apply, parse};
use flowdoc_pdf::{Document, Error, FontRegistry, LayoutConfig, MM};
use pretty_assertions::assert_eq;

const SOURCE: &str = "\
= Benutzerhandbuch
!cover Handbuch | Fuer Administratoren

!page
# Einleitung
Dieses Dokument beschreibt
die Verwaltung.

## Rollen
- Administratoren duerfen alles
  und noch mehr
- Gaeste lesen nur

|= Rolle:30 | Beschreibung:90
| Admin | Voller Zugriff |
| Gast  | Nur lesen |
";

#[test]
fn parses_every_construct() {
    let markup = parse(SOURCE).unwrap();
    assert_eq!(markup.title.as_deref(), Some("Benutzerhandbuch"));
    assert_eq!(markup.items.len(), 8);
    assert_eq!(
        markup.items[0],
        Item::Cover {
            title: "Handbuch".to_string(),
            subtitle: Some("Fuer Administratoren".to_string()),
        }
    );
    assert_eq!(markup.items[1], Item::PageBreak);
    assert_eq!(
        markup.items[2],
        Item::Heading { level: 1, text: "Einleitung".to_string() }
    );
    assert_eq!(
        markup.items[3],
        Item::Paragraph("Dieses Dokument beschreibt die Verwaltung.".to_string())
    );
    assert_eq!(
        markup.items[5],
        Item::Bullet("Administratoren duerfen alles und noch mehr".to_string())
    );
    match &markup.items[7] {
        Item::Table { columns, rows } => {
            assert_eq!(columns.len(), 2);
            assert_eq!(columns[0].header, "Rolle");
            assert!((columns[1].width - 90.0 * MM).abs() < 1e-3);
            assert_eq!(rows[1], vec!["Gast".to_string(), "Nur lesen".to_string()]);
        }
        other => panic!("expected a table, got {other:?}"),
    }
}

#[test]
fn errors_carry_the_line_number() {
    let cases = [
        ("# ok\n\n| a | b |\n", 3),
        ("para\n!unknown\n", 2),
        ("|= Name | Other:10\n", 1),
        ("text\n\n\n#### too deep\n", 4),
        ("|= Name:abc\n", 1),
        ("!coverage report\n", 1),
        ("text\n!cover\n", 2),
    ];
    for (source, line) in cases {
        match parse(source) {
            Err(Error::Markup { line: got, .. }) => assert_eq!(got, line, "{source:?}"),
            other => panic!("{source:?}: expected a markup error, got {other:?}"),
        }
    }
}

#[test]
fn renders_markup_to_pdf_bytes() {
    common::init_logging();
    let fonts = FontRegistry::new();
    let bytes = flowdoc_pdf::render_markup(SOURCE, LayoutConfig::default(), &fonts).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(bytes.windows(8).any(|w| w == b"/Count 2"));
}

#[test]
fn short_table_row_surfaces_as_column_mismatch() {
    let fonts = FontRegistry::new();
    let source = "|= A:20 | B:20 | C:20\n| 1 | 2 |\n";
    let err = flowdoc_pdf::render_markup(source, LayoutConfig::default(), &fonts).unwrap_err();
    assert!(matches!(
        err,
        Error::ColumnCountMismatch { row: 0, expected: 3, found: 2 }
    ));
}

#[test]
fn cover_directive_accepts_a_bare_title() {
    let markup = parse("!cover\tHandbuch\n").unwrap();
    assert_eq!(
        markup.items,
        vec![Item::Cover { title: "Handbuch".to_string(), subtitle: None }]
    );
}

/// Page of the "Rechte" heading when it starts 25 mm above the break line.
fn heading_page(source: &str) -> usize {
    let fonts = FontRegistry::new();
    let mut doc = Document::open(LayoutConfig::default(), &fonts);
    doc.add_spacing(242.0 * MM);
    apply(&parse(source).unwrap().items, &mut doc).unwrap();
    let pages = doc.close().finalize().unwrap();
    pages
        .iter()
        .find(|p| p.contains_text("Rechte"))
        .expect("heading is drawn")
        .number
}

#[test]
fn heading_moves_with_a_table_that_does_not_fit_below_it() {
    // Heading 10 mm + 4 mm gap + table header 7 mm + first row 6 mm > 25 mm.
    assert_eq!(heading_page("# Rechte\n|= Rolle:30 | Recht:60\n| Admin | alles |\n"), 2);
    // Heading + gap + one 5.5 mm body line fits.
    assert_eq!(heading_page("# Rechte\nKurzer Text.\n"), 1);
}
