mod common;

use common::Mono;
use flowdoc_pdf::TextMeasurer;
use flowdoc_pdf::layout::wrap;
use flowdoc_pdf::model::FontDescriptor;

const TEXT: &str = "Die Benutzerverwaltung erlaubt das Anlegen, Bearbeiten und Sperren \
    von Konten. Rollen werden beim Anlegen zugewiesen und koennen spaeter geaendert werden.";

#[test]
fn lines_never_exceed_the_width_unless_flagged() {
    let font = FontDescriptor::new("Mono", 10.0);
    for width in [20.0, 35.0, 60.0, 100.0, 160.0, 400.0] {
        for line in wrap(TEXT, width, &font, &Mono) {
            let measured = Mono.text_width(&line.text, &font);
            assert_eq!(measured, line.width, "reported width of {:?}", line.text);
            if line.overflow {
                assert!(!line.text.contains(' '), "overflow line {:?} holds several words", line.text);
                assert!(measured > width);
            } else {
                assert!(measured <= width, "{:?} is {measured}pt at width {width}", line.text);
            }
        }
    }
}

#[test]
fn wrapping_keeps_every_word_in_order() {
    let font = FontDescriptor::new("Mono", 10.0);
    let words: Vec<&str> = TEXT.split_whitespace().collect();
    let wrapped: Vec<String> = wrap(TEXT, 60.0, &font, &Mono).map(|l| l.text).collect();
    let rejoined = wrapped.join(" ");
    assert_eq!(rejoined.split_whitespace().collect::<Vec<_>>(), words);
}

#[test]
fn unsplittable_word_is_emitted_alone_and_flagged() {
    let font = FontDescriptor::new("Mono", 10.0);
    let lines: Vec<_> = wrap("ab Berechtigungsverwaltung cd", 30.0, &font, &Mono).collect();
    let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["ab", "Berechtigungsverwaltung", "cd"]);
    assert_eq!(
        lines.iter().map(|l| l.overflow).collect::<Vec<_>>(),
        vec![false, true, false]
    );
}

#[test]
fn wrapped_lines_can_be_restarted_by_cloning() {
    let font = FontDescriptor::new("Mono", 10.0);
    let lines = wrap(TEXT, 80.0, &font, &Mono);
    let first: Vec<_> = lines.clone().collect();
    let second: Vec<_> = lines.collect();
    assert_eq!(first, second);
}
