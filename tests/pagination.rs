mod common;

use common::{Mono, block, geometry, state, style};
use flowdoc_pdf::Error;
use flowdoc_pdf::config::HeadingStyle;
use flowdoc_pdf::layout::{Bullet, ContentBlock, Furniture, Heading, LayoutState, Paragraph};
use flowdoc_pdf::model::{BLACK, PageDraft};

fn texts(draft: &PageDraft) -> Vec<String> {
    common::resolve(std::slice::from_ref(&closed(draft)))
        .remove(0)
        .texts()
        .map(str::to_string)
        .collect()
}

fn closed(draft: &PageDraft) -> PageDraft {
    let mut draft = draft.clone();
    draft.closed = true;
    draft.number = 1;
    draft
}

#[test]
fn three_blocks_of_100pt_fill_two_pages() {
    common::init_logging();
    let mut state = state();
    for name in ["block1", "block2", "block3"] {
        state.place(&block(name, 100.0), &Mono).unwrap();
    }
    let drafts = state.finish();
    assert_eq!(drafts.len(), 2);
    assert_eq!(texts(&drafts[0]), vec!["block1", "block2"]);
    assert_eq!(texts(&drafts[1]), vec!["block3"]);
}

#[test]
fn block_that_exactly_fills_the_page_stays() {
    let mut state = state();
    state.place(&block("a", 140.0), &Mono).unwrap();
    state.place(&block("b", 100.0), &Mono).unwrap();
    assert_eq!(state.page_number(), 1);
    assert_eq!(state.cursor().remaining_height(), 0.0);
    state.place(&block("c", 1.0), &Mono).unwrap();
    assert_eq!(state.page_number(), 2);
}

#[test]
fn page_count_is_minimal_for_atomic_blocks() {
    // 7 blocks of 70pt: three per 240pt page.
    let mut state = state();
    for i in 0..7 {
        state.place(&block(&format!("b{i}"), 70.0), &Mono).unwrap();
    }
    let drafts = state.finish();
    let counts: Vec<usize> = drafts.iter().map(|d| texts(d).len()).collect();
    assert_eq!(counts, vec![3, 3, 1]);
}

fn heading(text: &str) -> ContentBlock {
    ContentBlock::Heading(Heading {
        text: text.to_string(),
        style: HeadingStyle {
            text: style(20.0, 5.0),
            rule: Some(BLACK),
        },
        lookahead: 20.0,
    })
}

#[test]
fn heading_is_not_left_alone_at_the_bottom() {
    let mut state = state();
    state.place(&block("filler", 200.0), &Mono).unwrap();
    // 40pt left: the heading itself fits, heading + gap + one body line does not.
    state.place(&heading("Kapitel"), &Mono).unwrap();
    state.place(&block("body", 20.0), &Mono).unwrap();
    let drafts = state.finish();
    assert_eq!(drafts.len(), 2);
    assert_eq!(texts(&drafts[0]), vec!["filler"]);
    assert_eq!(texts(&drafts[1]), vec!["Kapitel", "body"]);
}

#[test]
fn long_paragraph_continues_on_following_pages() {
    let text = (0..50).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n");
    let paragraph = ContentBlock::Paragraph(Paragraph::new(text, style(10.0, 0.0)));
    let mut state = state();
    state.place(&paragraph, &Mono).unwrap();
    let drafts = state.finish();

    let per_page: Vec<usize> = drafts.iter().map(|d| texts(d).len()).collect();
    assert_eq!(per_page, vec![24, 24, 2]);
    let all: Vec<String> = drafts.iter().flat_map(texts).collect();
    let expected: Vec<String> = (0..50).map(|i| format!("line{i}")).collect();
    assert_eq!(all, expected);
}

#[test]
fn bullet_taller_than_a_page_is_an_overflow() {
    let text = vec!["item"; 30].join("\n");
    let bullet = ContentBlock::Bullet(Bullet::new(text, style(10.0, 0.0), 10.0));
    let mut state = state();
    let err = state.place(&bullet, &Mono).unwrap_err();
    match err {
        Error::PageOverflow { height, available } => {
            assert_eq!(height, 300.0);
            assert_eq!(available, 240.0);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn overflow_is_measured_below_the_header() {
    let mut state = LayoutState::new(geometry(), None);
    state.set_header(Box::new(|f: &mut Furniture<'_>| f.ln(40.0)));
    let err = state.place(&block("x", 220.0), &Mono).unwrap_err();
    assert!(matches!(err, Error::PageOverflow { available, .. } if available == 200.0));
}

#[test]
fn header_pushes_body_content_down() {
    let mut state = LayoutState::new(geometry(), None);
    state.set_header(Box::new(|f: &mut Furniture<'_>| f.ln(30.0)));
    state.place(&block("first", 10.0), &Mono).unwrap();
    assert_eq!(state.cursor().position(), (20.0, 60.0));
    assert_eq!(state.cursor().page_capacity(), 210.0);
}

#[test]
fn empty_document_still_has_one_page() {
    let drafts = state().finish();
    assert_eq!(drafts.len(), 1);
    assert!(drafts[0].closed);
    assert_eq!(drafts[0].number, 1);
}

#[test]
fn layout_states_are_independent() {
    let mut a = state();
    let mut b = state();
    a.place(&block("a", 200.0), &Mono).unwrap();
    a.place(&block("a2", 100.0), &Mono).unwrap();
    b.place(&block("b", 100.0), &Mono).unwrap();
    assert_eq!(a.page_number(), 2);
    assert_eq!(b.page_number(), 1);
}
