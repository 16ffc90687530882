//! End-to-end tests for the segment, wrap, style, and paginate pipeline.

use pagemark::error::{Error, Result};
use pagemark::layout::{paginate, wrap, Paginator, PaginatorState};
use pagemark::{
    segment, Block, BlockKind, Pagemark, PageGeometry, RenderOptions, StyleId, StyleSpec,
    StyledLine, Warning,
};

fn char_width(text: &str, _style: &StyleSpec) -> Result<f32> {
    Ok(text.chars().count() as f32)
}

fn narrow(width: f32) -> RenderOptions {
    RenderOptions::new()
        .with_geometry(PageGeometry::new(width + 20.0, 1000.0, 10.0, 10.0, 10.0, 20.0))
        .with_measurer(char_width)
}

fn texts(doc: &pagemark::PaginatedDocument) -> Vec<String> {
    doc.pages
        .iter()
        .flat_map(|p| p.lines.iter().map(|l| l.line.text.clone()))
        .collect()
}

#[test]
fn test_sample_document_blocks() {
    let seg = segment("# Title\n\nHello world\n\n```\ncode line\n```");
    assert_eq!(
        seg.blocks,
        vec![
            Block::heading(1, "Title"),
            Block::Spacer,
            Block::paragraph("Hello world"),
            Block::Spacer,
            Block::code(["code line"]),
        ]
    );
    assert!(seg.warnings.is_empty());
}

#[test]
fn test_wrapped_paragraph_reconstructs_text() {
    let text = "the quick brown fox jumps over the lazy dog and keeps running far away";
    let doc = pagemark::render::render(text, &narrow(16.0)).unwrap();

    let lines = texts(&doc);
    assert!(lines.len() > 1);
    assert!(lines.iter().all(|l| l.chars().count() <= 16));
    assert_eq!(lines.join(" "), text);
}

#[test]
fn test_reconstruction_normalizes_whitespace() {
    let lines = wrap("  spaced    out\twords  ", 100.0, |s| Ok(s.len() as f32)).unwrap();
    assert_eq!(lines, vec!["spaced out words"]);
}

#[test]
fn test_code_block_round_trip() {
    let code = ["fn main() {", "", "    let  x =   1;", "}   "];
    let raw = format!("```rust\n{}\n```", code.join("\n"));

    let seg = segment(&raw);
    assert_eq!(seg.count(BlockKind::CodeBlock), 1);

    let doc = pagemark::render::render(&raw, &narrow(4.0)).unwrap();
    assert_eq!(texts(&doc), code);
    assert!(doc.pages[0].lines.iter().all(|l| l.line.style == StyleId::Code));
}

#[test]
fn test_render_is_idempotent() {
    let raw = "# A\n\nsome words here and there\n\n```\nx\n```\n## B\n### C\ntext";
    let options = RenderOptions::default();

    let first = pagemark::render::render(raw, &options).unwrap();
    let second = pagemark::render::render(raw, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_overwide_token_is_not_split() {
    let token = "a".repeat(40);
    let doc = pagemark::render::render(&token, &narrow(10.0)).unwrap();
    assert_eq!(texts(&doc), vec![token]);
    assert_eq!(doc.stats.overflow_token_count, 1);
}

#[test]
fn test_unterminated_fence_keeps_code() {
    let doc = pagemark::render::render("intro\n```\nlet a = 1;\nlet b = 2;", &RenderOptions::default())
        .unwrap();

    assert_eq!(
        doc.warnings,
        vec![Warning::UnterminatedFence {
            line: 2,
            buffered_lines: 2
        }]
    );
    assert_eq!(texts(&doc), vec!["intro", "let a = 1;", "let b = 2;"]);
}

#[test]
fn test_strict_builder_rejects_unterminated_fence() {
    let result = Pagemark::new().strict().render("```\ncode");
    assert!(matches!(result, Err(Error::Structure(_))));
}

#[test]
fn test_heading_styles() {
    let doc = pagemark::render::render("# a\n## b\n### c\n#### d\ne", &RenderOptions::default())
        .unwrap();
    let styles: Vec<StyleId> = doc.pages[0].lines.iter().map(|l| l.line.style).collect();
    assert_eq!(
        styles,
        vec![
            StyleId::Title,
            StyleId::Section,
            StyleId::Subsection,
            StyleId::Subsection,
            StyleId::Body
        ]
    );
}

#[test]
fn test_pagination_worked_example() {
    let geometry = PageGeometry::new(200.0, 100.0, 10.0, 10.0, 10.0, 20.0);
    let lines: Vec<StyledLine> = (0..6)
        .map(|i| StyledLine::new(format!("l{}", i), StyleId::Body, i))
        .collect();

    let pages = paginate(lines, &geometry).unwrap();
    assert_eq!(pages.len(), 2);

    let ys: Vec<f32> = pages[0].lines.iter().map(|l| l.y).collect();
    assert_eq!(ys, vec![10.0, 30.0, 50.0, 70.0, 90.0]);
    assert_eq!(pages[1].number, 2);
    assert_eq!(pages[1].lines.len(), 1);
    assert_eq!(pages[1].lines[0].y, 10.0);
}

#[test]
fn test_paginator_state_transitions() {
    let geometry = PageGeometry::new(200.0, 100.0, 10.0, 10.0, 10.0, 20.0);
    let mut paginator = Paginator::new(geometry).unwrap();
    assert_eq!(paginator.state(), PaginatorState::Accumulating);

    for i in 0..5 {
        paginator.push(StyledLine::new("x", StyleId::Body, i));
    }
    assert_eq!(paginator.state(), PaginatorState::PageFull);
    assert_eq!(paginator.current_page(), 1);

    paginator.push(StyledLine::new("y", StyleId::Body, 5));
    assert_eq!(paginator.state(), PaginatorState::Accumulating);
    assert_eq!(paginator.current_page(), 2);
}

#[test]
fn test_every_line_on_exactly_one_page() {
    let raw: Vec<String> = (0..137).map(|i| format!("paragraph number {}", i)).collect();
    let doc = pagemark::render::render(&raw.join("\n"), &RenderOptions::default()).unwrap();

    assert_eq!(doc.line_count(), 137);
    for (i, page) in doc.pages.iter().enumerate() {
        assert_eq!(page.number as usize, i + 1);
        assert!(!page.lines.is_empty());
        for placed in &page.lines {
            assert!(placed.y <= doc.geometry.content_bottom());
        }
    }

    let sources: Vec<usize> = doc
        .pages
        .iter()
        .flat_map(|p| p.lines.iter().map(|l| l.line.source_block_index))
        .collect();
    assert_eq!(sources, (0..137).collect::<Vec<_>>());
}

#[test]
fn test_trailing_spacers_do_not_open_a_page() {
    // Five lines fill page 1; the blank lines after them would start page 2.
    let options = RenderOptions::new()
        .with_geometry(PageGeometry::new(200.0, 100.0, 10.0, 10.0, 10.0, 20.0));
    let doc = pagemark::render::render("a\nb\nc\nd\ne\n\n\n", &options).unwrap();
    assert_eq!(doc.page_count(), 1);
}

#[test]
fn test_empty_input() {
    let doc = pagemark::render_str("").unwrap();
    assert!(doc.is_empty());
    assert!(doc.warnings.is_empty());
}

#[test]
fn test_invalid_geometry_is_rejected_before_rendering() {
    let options = RenderOptions::new().with_geometry(PageGeometry::new(
        612.0, 792.0, 400.0, 72.0, 72.0, 14.0,
    ));
    let result = pagemark::render::render("hello", &options);
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_batch_matches_sequential() {
    let inputs = vec![
        "# one\n\nfirst".to_string(),
        "second\n```\ncode\n```".to_string(),
        "third".repeat(50),
    ];
    let options = RenderOptions::default();

    let batch = pagemark::render_batch(&inputs, &options);
    for (input, result) in inputs.iter().zip(batch) {
        let sequential = pagemark::render::render(input, &options).unwrap();
        assert_eq!(result.unwrap(), sequential);
    }
}
