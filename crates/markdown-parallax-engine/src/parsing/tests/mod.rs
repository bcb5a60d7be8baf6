//! Segmentation tests over inline documents.
//!
//! Fixture files with snapshot assertions live in the crate's `tests/`
//! directory; these cover the algorithm's edge cases directly.


use pretty_assertions::assert_eq;
use rstest::rstest;
use xi_rope::Rope;

use crate::parsing::{Block, normalize_text, segment, segment_rope};

const SAMPLE: &str = "# T\n\nA\nB\n\n- x\n- y\n\n```ts\nconst a = 1;\nconsole.log(a);\n```\n\nZ";

fn blocks(pairs: &[(usize, usize)]) -> Vec<Block> {
    pairs.iter().map(|&(s, e)| Block::new(s, e)).collect()
}

#[test]
fn sample_document_blocks() {
    assert_eq!(
        segment(SAMPLE),
        blocks(&[(1, 1), (3, 4), (6, 7), (9, 12), (14, 14)])
    );
}

#[test]
fn fenced_region_with_blank_lines_is_one_block() {
    let md = "intro\n\n```ts\nconst a = 1;\n\n\nconsole.log(a);\n```\n\nend";
    assert_eq!(segment(md), blocks(&[(1, 1), (3, 8), (10, 10)]));
}

#[rstest]
#[case::empty("", &[])]
#[case::all_blank("\n  \n\t\n", &[])]
#[case::single_line("hello", &[(1, 1)])]
#[case::trailing_blank_lines("a\nb\n\n\n", &[(1, 2)])]
#[case::leading_blank_lines("\n\na", &[(3, 3)])]
#[case::unterminated_fence("text\n\n```\ncode\n\nmore", &[(1, 1), (3, 6)])]
#[case::unterminated_fence_trailing_blanks("```\ncode\n\n", &[(1, 4)])]
#[case::tilde_fence("~~~\na\n\nb\n~~~", &[(1, 5)])]
#[case::fence_glued_to_paragraph("para\n```\nx\n\ny\n```", &[(1, 6)])]
#[case::text_after_closing_fence("```\nx\n```\nafter\n\nnext", &[(1, 4), (6, 6)])]
#[case::mixed_delimiters_toggle("```\na\n~~~\n\nb", &[(1, 3), (5, 5)])]
#[case::crlf("a\r\nb\r\n\r\nc", &[(1, 2), (4, 4)])]
fn segmentation_cases(#[case] md: &str, #[case] expected: &[(usize, usize)]) {
    let got = segment(md);
    invariants::check(md, &got);
    assert_eq!(got, blocks(expected));
}

#[rstest]
#[case("")]
#[case("a\n")]
#[case(SAMPLE)]
#[case("```\ncode\n\n")]
#[case("x\r\n\r\ny\r\n")]
fn rope_and_str_segmentation_agree(#[case] md: &str) {
    assert_eq!(segment_rope(&Rope::from(md)), segment(md));
}

#[test]
fn invariants_hold_for_generated_documents() {
    // Cycle through line shapes so every transition between them occurs.
    let shapes = ["para", "", "```rs", "  ", "~~~", "- item", "", "", "text"];
    for len in 0..40 {
        let md: Vec<&str> = (0..len).map(|i| shapes[(i * 7 + len) % shapes.len()]).collect();
        let md = md.join("\n");
        invariants::check(&md, &segment(&md));
    }
}

#[test]
fn normalize_trims_and_converts_crlf() {
    assert_eq!(normalize_text("\r\n  a\r\nb  \r\n\r\n"), "a\nb");
}
