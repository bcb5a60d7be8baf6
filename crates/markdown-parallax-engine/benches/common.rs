// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with some content.\nSecond line of it.\n\n- Bullet point\n  - Nested item\n- Another item\n\n```rust\nfn example() {\n\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}
