//! 渲染协作者：文章 content (Markdown) → rendered_content (HTML)。
//! 核心把它当纯函数，每次内容写入时调用，从不检视产物。

use pulldown_cmark::{html, Options, Parser};

pub fn markdown_to_html(source: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let html = markdown_to_html("# Title\n\nsome *text*");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>text</em>"));
    }

    #[test]
    fn empty_source_renders_empty() {
        assert_eq!(markdown_to_html(""), "");
    }
}
