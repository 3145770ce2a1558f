// src/ats/text.rs
use scraper::node::Node;
use scraper::Html;

/// Reduce a job description to plain text for the classifiers.
///
/// Script and style subtrees are dropped entirely, entities are decoded by
/// the parser, and whitespace is collapsed to single spaces.
pub fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut collected = String::new();
    collect_text(fragment.tree.root(), &mut collected);

    collected.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(&text);
                out.push(' ');
            }
            Node::Element(element) => {
                let name = element.name();
                if name != "script" && name != "style" {
                    collect_text(child, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_collapses_whitespace() {
        let html = "<div><p>Senior   Engineer</p>\n<ul><li>Rust</li><li>Tokio</li></ul></div>";
        assert_eq!(plain_text(html), "Senior Engineer Rust Tokio");
    }

    #[test]
    fn test_drops_script_and_style_content() {
        let html = "<p>Visible</p><script>var hidden = 1;</script><style>.x{color:red}</style>";
        assert_eq!(plain_text(html), "Visible");
    }

    #[test]
    fn test_decodes_entities() {
        let html = "<p>Research &amp; Development &#163;50k</p>";
        assert_eq!(plain_text(html), "Research & Development £50k");
    }

    #[test]
    fn test_plain_input_passes_through() {
        assert_eq!(plain_text("already plain text"), "already plain text");
    }
}
