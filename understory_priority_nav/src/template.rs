// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overflow menu markup.
//!
//! ## Placeholders
//!
//! Templates use positional placeholders:
//!
//! - menu: `%1$s` container class, `%2$s` item class, `%3$s` href, `%4$s` title,
//!   `%5$s` nested children markup;
//! - child: `%1$s` item class, `%2$s` href, `%3$s` title, `%4$s` nested children markup;
//! - child wrap: `%s` joined children markup.
//!
//! Substitution is a single pass, so values are never re-scanned for
//! placeholders. Hrefs and titles are escaped with `quick_xml`. Rendering
//! reads nothing but the node: the same node always produces the same markup.
//!
//! ```
//! use understory_priority_nav::{build_tree, NavOptions, SourceItem};
//! use understory_priority_nav::template::render_menu;
//!
//! let root = build_tree::<u32>(vec![SourceItem::new("/a", "A")], NavOptions::default());
//! let html = render_menu(&root);
//! assert!(html.contains(r#"<a href="/a">A</a>"#));
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use quick_xml::escape::escape;

use crate::node::MenuNode;
use crate::types::{ITEM_CLASS, MENU_CLASS};

/// Render the overflow menu for `root` and all its descendants.
pub fn render_menu<H: Copy + Eq>(root: &MenuNode<H>) -> String {
    let templates = root.templates();
    let href = escape(root.href());
    let title = escape(root.title());
    let nested = render_children(root);
    substitute(
        &templates.menu,
        &[MENU_CLASS, ITEM_CLASS, &*href, &*title, &nested],
    )
}

fn render_children<H: Copy + Eq>(node: &MenuNode<H>) -> String {
    if node.is_empty() {
        return String::new();
    }
    let templates = node.templates();
    let items: Vec<String> = node
        .children()
        .iter()
        .map(|child| {
            let href = escape(child.href());
            let title = escape(child.title());
            let nested = render_children(child);
            substitute(&templates.child, &[ITEM_CLASS, &*href, &*title, &nested])
        })
        .collect();
    substitute(&templates.child_wrap, &[&items.join("\n")])
}

/// Replace `%N$s` with `args[N - 1]` and each bare `%s` with the next argument.
///
/// Placeholders without a matching argument render as empty strings; any
/// other `%` is copied through.
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut next = 0;
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if let Some(after) = tail.strip_prefix('s') {
            out.push_str(args.get(next).copied().unwrap_or(""));
            next += 1;
            rest = after;
            continue;
        }
        let digits = tail.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && tail[digits..].starts_with("$s") {
            let n: usize = tail[..digits].parse().unwrap_or(0);
            if let Some(arg) = n.checked_sub(1).and_then(|i| args.get(i)) {
                out.push_str(arg);
            }
            rest = &tail[digits + 2..];
            continue;
        }
        out.push('%');
        rest = tail;
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NavOptions, SourceItem, Templates};
    use alloc::vec;

    fn three() -> MenuNode<u32> {
        MenuNode::from_items(
            vec![
                SourceItem::new("/home", "Home"),
                SourceItem::new("/blog", "Blog"),
                SourceItem::new("/about", "About"),
            ],
            NavOptions::default(),
        )
    }

    #[test]
    fn substitute_positional_and_sequential() {
        assert_eq!(substitute("%2$s-%1$s-%2$s", &["a", "b"]), "b-a-b");
        assert_eq!(substitute("<%s|%s>", &["x", "y"]), "<x|y>");
        assert_eq!(substitute("100% %9$s%", &["a"]), "100% %");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        assert_eq!(substitute("%1$s %2$s", &["%2$s", "b"]), "%2$s b");
    }

    #[test]
    fn renders_default_menu() {
        let html = render_menu(&three());
        let expected = "<ul class=\"priority-nav__menu\"><li class=\"priority-nav__menu__child\">\
            <a href=\"#\">More</a><ul>\
            <li class=\"priority-nav__menu__child\"><a href=\"/home\">Home</a></li>\n\
            <li class=\"priority-nav__menu__child\"><a href=\"/blog\">Blog</a></li>\n\
            <li class=\"priority-nav__menu__child\"><a href=\"/about\">About</a></li>\
            </ul></li></ul>";
        assert_eq!(html, expected);
    }

    #[test]
    fn empty_tree_has_no_wrap() {
        let root: MenuNode<u32> = MenuNode::from_items(vec![], NavOptions::default());
        assert_eq!(
            render_menu(&root),
            "<ul class=\"priority-nav__menu\"><li class=\"priority-nav__menu__child\">\
             <a href=\"#\">More</a></li></ul>"
        );
    }

    #[test]
    fn nested_children_render_inside_their_item() {
        let root: MenuNode<u32> = MenuNode::from_items(
            vec![SourceItem::new("/a", "A").with_child(SourceItem::new("/a/1", "A1"))],
            NavOptions::default(),
        );
        let html = render_menu(&root);
        assert!(html.contains(
            "<a href=\"/a\">A</a><ul><li class=\"priority-nav__menu__child\"><a href=\"/a/1\">A1</a></li></ul></li>"
        ));
    }

    #[test]
    fn apostrophes_are_escaped() {
        let root: MenuNode<u32> = MenuNode::from_items(
            vec![SourceItem::new("/faq", "What's new")],
            NavOptions::default(),
        );
        assert!(render_menu(&root).contains("<a href=\"/faq\">What&apos;s new</a>"));
    }

    #[test]
    fn rendering_is_pure() {
        let root = three();
        assert_eq!(render_menu(&root), render_menu(&root));
        assert_eq!(render_menu(&root), render_menu(&root.clone()));
    }

    #[test]
    fn custom_templates_and_escaping() {
        let templates = Templates {
            menu: String::from("<nav class=\"%1$s\">%4$s%5$s</nav>"),
            child_wrap: String::from("<ol>%s</ol>"),
            child: String::from("<li class=\"%1$s\" data-href=\"%2$s\">%3$s</li>"),
        };
        let root: MenuNode<u32> = MenuNode::from_items(
            vec![SourceItem::new("/q?a=1&b=\"2\"", "<Tom & Jerry>")],
            NavOptions::default()
                .with_templates(templates)
                .with_menu_title("…more"),
        );
        assert_eq!(
            render_menu(&root),
            "<nav class=\"priority-nav__menu\">…more<ol>\
             <li class=\"priority-nav__menu__child\" data-href=\"/q?a=1&amp;b=&quot;2&quot;\">\
             &lt;Tom &amp; Jerry&gt;</li></ol></nav>"
        );
    }
}
