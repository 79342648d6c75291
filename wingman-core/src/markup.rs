use regex::Regex;
use std::sync::OnceLock;

/// One rewrite step of the display formatter. Pattern and replacement are
/// plain data so every rule stays unit-testable on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteRule {
    pub name: &'static str,
    pub pattern: &'static str,
    pub replacement: &'static str,
}

/// Ordered rewrite chain for suggestion and transcript display.
///
/// Escaping runs first so no later rule can re-process user-supplied text as
/// markup. Line breaks become `<br>` but keep the `\n`, which is what lets
/// the line-anchored block rules further down still see line starts. Block
/// rules consume the `<br>` of their own line so headings and list items
/// don't render with a stray break.
///
/// Rust's `regex` crate has no backreferences, so the bold and italic rules
/// are split into star and underscore variants instead of `(\*\*|__)...\1`.
pub const RULES: &[RewriteRule] = &[
    RewriteRule {
        name: "escape_amp",
        pattern: r"&",
        replacement: "&amp;",
    },
    RewriteRule {
        name: "escape_lt",
        pattern: r"<",
        replacement: "&lt;",
    },
    RewriteRule {
        name: "escape_gt",
        pattern: r">",
        replacement: "&gt;",
    },
    RewriteRule {
        name: "line_break",
        pattern: r"\n",
        replacement: "<br>\n",
    },
    RewriteRule {
        name: "bold_star",
        pattern: r"\*\*(.*?)\*\*",
        replacement: "<strong>$1</strong>",
    },
    RewriteRule {
        name: "bold_underscore",
        pattern: r"__(.*?)__",
        replacement: "<strong>$1</strong>",
    },
    RewriteRule {
        name: "italic_star",
        pattern: r"\*(.*?)\*",
        replacement: "<em>$1</em>",
    },
    RewriteRule {
        name: "italic_underscore",
        pattern: r"_(.*?)_",
        replacement: "<em>$1</em>",
    },
    // Single line and non-empty, so fence markers are left for the fenced
    // rule below instead of being eaten pair-by-pair.
    RewriteRule {
        name: "code_inline",
        pattern: r"`([^`\n]+?)`",
        replacement: "<code>$1</code>",
    },
    RewriteRule {
        name: "code_fence",
        pattern: r"(?s)```(.*?)```",
        replacement: "<pre><code>$1</code></pre>",
    },
    RewriteRule {
        name: "heading_1",
        pattern: r"(?m)^# (.*?)(?:<br>)?$",
        replacement: "<h1>$1</h1>",
    },
    RewriteRule {
        name: "heading_2",
        pattern: r"(?m)^## (.*?)(?:<br>)?$",
        replacement: "<h2>$1</h2>",
    },
    RewriteRule {
        name: "heading_3",
        pattern: r"(?m)^### (.*?)(?:<br>)?$",
        replacement: "<h3>$1</h3>",
    },
    RewriteRule {
        name: "list_item",
        pattern: r"(?m)^- (.*?)(?:<br>)?$",
        replacement: "<li>$1</li>",
    },
    RewriteRule {
        name: "list_wrap",
        pattern: r"(?:<li>.*?</li>\n?)+",
        replacement: "<ul>${0}</ul>",
    },
];

const ESCAPE_RULE_COUNT: usize = 3;

fn compiled() -> &'static [Regex] {
    static COMPILED: OnceLock<Vec<Regex>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|rule| Regex::new(rule.pattern).expect("valid markup rule pattern"))
            .collect()
    })
}

fn apply_rules(text: &str, count: usize) -> String {
    let mut out = text.to_string();
    for (rule, re) in RULES.iter().zip(compiled()).take(count) {
        out = re.replace_all(&out, rule.replacement).into_owned();
    }
    out
}

/// The escaping prefix of the chain on its own, for callers that want raw
/// text made display-safe without any markup interpretation.
pub fn escape(text: &str) -> String {
    apply_rules(text, ESCAPE_RULE_COUNT)
}

/// Runs the full rewrite chain once, in order, over the input.
///
/// Pure and total; there is no failure path. Not idempotent: a second
/// pass would escape the markup emitted by the first.
pub fn format(text: &str) -> String {
    apply_rules(text, RULES.len())
}
