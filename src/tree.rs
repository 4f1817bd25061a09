/*!
 * Project tree rendering
 */

use std::collections::BTreeMap;
use std::path::Path;

/// Heading placed above the tree block
pub const TREE_HEADING: &str = "# Project Structure";

/// A directory level keyed by raw component name
#[derive(Debug, Default)]
struct TreeNode {
    children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn insert<'a>(&mut self, components: impl Iterator<Item = &'a str>) {
        let mut node = self;
        for part in components {
            node = node.children.entry(part.to_string()).or_default();
        }
    }

    fn render(&self, prefix: &str, out: &mut Vec<String>) {
        let last = self.children.len().saturating_sub(1);
        for (i, (name, child)) in self.children.iter().enumerate() {
            let (branch, continuation) = if i < last {
                ("├── ", "│   ")
            } else {
                ("└── ", "    ")
            };
            out.push(format!("{}{}{}", prefix, branch, name));
            child.render(&format!("{}{}", prefix, continuation), out);
        }
    }
}

/// Render relative paths as a fenced, box-drawn tree preceded by a heading
pub fn render_tree<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    let mut root = TreeNode::default();
    for path in paths {
        let components: Vec<String> = path
            .as_ref()
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        root.insert(components.iter().map(String::as_str));
    }

    let mut lines = vec![TREE_HEADING.to_string(), "```".to_string()];
    root.render("", &mut lines);
    lines.push("```".to_string());
    lines
}
