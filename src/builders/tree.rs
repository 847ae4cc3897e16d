use std::collections::BTreeMap;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// A node owns its children; names are kept sorted by the map.
#[derive(Debug, Default)]
struct TreeNode {
    children: BTreeMap<String, TreeNode>,
    annotation: Option<String>,
    /// Width of the rendered line up to the end of the name.
    display_len: usize,
}

/// A file tree assembled from `/`-separated paths, rendered like `tree(1)`.
///
/// ```text
/// └── project
///     ├── docs
///     │   └── readme.md [0.49 KB]
///     └── src
///         └── main.rs   [2.50 KB]
///
/// 3 directories, 2 files
/// ```
#[derive(Debug, Default)]
pub struct FileTree {
    root: TreeNode,
    max_display_len: usize,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a path, creating intermediate directories. The annotation is
    /// attached to the last component.
    pub fn add_path(&mut self, path: &str, annotation: Option<String>) {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        let mut current = &mut self.root;

        for (level, part) in parts.iter().enumerate() {
            current = current.children.entry((*part).to_string()).or_default();
            current.display_len =
                level * SPACE.chars().count() + BRANCH.chars().count() + part.chars().count();

            if level == parts.len() - 1 && annotation.is_some() {
                current.annotation = annotation.clone();
                self.max_display_len = self.max_display_len.max(current.display_len);
            }
        }
    }

    /// Counts `(directories, files)`; a node without children is a file.
    pub fn stats(&self) -> (usize, usize) {
        fn walk(node: &TreeNode) -> (usize, usize) {
            node.children.values().fold((0, 0), |(dirs, files), child| {
                if child.children.is_empty() {
                    (dirs, files + 1)
                } else {
                    let (d, f) = walk(child);
                    (dirs + 1 + d, files + f)
                }
            })
        }
        walk(&self.root)
    }

    /// Renders the tree followed by a blank line and the summary line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let count = self.root.children.len();
        for (index, (name, child)) in self.root.children.iter().enumerate() {
            self.render_node(&mut out, name, child, "", index + 1 == count);
        }

        let (dirs, files) = self.stats();
        out.push_str(&format!("\n{dirs} directories, {files} files\n"));
        out
    }

    fn render_node(
        &self,
        out: &mut String,
        name: &str,
        node: &TreeNode,
        prefix: &str,
        is_last: bool,
    ) {
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(name);
        if let Some(annotation) = &node.annotation {
            let padding = self.max_display_len.saturating_sub(node.display_len) + 1;
            out.push_str(&" ".repeat(padding));
            out.push_str(&format!("[{annotation}]"));
        }
        out.push('\n');

        let child_prefix = format!("{prefix}{}", if is_last { SPACE } else { PIPE });
        let count = node.children.len();
        for (index, (child_name, child)) in node.children.iter().enumerate() {
            self.render_node(out, child_name, child, &child_prefix, index + 1 == count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested_tree_with_aligned_annotations() {
        let mut tree = FileTree::new();
        tree.add_path("project/src/index.js", Some("2.5KB".into()));
        tree.add_path("project/src/utils/helper.js", Some("1.2KB".into()));
        tree.add_path("project/docs/readme.md", Some("500B".into()));
        tree.add_path("project/package.json", Some("1KB".into()));

        let expected = "\
└── project
    ├── docs
    │   └── readme.md     [500B]
    ├── package.json      [1KB]
    └── src
        ├── index.js      [2.5KB]
        └── utils
            └── helper.js [1.2KB]

3 directories, 4 files
";
        assert_eq!(tree.render(), expected);
    }

    #[test]
    fn test_stats_of_flat_tree() {
        let mut tree = FileTree::new();
        tree.add_path("a.txt", None);
        tree.add_path("b.txt", None);
        assert_eq!(tree.stats(), (0, 2));
        assert_eq!(tree.render(), "├── a.txt\n└── b.txt\n\n0 directories, 2 files\n");
    }
}
