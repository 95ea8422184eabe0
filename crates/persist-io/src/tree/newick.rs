use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNode {
    pub label: Option<String>,
    /// Missing lengths read as zero
    pub branch_length: f64,
    pub children: Vec<usize>,
}

impl TreeNode {
    pub fn is_tip(&self) -> bool {
        self.children.is_empty()
    }
}

/// Rooted tree stored as an arena of nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct PhyloTree {
    nodes: Vec<TreeNode>,
    root: usize,
}

impl PhyloTree {
    /// Parse a Newick string up to its terminating `;` (or end of input).
    ///
    /// `[...]` comments such as BEAST `[&rate=...]` annotations are skipped.
    pub fn parse_newick(text: &str) -> Result<Self> {
        Parser::new(text).parse()
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn tips(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| n.is_tip())
    }

    /// Distance of every node from the root, indexed like `nodes()`.
    pub fn heights(&self) -> Vec<f64> {
        let mut heights = vec![0.0; self.nodes.len()];
        heights[self.root] = self.nodes[self.root].branch_length;

        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            for &child in &self.nodes[idx].children {
                heights[child] = heights[idx] + self.nodes[child].branch_length;
                stack.push(child);
            }
        }
        heights
    }

    /// Greatest distance from the root.
    pub fn tree_height(&self) -> f64 {
        self.heights().into_iter().fold(0.0, f64::max)
    }

    /// Calendar time of every node when the deepest tip sits at `highest_tip`.
    pub fn absolute_times(&self, highest_tip: f64) -> Vec<f64> {
        let heights = self.heights();
        let tree_height = heights.iter().copied().fold(0.0, f64::max);
        heights
            .into_iter()
            .map(|h| highest_tip - tree_height + h)
            .collect()
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    idx: usize,
    nodes: Vec<TreeNode>,
    open: Vec<usize>,
    root: Option<usize>,
    current: Option<usize>,
    expect_node: bool,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            idx: 0,
            nodes: Vec::new(),
            open: Vec::new(),
            root: None,
            current: None,
            expect_node: true,
        }
    }

    fn parse(mut self) -> Result<PhyloTree> {
        while let Some(&b) = self.bytes.get(self.idx) {
            match b {
                b';' => break,
                b'(' => {
                    let node = self.attach(None)?;
                    self.open.push(node);
                    self.expect_node = true;
                    self.idx += 1;
                }
                b',' => {
                    self.close_pending_leaf()?;
                    if self.open.is_empty() {
                        return Err(self.error("',' outside of a group"));
                    }
                    self.expect_node = true;
                    self.idx += 1;
                }
                b')' => {
                    self.close_pending_leaf()?;
                    let closed = self
                        .open
                        .pop()
                        .ok_or_else(|| self.error("unbalanced ')'"))?;
                    self.current = Some(closed);
                    self.idx += 1;
                }
                b':' => {
                    self.close_pending_leaf()?;
                    self.idx += 1;
                    let length = self.branch_length()?;
                    let node = self.current.ok_or_else(|| self.error("length without node"))?;
                    self.nodes[node].branch_length = length;
                }
                b'[' => self.skip_comment()?,
                b']' => return Err(self.error("unbalanced ']'")),
                b if b.is_ascii_whitespace() => self.idx += 1,
                _ => {
                    let label = self.label()?;
                    if self.expect_node {
                        self.attach(Some(label))?;
                    } else {
                        let node = self.current.ok_or_else(|| self.error("label without node"))?;
                        self.nodes[node].label = Some(label);
                    }
                }
            }
        }

        if !self.open.is_empty() {
            return Err(self.error("unbalanced '('"));
        }
        let root = self.root.ok_or_else(|| Error::Tree("empty Newick string".to_string()))?;
        Ok(PhyloTree {
            nodes: self.nodes,
            root,
        })
    }

    /// Create a node under the innermost open group (or as the root).
    fn attach(&mut self, label: Option<String>) -> Result<usize> {
        let idx = self.nodes.len();
        self.nodes.push(TreeNode {
            label,
            ..TreeNode::default()
        });

        match self.open.last() {
            Some(&parent) => self.nodes[parent].children.push(idx),
            None if self.root.is_none() => self.root = Some(idx),
            None => return Err(self.error("more than one root")),
        }

        self.current = Some(idx);
        self.expect_node = false;
        Ok(idx)
    }

    /// Unlabelled leaves such as `(,)` or `(:1,:2)`
    fn close_pending_leaf(&mut self) -> Result<()> {
        if self.expect_node {
            self.attach(None)?;
        }
        Ok(())
    }

    fn label(&mut self) -> Result<String> {
        let quote = self.bytes[self.idx];
        if quote == b'\'' || quote == b'"' {
            self.idx += 1;
            let start = self.idx;
            while self.idx < self.bytes.len() && self.bytes[self.idx] != quote {
                self.idx += 1;
            }
            if self.idx >= self.bytes.len() {
                return Err(self.error("unterminated quoted label"));
            }
            let label = String::from_utf8_lossy(&self.bytes[start..self.idx]).into_owned();
            self.idx += 1;
            return Ok(label);
        }

        let start = self.idx;
        while self.idx < self.bytes.len() && !is_delim(self.bytes[self.idx]) {
            self.idx += 1;
        }
        Ok(String::from_utf8_lossy(&self.bytes[start..self.idx])
            .trim()
            .to_string())
    }

    fn branch_length(&mut self) -> Result<f64> {
        while self.idx < self.bytes.len() {
            match self.bytes[self.idx] {
                b'[' => self.skip_comment()?,
                b if b.is_ascii_whitespace() => self.idx += 1,
                _ => break,
            }
        }
        let start = self.idx;
        while self.idx < self.bytes.len() && !is_delim(self.bytes[self.idx]) {
            self.idx += 1;
        }
        let text = String::from_utf8_lossy(&self.bytes[start..self.idx]);
        text.trim()
            .parse()
            .map_err(|_| self.error(&format!("invalid branch length {:?}", text.trim())))
    }

    fn skip_comment(&mut self) -> Result<()> {
        let start = self.idx;
        let mut depth = 0usize;
        while self.idx < self.bytes.len() {
            match self.bytes[self.idx] {
                b'[' => depth += 1,
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        self.idx += 1;
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.idx += 1;
        }
        self.idx = start;
        Err(self.error("unterminated comment"))
    }

    fn error(&self, msg: &str) -> Error {
        Error::Tree(format!("{} at byte {}", msg, self.idx))
    }
}

fn is_delim(b: u8) -> bool {
    matches!(b, b'(' | b')' | b',' | b':' | b';' | b'[' | b']')
}
