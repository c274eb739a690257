use crate::{ScalarGraph, Value, ValueId};
use std::fmt;

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.6}, grad: {:.6}]", self.data(), self.grad())
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("id", &self.id.index())
            .field("data", &self.data())
            .field("grad", &self.grad())
            .field("op", &self.op())
            .finish()
    }
}

impl ScalarGraph {
    /// Text dump of the graph below `root`: one `op -> parent` line per edge,
    /// indented by depth, each edge followed by that parent's own edges.
    /// Shared subgraphs are expanded only once.
    pub fn render_graph(&self, root: ValueId) -> String {
        let mut out = format!("{}\n", self.value(root));
        let mut seen = vec![false; self.len()];
        seen[root.index()] = true;
        // (node, indent, next parent to print)
        let mut stack = vec![(root, 0usize, 0usize)];

        while let Some(top) = stack.last_mut() {
            let (id, indent, k) = *top;
            let Some(parent) = self.nodes.borrow()[id.index()].parents.get(k).copied() else {
                stack.pop();
                continue;
            };
            top.2 += 1;

            out.push_str(&format!("{} {} -> {}\n", " ".repeat(indent), self.op(id).label(), self.value(parent)));
            if !std::mem::replace(&mut seen[parent.index()], true) {
                stack.push((parent, indent + 1, 0));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use crate::ScalarGraph;

    #[test]
    fn render_lists_every_edge() {
        let graph = ScalarGraph::new();
        let a = graph.leaf(2.0);
        let b = graph.leaf(3.0);
        let c = (a * b).relu();

        let text = c.render_graph();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "[6.000000, grad: 0.000000]");
        assert_eq!(lines[1], " ReLU -> [6.000000, grad: 0.000000]");
        assert_eq!(lines[2], "  * -> [2.000000, grad: 0.000000]");
        assert_eq!(lines[3], "  * -> [3.000000, grad: 0.000000]");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn render_descends_into_each_parent_in_turn() {
        let graph = ScalarGraph::new();
        let a = graph.leaf(2.0);
        let b = graph.leaf(3.0);
        let d = (a * b) + b.relu();

        let text = d.render_graph();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "[9.000000, grad: 0.000000]",
                " + -> [6.000000, grad: 0.000000]",
                "  * -> [2.000000, grad: 0.000000]",
                "  * -> [3.000000, grad: 0.000000]",
                " + -> [3.000000, grad: 0.000000]",
                "  ReLU -> [3.000000, grad: 0.000000]",
            ]
        );
    }
}
