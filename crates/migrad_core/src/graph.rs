/// Depth-first post-order over an index-addressed DAG.
///
/// `parent(node, k)` yields the `k`-th parent of `node`, or `None` once the
/// parents are exhausted. Every node reachable from `root` appears exactly
/// once, after all of its parents; reversing the result gives an order in
/// which every consumer precedes the nodes it reads. Iterative, so graph depth
/// is bounded only by memory.
pub fn post_order<F>(root: usize, node_count: usize, parent: F) -> Vec<usize>
where
    F: Fn(usize, usize) -> Option<usize>,
{
    let mut visited = vec![false; node_count];
    let mut order = Vec::new();
    let mut stack = vec![(root, 0usize)];
    visited[root] = true;

    while let Some((node, k)) = stack.pop() {
        match parent(node, k) {
            Some(p) => {
                stack.push((node, k + 1));
                if !visited[p] {
                    visited[p] = true;
                    stack.push((p, 0));
                }
            }
            None => order.push(node),
        }
    }

    order
}
