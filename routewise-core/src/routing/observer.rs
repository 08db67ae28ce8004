use log::{debug, trace};
use petgraph::graph::NodeIndex;

/// Instrumentation hook invoked by the search loop
pub trait SearchObserver {
    /// Called once per node taken off the frontier (stale entries excluded)
    fn on_expand(&mut self, node: NodeIndex, g_score: f64, f_score: f64);

    /// Called when the search ends, successful or not
    fn on_finish(&mut self, _expanded: usize, _found: bool) {}
}

/// Observer that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_expand(&mut self, _node: NodeIndex, _g_score: f64, _f_score: f64) {}
}

impl<F> SearchObserver for F
where
    F: FnMut(NodeIndex, f64, f64),
{
    fn on_expand(&mut self, node: NodeIndex, g_score: f64, f_score: f64) {
        self(node, g_score, f_score);
    }
}

/// Traces every expansion and logs a summary at the end
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl SearchObserver for LoggingObserver {
    fn on_expand(&mut self, node: NodeIndex, g_score: f64, f_score: f64) {
        trace!(
            "Expanding node {} with g_score {g_score:.2} f_score {f_score:.2}",
            node.index()
        );
    }

    fn on_finish(&mut self, expanded: usize, found: bool) {
        debug!("Search finished after {expanded} expansions, path found: {found}");
    }
}
