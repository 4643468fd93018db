/// A request to expand "all hosts under node `node_id` of type
/// `node_type`" into a host list.
///
/// Acts as a map key: two descriptors are equal iff `(node_type, node_id)`
/// match. Resolution results never participate in identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopologyNode {
    pub node_type: String,
    pub node_id: i64,
}

impl TopologyNode {
    pub fn new(node_type: impl Into<String>, node_id: i64) -> Self {
        Self {
            node_type: node_type.into(),
            node_id,
        }
    }
}
