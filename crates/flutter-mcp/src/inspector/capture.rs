//! Widget tree capture via the inspector service extensions

use serde_json::{Map, Value, json};

use super::error::InspectorError;
use super::node::{WidgetBounds, WidgetNode};
use super::tree::WidgetTree;
use crate::vm::VmServiceClient;

/// Object group passed to every inspector extension call
const OBJECT_GROUP: &str = "flutter-mcp";

/// Depth of each individual subtree fetch; deeper branches are re-fetched
/// from their truncation point.
const SUBTREE_FETCH_DEPTH: u32 = 10;

/// Diagnostic property names that carry a widget's text content
const TEXT_PROPERTY_NAMES: [&str; 2] = ["data", "text"];

/// Captures widget trees from a connected VM service client.
pub struct Inspector<'a> {
    client: &'a VmServiceClient,
}

impl<'a> Inspector<'a> {
    /// Create an inspector over a connected client
    pub fn new(client: &'a VmServiceClient) -> Self {
        Self { client }
    }

    /// Snapshot the widget tree.
    ///
    /// `max_depth` of 0 means unbounded; otherwise nodes at depth
    /// `max_depth` and below the root are cut. The root widget id is
    /// fetched once per snapshot; subtrees are fetched in chunks of
    /// [`SUBTREE_FETCH_DEPTH`] levels and truncated branches re-fetched
    /// until the depth bound is reached.
    pub async fn get_widget_tree(&self, max_depth: usize) -> super::Result<WidgetTree> {
        let isolate_id = self.client.get_main_isolate_id().await?;

        let root_json = self
            .call_extension("ext.flutter.inspector.getRootWidget", json!({}))
            .await?;
        let root_id = node_id(&root_json)
            .ok_or_else(|| InspectorError::Malformed("root widget carries no id".to_string()))?;

        let subtree = self.fetch_subtree(&isolate_id, &root_id).await?;

        let mut tree = WidgetTree::new();

        // Worklist traversal; children are pushed in reverse so ids land in
        // the parent's children_ids in original order.
        let mut stack: Vec<(Value, String, usize)> = vec![(subtree, String::new(), 0)];

        while let Some((node_json, parent_id, depth)) = stack.pop() {
            if max_depth != 0 && depth >= max_depth {
                continue;
            }

            let mut node = parse_node(&node_json, depth);
            node.parent_id.clone_from(&parent_id);

            let id = node.id.clone();
            if tree.get(&id).is_some() {
                tracing::debug!(id, "duplicate widget id in subtree payload, skipping");
                continue;
            }

            if !parent_id.is_empty() {
                tree.link_child(&parent_id, &id);
            }
            tree.insert(node);

            let descend = max_depth == 0 || depth + 1 < max_depth;
            if !descend {
                continue;
            }

            let children = match node_json.get("children").and_then(Value::as_array) {
                Some(children) if !children.is_empty() => children.clone(),
                _ if node_json
                    .get("hasChildren")
                    .and_then(Value::as_bool)
                    .unwrap_or(false) =>
                {
                    // The per-request fetch depth truncated this branch;
                    // re-fetch from here.
                    let refetched = self.fetch_subtree(&isolate_id, &id).await?;
                    refetched
                        .get("children")
                        .and_then(Value::as_array)
                        .cloned()
                        .unwrap_or_default()
                }
                _ => Vec::new(),
            };

            for child in children.into_iter().rev() {
                stack.push((child, id.clone(), depth + 1));
            }
        }

        Ok(tree)
    }

    /// Fetch one widget's full details by id.
    pub async fn get_widget_properties(&self, widget_id: &str) -> super::Result<WidgetNode> {
        let isolate_id = self.client.get_main_isolate_id().await?;

        let node_json = self
            .call_extension(
                "ext.flutter.inspector.getDetailsSubtree",
                json!({
                    "isolateId": isolate_id,
                    "arg": widget_id,
                    "objectGroup": OBJECT_GROUP,
                    "subtreeDepth": 1,
                }),
            )
            .await
            .map_err(|e| match e {
                InspectorError::Vm(crate::vm::VmError::Upstream { .. }) => {
                    InspectorError::WidgetNotFound(widget_id.to_string())
                }
                other => other,
            })?;

        if node_json.is_null() {
            return Err(InspectorError::WidgetNotFound(widget_id.to_string()));
        }

        let mut node = parse_node(&node_json, 0);
        node.children_ids = node_json
            .get("children")
            .and_then(Value::as_array)
            .map(|children| children.iter().filter_map(node_id).collect())
            .unwrap_or_default();

        Ok(node)
    }

    async fn fetch_subtree(&self, isolate_id: &str, widget_id: &str) -> super::Result<Value> {
        self.call_extension(
            "ext.flutter.inspector.getDetailsSubtree",
            json!({
                "isolateId": isolate_id,
                "arg": widget_id,
                "objectGroup": OBJECT_GROUP,
                "subtreeDepth": SUBTREE_FETCH_DEPTH,
            }),
        )
        .await
    }

    /// Call an inspector extension, unwrapping the payload envelope
    async fn call_extension(&self, method: &str, mut params: Value) -> super::Result<Value> {
        if params.get("isolateId").is_none() {
            let isolate_id = self.client.get_main_isolate_id().await?;
            params["isolateId"] = json!(isolate_id);
            params["objectGroup"] = json!(OBJECT_GROUP);
        }

        let reply = self.client.call_service_method(method, params).await?;

        // Inspector extensions wrap the node payload in a "result" field.
        Ok(reply.get("result").cloned().unwrap_or(reply))
    }
}

/// The service id for a diagnostics node, if it carries one
fn node_id(node: &Value) -> Option<String> {
    node.get("valueId")
        .or_else(|| node.get("objectId"))
        .and_then(Value::as_str)
        .map(String::from)
}

/// Materialize one diagnostics-node payload into a [`WidgetNode`].
///
/// Recognized fields become typed attributes; everything else in the
/// diagnostic property list is preserved verbatim in `properties`.
fn parse_node(node_json: &Value, depth: usize) -> WidgetNode {
    let id = node_id(node_json).unwrap_or_else(|| format!("synthetic-{depth}"));

    let widget_type = node_json
        .get("widgetRuntimeType")
        .or_else(|| node_json.get("type"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();

    let description = node_json
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or(&widget_type)
        .to_string();

    let mut node = WidgetNode::new(id, widget_type);
    node.description = description;
    node.bounds = parse_bounds(node_json);

    if let Some(props) = node_json.get("properties").and_then(Value::as_array) {
        for prop in props {
            let Some(name) = prop.get("name").and_then(Value::as_str) else {
                continue;
            };
            let rendered = prop
                .get("value")
                .and_then(Value::as_str)
                .or_else(|| prop.get("description").and_then(Value::as_str))
                .unwrap_or_default();

            if TEXT_PROPERTY_NAMES.contains(&name) {
                node.text = Some(strip_quotes(rendered).to_string());
            } else if name == "enabled" {
                node.enabled = rendered != "false";
            } else if name == "visible" {
                node.visible = rendered != "false";
            } else {
                node.properties
                    .insert(name.to_string(), Value::String(rendered.to_string()));
            }
        }
    }

    copy_extra_fields(node_json, &mut node.properties);

    node
}

/// Top-level diagnostic fields (beyond the structural ones) kept verbatim
fn copy_extra_fields(node_json: &Value, properties: &mut Map<String, Value>) {
    const STRUCTURAL: [&str; 8] = [
        "valueId",
        "objectId",
        "widgetRuntimeType",
        "type",
        "description",
        "children",
        "properties",
        "hasChildren",
    ];

    if let Some(obj) = node_json.as_object() {
        for (key, value) in obj {
            if STRUCTURAL.contains(&key.as_str()) || key == "renderObject" {
                continue;
            }
            properties.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}

/// Strip one pair of surrounding quotes from a diagnostic rendering
fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

/// Layout geometry, from the render object when present
fn parse_bounds(node_json: &Value) -> Option<WidgetBounds> {
    let geometry = node_json
        .get("renderObject")
        .and_then(|r| r.get("bounds"))
        .or_else(|| node_json.get("bounds"))?;

    let read = |key: &str| geometry.get(key).and_then(Value::as_f64);

    Some(WidgetBounds::new(
        read("x").unwrap_or(0.0),
        read("y").unwrap_or(0.0),
        read("width")?,
        read("height")?,
    ))
}
