//! Validation pass over the raw request document

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use super::fields::FieldReader;
use super::{
    BeamColumnSpec, ElementSpec, EntityKind, LoadSpec, NodalLoadSpec, NodeSpec,
    UnsupportedEntity, ValidatedDocument, ELASTIC_BEAM_COLUMN, NODAL,
};
use crate::error::{SchemaError, SchemaProblem};

/// Node ids seen so far, and coordinates of the nodes that passed validation
#[derive(Default)]
struct NodeTable {
    coords: HashMap<i64, [f64; 2]>,
    /// Every id given by a node entry, valid or not
    declared: HashSet<i64>,
}

impl NodeTable {
    /// Coordinates of `id`, reporting it when no node entry declares it
    ///
    /// A declared but malformed node has already been reported on its own
    /// entry, so references to it are not reported again.
    fn resolve(&self, reader: &mut FieldReader<'_>, field: &str, id: i64) -> Option<[f64; 2]> {
        let found = self.coords.get(&id).copied();
        if found.is_none() && !self.declared.contains(&id) {
            reader.report(field, SchemaProblem::UnknownNode(id));
        }
        found
    }
}

/// Outcome for one element or load entry
enum Entry<T> {
    Supported(T),
    Unsupported(UnsupportedEntity),
    Invalid,
}

/// Check a request document and convert it into typed specs
///
/// Missing `nodes`, `elements` or `loads` keys mean "none of that kind".
/// Every problem in the document is reported, not only the first.
pub fn validate(document: &Value) -> Result<ValidatedDocument, Vec<SchemaError>> {
    let Some(root) = document.as_object() else {
        return Err(vec![SchemaError::new(
            EntityKind::Document,
            None,
            "",
            SchemaProblem::WrongType {
                expected: "an object",
            },
        )]);
    };

    let mut errors = Vec::new();
    let mut validated = ValidatedDocument::default();

    // Nodes first: elements and loads refer to them by id
    let mut table = NodeTable::default();
    for (index, object) in entries(root, EntityKind::Node, &mut errors) {
        let mut reader = FieldReader::new(object, EntityKind::Node, index);
        let id = reader.integer("id");
        reader.set_id(id);
        let node = read_node(&mut reader);

        if let Some(id) = id {
            if !table.declared.insert(id) {
                reader.report("id", SchemaProblem::DuplicateId(id));
            } else if let Some(node) = node {
                table.coords.insert(node.id, [node.x, node.y]);
                validated.input.nodes.push(node);
            }
        }
        errors.extend(reader.finish());
    }

    let mut element_ids = HashSet::new();
    for (index, object) in entries(root, EntityKind::Element, &mut errors) {
        let mut reader = FieldReader::new(object, EntityKind::Element, index);
        match read_element(&mut reader, index, &table) {
            Entry::Supported(element) => {
                if element_ids.insert(element.id()) {
                    validated.input.elements.push(element);
                } else {
                    reader.report("id", SchemaProblem::DuplicateId(element.id()));
                }
            }
            Entry::Unsupported(entity) => validated.unsupported.push(entity),
            Entry::Invalid => {}
        }
        errors.extend(reader.finish());
    }

    for (index, object) in entries(root, EntityKind::Load, &mut errors) {
        let mut reader = FieldReader::new(object, EntityKind::Load, index);
        match read_load(&mut reader, index, &table) {
            Entry::Supported(load) => validated.input.loads.push(load),
            Entry::Unsupported(entity) => validated.unsupported.push(entity),
            Entry::Invalid => {}
        }
        errors.extend(reader.finish());
    }

    if errors.is_empty() {
        Ok(validated)
    } else {
        Err(errors)
    }
}

/// Object entries of one top-level collection, with their positions
fn entries<'a>(
    root: &'a Map<String, Value>,
    kind: EntityKind,
    errors: &mut Vec<SchemaError>,
) -> Vec<(usize, &'a Map<String, Value>)> {
    let items = match root.get(kind.collection()) {
        None => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.push(SchemaError::new(
                kind,
                None,
                "",
                SchemaProblem::WrongType {
                    expected: "an array",
                },
            ));
            return Vec::new();
        }
    };

    let mut objects = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(object) => objects.push((index, object)),
            None => errors.push(SchemaError::new(
                kind,
                Some(index),
                "",
                SchemaProblem::WrongType {
                    expected: "an object",
                },
            )),
        }
    }
    objects
}

/// Fields of a node entry whose id has already been read
fn read_node(reader: &mut FieldReader<'_>) -> Option<NodeSpec> {
    let id = reader.id()?;
    let x = reader.number("x");
    let y = reader.number("y");
    let fix = reader.fixity("fix");

    Some(NodeSpec {
        id,
        x: x?,
        y: y?,
        fix: fix.ok()?,
    })
}

/// The type tag, or the entity record when the tag is not `supported`
///
/// A missing tag is a schema error. A tag that is not a string can never
/// match, so it is unsupported like any unknown name.
fn read_tag(
    reader: &mut FieldReader<'_>,
    kind: EntityKind,
    index: usize,
    supported: &str,
) -> Result<(), Option<UnsupportedEntity>> {
    let tag = match reader.peek("type") {
        None => {
            reader.report("type", SchemaProblem::Missing);
            return Err(None);
        }
        Some(Value::String(tag)) if tag == supported => return Ok(()),
        Some(Value::String(tag)) => tag.clone(),
        Some(other) => other.to_string(),
    };
    Err(Some(UnsupportedEntity {
        entity: kind,
        index,
        id: reader.peek("id").and_then(Value::as_i64),
        tag,
    }))
}

fn read_element(
    reader: &mut FieldReader<'_>,
    index: usize,
    table: &NodeTable,
) -> Entry<ElementSpec> {
    match read_tag(reader, EntityKind::Element, index, ELASTIC_BEAM_COLUMN) {
        Ok(()) => {}
        Err(Some(entity)) => return Entry::Unsupported(entity),
        Err(None) => return Entry::Invalid,
    }

    let id = reader.integer("id");
    reader.set_id(id);
    let nodes = reader.integers::<2>("nodes");
    let a = reader.positive("A");
    let e = reader.positive("E");
    let iz = reader.positive("Iz");

    let nodes = nodes.and_then(|nodes| {
        let mut ends = [None; 2];
        for (k, node) in nodes.iter().enumerate() {
            ends[k] = table.resolve(reader, &format!("nodes[{}]", k), *node);
        }
        let [Some(i), Some(j)] = ends else {
            return None;
        };
        if i == j {
            reader.report("nodes", SchemaProblem::ZeroLength);
            return None;
        }
        Some(nodes)
    });

    match (id, nodes, a, e, iz) {
        (Some(id), Some(nodes), Some(a), Some(e), Some(iz)) => {
            Entry::Supported(ElementSpec::ElasticBeamColumn(BeamColumnSpec {
                id,
                nodes,
                a,
                e,
                iz,
            }))
        }
        _ => Entry::Invalid,
    }
}

fn read_load(
    reader: &mut FieldReader<'_>,
    index: usize,
    table: &NodeTable,
) -> Entry<LoadSpec> {
    match read_tag(reader, EntityKind::Load, index, NODAL) {
        Ok(()) => {}
        Err(Some(entity)) => return Entry::Unsupported(entity),
        Err(None) => return Entry::Invalid,
    }

    let node = reader
        .integer("node")
        .filter(|node| table.resolve(reader, "node", *node).is_some());
    let value = reader.numbers::<3>("value");

    match (node, value) {
        (Some(node), Some(value)) => Entry::Supported(LoadSpec::Nodal(NodalLoadSpec { node, value })),
        _ => Entry::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Fixity;
    use serde_json::json;

    fn problems(document: Value) -> Vec<String> {
        validate(&document)
            .unwrap_err()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_missing_collections_are_empty() {
        let validated = validate(&json!({})).unwrap();
        assert_eq!(validated, ValidatedDocument::default());

        let validated = validate(&json!({"nodes": [], "comment": "ignored"})).unwrap();
        assert!(validated.input.nodes.is_empty());
    }

    #[test]
    fn test_valid_document() {
        let validated = validate(&json!({
            "nodes": [
                {"id": 1, "x": 0.0, "y": 0.0, "fix": [1, 1, 1]},
                {"id": 2, "x": 3, "y": 0.0}
            ],
            "elements": [
                {"id": 1, "type": "ElasticBeamColumn", "nodes": [1, 2], "A": 0.01, "E": 2e11, "Iz": 1e-4}
            ],
            "loads": [
                {"type": "Nodal", "node": 2, "value": [0, -1000, 0]}
            ]
        }))
        .unwrap();

        let input = validated.input;
        assert_eq!(input.nodes[0].fix, Some(Fixity::fixed()));
        assert_eq!(input.nodes[1].fix, None);
        assert_eq!(input.nodes[1].x, 3.0);
        assert_eq!(input.elements[0].id(), 1);
        assert_eq!(
            input.loads[0],
            LoadSpec::Nodal(NodalLoadSpec {
                node: 2,
                value: [0.0, -1000.0, 0.0]
            })
        );
        assert!(validated.unsupported.is_empty());
    }

    #[test]
    fn test_top_level_shape() {
        assert_eq!(problems(json!([1, 2])), ["document: expected an object"]);
        assert_eq!(
            problems(json!({"nodes": null, "loads": {}})),
            ["nodes: expected an array", "loads: expected an array"]
        );
        assert_eq!(problems(json!({"nodes": [7]})), ["nodes[0]: expected an object"]);
    }

    #[test]
    fn test_collects_all_problems() {
        let errors = problems(json!({
            "nodes": [
                {"id": 1, "x": 0.0, "y": 0.0},
                {"id": 1, "x": 1.0, "y": 0.0},
                {"id": 3, "x": 2.0, "y": 0.0, "fix": [1, 1]},
                {"x": 3.0, "y": 0.0}
            ],
            "elements": [
                {"id": 9, "type": "ElasticBeamColumn", "nodes": [1, 42], "A": 0.0, "E": 1.0, "Iz": 1.0}
            ],
            "loads": [
                {"type": "Nodal", "node": 5, "value": [1.0, 2.0]}
            ]
        }));

        assert_eq!(
            errors,
            [
                "nodes[1] (id 1).id: duplicate id 1",
                "nodes[2] (id 3).fix: expected 3 values, found 2",
                "nodes[3].id: missing required field",
                "elements[0] (id 9).A: must be positive, got 0",
                "elements[0] (id 9).nodes[1]: references undeclared node 42",
                "loads[0].node: references undeclared node 5",
                "loads[0].value: expected 3 values, found 2",
            ]
        );
    }

    #[test]
    fn test_unknown_type_tags_are_set_aside() {
        let validated = validate(&json!({
            "nodes": [{"id": 1, "x": 0.0, "y": 0.0}],
            "elements": [{"id": 5, "type": "Truss", "nodes": [1, 99]}],
            "loads": [{"type": "Distributed", "element": 5}]
        }))
        .unwrap();

        assert!(validated.input.elements.is_empty());
        assert!(validated.input.loads.is_empty());
        let tags: Vec<String> = validated.unsupported.iter().map(ToString::to_string).collect();
        assert_eq!(
            tags,
            [
                "elements[0] (id 5): unsupported type 'Truss'",
                "loads[0]: unsupported type 'Distributed'",
            ]
        );
    }

    #[test]
    fn test_non_string_type_tag_is_unsupported() {
        let validated = validate(&json!({
            "elements": [{"id": 2, "type": 7, "nodes": [1, 2]}],
            "loads": [{"type": null, "node": 1}]
        }))
        .unwrap();

        let tags: Vec<String> = validated.unsupported.iter().map(ToString::to_string).collect();
        assert_eq!(
            tags,
            [
                "elements[0] (id 2): unsupported type '7'",
                "loads[0]: unsupported type 'null'",
            ]
        );
    }

    #[test]
    fn test_references_to_malformed_nodes_are_not_undeclared() {
        let errors = problems(json!({
            "nodes": [
                {"id": 1, "x": 0.0, "y": 0.0},
                {"id": 2, "x": "far", "y": 0.0}
            ],
            "elements": [
                {"id": 1, "type": "ElasticBeamColumn", "nodes": [1, 2], "A": 1.0, "E": 1.0, "Iz": 1.0},
                {"id": 2, "type": "ElasticBeamColumn", "nodes": [1, 3], "A": 1.0, "E": 1.0, "Iz": 1.0}
            ],
            "loads": [{"type": "Nodal", "node": 2, "value": [0.0, 1.0, 0.0]}]
        }));

        assert_eq!(
            errors,
            [
                "nodes[1] (id 2).x: expected a number",
                "elements[1] (id 2).nodes[1]: references undeclared node 3",
            ]
        );
    }

    #[test]
    fn test_type_tag_is_required() {
        assert_eq!(
            problems(json!({"elements": [{"id": 1, "nodes": [1, 2]}]})),
            ["elements[0].type: missing required field"]
        );
    }

    #[test]
    fn test_coincident_nodes() {
        let errors = problems(json!({
            "nodes": [
                {"id": 1, "x": 1.0, "y": 1.0},
                {"id": 2, "x": 1.0, "y": 1.0}
            ],
            "elements": [
                {"id": 1, "type": "ElasticBeamColumn", "nodes": [1, 2], "A": 1.0, "E": 1.0, "Iz": 1.0},
                {"id": 2, "type": "ElasticBeamColumn", "nodes": [1, 1], "A": 1.0, "E": 1.0, "Iz": 1.0}
            ]
        }));
        assert_eq!(
            errors,
            [
                "elements[0] (id 1).nodes: element end nodes coincide",
                "elements[1] (id 2).nodes: element end nodes coincide",
            ]
        );
    }

    #[test]
    fn test_duplicate_element_ids() {
        let errors = problems(json!({
            "nodes": [
                {"id": 1, "x": 0.0, "y": 0.0},
                {"id": 2, "x": 1.0, "y": 0.0}
            ],
            "elements": [
                {"id": 3, "type": "ElasticBeamColumn", "nodes": [1, 2], "A": 1.0, "E": 1.0, "Iz": 1.0},
                {"id": 3, "type": "ElasticBeamColumn", "nodes": [2, 1], "A": 1.0, "E": 1.0, "Iz": 1.0}
            ]
        }));
        assert_eq!(errors, ["elements[1] (id 3).id: duplicate id 3"]);
    }
}
