//! Reading and writing graphs: the line-oriented txt format and a lossy
//! GraphML export.

use std::fs;
use std::io;
use std::path::Path;

use xml::common::XmlVersion;
use xml::writer::{EmitterConfig, Error as XmlError, EventWriter, XmlEvent};

use crate::attributes::GraphAttributes;
use crate::error::LayoutError;
use crate::graph::{NodeId, UndirectedGraph};

static GRAPHML_NAMESPACE: &str = "http://graphml.graphdrawing.org/xmlns";

/// Parse a graph from the txt format:
///
/// ```text
/// nodes:
/// 0
/// 1
/// edges:
/// 0 1
/// ```
///
/// Duplicate nodes, duplicate edges and self loops are rejected.
pub fn parse_txt(input: &str) -> Result<UndirectedGraph, LayoutError> {
    #[derive(PartialEq)]
    enum Section {
        None,
        Nodes,
        Edges,
    }
    let mut section = Section::None;
    let mut graph = UndirectedGraph::new();
    for (number, line) in input.lines().enumerate() {
        let line = line.trim();
        match line {
            "" => {}
            "nodes:" => section = Section::Nodes,
            "edges:" => section = Section::Edges,
            _ => match section {
                Section::None => {
                    return Err(LayoutError::InvalidInput(format!(
                        "line {}: content before any section header",
                        number + 1
                    )));
                }
                Section::Nodes => {
                    let id: NodeId = line.parse().map_err(|_| {
                        LayoutError::InvalidInput(format!("line {}: bad node id {line:?}", number + 1))
                    })?;
                    graph.add_node_with_id(id)?;
                }
                Section::Edges => {
                    let mut parts = line.split_whitespace();
                    let (u, v) = match (parts.next(), parts.next(), parts.next()) {
                        (Some(u), Some(v), None) => (u, v),
                        _ => {
                            return Err(LayoutError::InvalidInput(format!(
                                "line {}: bad edge {line:?}",
                                number + 1
                            )));
                        }
                    };
                    let u: NodeId = u.parse().map_err(|_| {
                        LayoutError::InvalidInput(format!("line {}: bad node id {u:?}", number + 1))
                    })?;
                    let v: NodeId = v.parse().map_err(|_| {
                        LayoutError::InvalidInput(format!("line {}: bad node id {v:?}", number + 1))
                    })?;
                    graph.add_edge(u, v)?;
                }
            },
        }
    }
    Ok(graph)
}

pub fn load_txt(path: impl AsRef<Path>) -> Result<UndirectedGraph, LayoutError> {
    let content = fs::read_to_string(path)?;
    parse_txt(&content)
}

pub fn to_txt(graph: &UndirectedGraph) -> String {
    let mut out = String::from("nodes:\n");
    for node in graph.nodes() {
        out.push_str(&format!("{node}\n"));
    }
    out.push_str("edges:\n");
    for (u, v) in graph.edges() {
        out.push_str(&format!("{u} {v}\n"));
    }
    out
}

pub fn save_txt(graph: &UndirectedGraph, path: impl AsRef<Path>) -> Result<(), LayoutError> {
    fs::write(path, to_txt(graph))?;
    Ok(())
}

fn xml_error(error: XmlError) -> LayoutError {
    match error {
        XmlError::Io(io) => LayoutError::Io(io),
        other => LayoutError::Io(io::Error::new(io::ErrorKind::Other, format!("{other:?}"))),
    }
}

fn data_tag<W: io::Write>(
    writer: &mut EventWriter<W>,
    key: &str,
    value: &str,
) -> Result<(), LayoutError> {
    writer
        .write(XmlEvent::start_element("data").attr("key", key))
        .map_err(xml_error)?;
    writer.write(XmlEvent::characters(value)).map_err(xml_error)?;
    writer.write(XmlEvent::end_element()).map_err(xml_error)
}

/// Render the graph as GraphML with node keys `d0` (color), `d1` (pos_x)
/// and `d2` (pos_y). Edges carry no data; the shape map is not exported,
/// so the format is lossy by design.
pub fn to_graphml(
    graph: &UndirectedGraph,
    attributes: &GraphAttributes,
) -> Result<String, LayoutError> {
    let mut buffer = Vec::new();
    let mut writer = EmitterConfig::new()
        .perform_indent(true)
        .create_writer(&mut buffer);

    writer
        .write(XmlEvent::StartDocument {
            version: XmlVersion::Version10,
            encoding: Some("UTF-8"),
            standalone: None,
        })
        .map_err(xml_error)?;
    writer
        .write(XmlEvent::start_element("graphml").attr("xmlns", GRAPHML_NAMESPACE))
        .map_err(xml_error)?;

    let any_color = graph.nodes().any(|n| attributes.try_color(n).is_some());
    let any_position = graph.nodes().any(|n| attributes.has_position(n));
    if any_color {
        writer
            .write(
                XmlEvent::start_element("key")
                    .attr("id", "d0")
                    .attr("for", "node")
                    .attr("attr.name", "color")
                    .attr("attr.type", "string"),
            )
            .map_err(xml_error)?;
        writer.write(XmlEvent::end_element()).map_err(xml_error)?;
    }
    if any_position {
        for (id, name) in [("d1", "pos_x"), ("d2", "pos_y")] {
            writer
                .write(
                    XmlEvent::start_element("key")
                        .attr("id", id)
                        .attr("for", "node")
                        .attr("attr.name", name)
                        .attr("attr.type", "int"),
                )
                .map_err(xml_error)?;
            writer.write(XmlEvent::end_element()).map_err(xml_error)?;
        }
    }

    writer
        .write(XmlEvent::start_element("graph").attr("id", "G").attr("edgedefault", "undirected"))
        .map_err(xml_error)?;
    for node in graph.nodes() {
        let id = format!("n{node}");
        writer
            .write(XmlEvent::start_element("node").attr("id", &id))
            .map_err(xml_error)?;
        if let Some(color) = attributes.try_color(node) {
            data_tag(&mut writer, "d0", color.as_str())?;
        }
        if let Some((x, y)) = attributes.try_position(node) {
            data_tag(&mut writer, "d1", &x.to_string())?;
            data_tag(&mut writer, "d2", &y.to_string())?;
        }
        writer.write(XmlEvent::end_element()).map_err(xml_error)?;
    }
    for (u, v) in graph.edges() {
        let source = format!("n{u}");
        let target = format!("n{v}");
        writer
            .write(
                XmlEvent::start_element("edge")
                    .attr("source", &source)
                    .attr("target", &target),
            )
            .map_err(xml_error)?;
        writer.write(XmlEvent::end_element()).map_err(xml_error)?;
    }
    writer.write(XmlEvent::end_element()).map_err(xml_error)?;
    writer.write(XmlEvent::end_element()).map_err(xml_error)?;

    String::from_utf8(buffer)
        .map_err(|e| LayoutError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

pub fn save_graphml(
    graph: &UndirectedGraph,
    attributes: &GraphAttributes,
    path: impl AsRef<Path>,
) -> Result<(), LayoutError> {
    fs::write(path, to_graphml(graph, attributes)?)?;
    Ok(())
}
