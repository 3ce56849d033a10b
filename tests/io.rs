//! File-level round trips of the interchange formats.

use std::fs;
use std::path::PathBuf;
use std::process;

use orthograph::graph::io::{load_txt, parse_txt, save_graphml, save_txt, to_graphml};
use orthograph::sat::VarisatOracle;
use orthograph::{
    make_orthogonal_drawing, DrawingConfig, LayoutError, OrthogonalDrawing, UndirectedGraph,
};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("orthograph-test-{}-{name}", process::id()))
}

fn square() -> UndirectedGraph {
    parse_txt("nodes:\n0\n1\n2\n3\nedges:\n0 1\n1 2\n2 3\n3 0\n").unwrap()
}

#[test]
fn txt_file_round_trip() {
    let graph = square();
    let path = temp_path("graph.txt");
    save_txt(&graph, &path).unwrap();
    let loaded = load_txt(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(graph, loaded);
}

#[test]
fn missing_txt_file_is_io_error() {
    let result = load_txt(temp_path("does-not-exist.txt"));
    assert!(matches!(result, Err(LayoutError::Io(_))));
}

#[test]
fn drawing_json_file_round_trip() {
    let graph = square();
    let drawing = make_orthogonal_drawing(
        &graph,
        &VarisatOracle::new(),
        &DrawingConfig::default(),
        None,
    )
    .unwrap();
    let path = temp_path("drawing.json");
    drawing.save_json(&path).unwrap();
    let loaded = OrthogonalDrawing::load_json(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(drawing.graph, loaded.graph);
    assert_eq!(drawing.attributes, loaded.attributes);
    assert_eq!(drawing.shape, loaded.shape);
}

#[test]
fn drawing_exports_to_graphml() {
    let graph = square();
    let drawing = make_orthogonal_drawing(
        &graph,
        &VarisatOracle::new(),
        &DrawingConfig::default(),
        None,
    )
    .unwrap();
    let xml = to_graphml(&drawing.graph, &drawing.attributes).unwrap();
    for node in drawing.graph.nodes() {
        assert!(xml.contains(&format!(r#"<node id="n{node}">"#)));
    }
    assert_eq!(xml.matches("<edge ").count(), drawing.graph.edge_count());
    assert!(xml.contains(r#"<data key="d0">black</data>"#));

    let path = temp_path("drawing.graphml");
    save_graphml(&drawing.graph, &drawing.attributes, &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), xml);
    fs::remove_file(&path).unwrap();
}
