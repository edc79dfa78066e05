use pretty_assertions::assert_eq;

fn node_line<'a>(output: &'a str, id: &str) -> &'a str {
    let needle = format!("\"{id}\" [");
    output
        .lines()
        .find(|l| l.trim_start().starts_with(&needle))
        .unwrap_or_else(|| panic!("no declaration for {id} in:\n{output}"))
}

fn edge_line<'a>(output: &'a str, from: &str, to: &str) -> &'a str {
    let needle = format!("\"{from}\" -> \"{to}\"");
    output
        .lines()
        .find(|l| l.trim_start().starts_with(&needle))
        .unwrap_or_else(|| panic!("no edge {from} -> {to} in:\n{output}"))
}

// =============================================================================
// Direction
// =============================================================================

#[test]
fn script_graph_td() {
    let output = diagrams::render("graph TD\n    A --> B\n").unwrap();
    assert!(output.contains("rankdir=\"TB\";"));
}

#[test]
fn script_graph_tb_same_as_td() {
    let td = diagrams::render("graph TD\n    A --> B\n").unwrap();
    let tb = diagrams::render("graph TB\n    A --> B\n").unwrap();
    assert_eq!(td, tb, "TB produces same output as TD");
}

#[test]
fn script_graph_lr_and_rl() {
    let lr = diagrams::render("graph LR\n    A --> B\n").unwrap();
    assert!(lr.contains("rankdir=\"LR\";"));
    let rl = diagrams::render("graph RL\n    A --> B\n").unwrap();
    assert!(rl.contains("rankdir=\"RL\";"));
}

#[test]
fn script_flowchart_keyword() {
    let graph = diagrams::render("graph TD\n    A --> B\n").unwrap();
    let flowchart = diagrams::render("flowchart TD\n    A --> B\n").unwrap();
    assert_eq!(graph, flowchart, "flowchart keyword behaves same as graph");
}

// =============================================================================
// Nodes
// =============================================================================

#[test]
fn script_node_implicit_label() {
    let output = diagrams::render("graph TD\n    MyNode --> Other\n").unwrap();
    assert!(node_line(&output, "MyNode").contains("label=\"MyNode\""));
    assert!(node_line(&output, "Other").contains("label=\"Other\""));
}

#[test]
fn script_node_explicit_label() {
    let output = diagrams::render("graph TD\n    A[Hello World] --> B[End]\n").unwrap();
    assert!(node_line(&output, "A").contains("label=\"Hello World\""));
    assert!(node_line(&output, "B").contains("label=\"End\""));
}

#[test]
fn script_node_dedup_first_label_wins() {
    let output = diagrams::render("graph TD\n    A[First] --> B\n    A[Second] --> C\n").unwrap();
    assert!(output.contains("First"), "first-seen label kept");
    assert!(!output.contains("Second"), "later label ignored");
    assert_eq!(output.matches("\"A\" [").count(), 1);
}

#[test]
fn script_node_shapes() {
    let output = diagrams::render("graph TD\n    A[Box]\n    B(Round)\n    C{Diamond}\n    D((Circle))\n").unwrap();

    let a = node_line(&output, "A");
    assert!(a.contains("shape=\"box\""));
    assert!(!a.contains("style="));

    let b = node_line(&output, "B");
    assert!(b.contains("shape=\"box\""));
    assert!(b.contains("style=\"rounded\""));

    assert!(node_line(&output, "C").contains("shape=\"diamond\""));
    assert!(node_line(&output, "D").contains("shape=\"circle\""));
}

#[test]
fn script_node_label_with_quotes_is_escaped() {
    let output = diagrams::render("graph TD\n    A[say \"hi\"]\n").unwrap();
    assert!(node_line(&output, "A").contains(r#"label="say \"hi\"""#), "{output}");
}

// =============================================================================
// Edges
// =============================================================================

#[test]
fn script_edge_arrow() {
    let output = diagrams::render("graph TD\n    A --> B\n").unwrap();
    assert!(edge_line(&output, "A", "B").contains("dir=\"forward\""));
}

#[test]
fn script_edge_open_link() {
    let output = diagrams::render("graph TD\n    A --- B\n").unwrap();
    assert!(edge_line(&output, "A", "B").contains("dir=\"none\""));
}

#[test]
fn script_edge_dotted_and_thick() {
    let output = diagrams::render("graph TD\n    A -.-> B\n    B ==> C\n    C -.- D\n").unwrap();
    assert!(edge_line(&output, "A", "B").contains("style=\"dotted\""));
    assert!(edge_line(&output, "B", "C").contains("style=\"bold\""));
    let cd = edge_line(&output, "C", "D");
    assert!(cd.contains("style=\"dotted\""));
    assert!(cd.contains("dir=\"none\""));
}

#[test]
fn script_edge_label_pipe_and_alt_syntax_agree() {
    let pipe = diagrams::render("graph TD\n    A -->|yes| B\n").unwrap();
    let alt = diagrams::render("graph TD\n    A -- yes --> B\n").unwrap();
    assert_eq!(pipe, alt);
    assert!(edge_line(&pipe, "A", "B").contains("label=\"yes\""));
}

#[test]
fn script_edge_no_label() {
    let output = diagrams::render("graph TD\n    A --> B\n").unwrap();
    assert!(!edge_line(&output, "A", "B").contains("label="));
}

#[test]
fn script_fan_out_shares_label() {
    let output = diagrams::render("graph TD\n    A -->|go| B & C\n").unwrap();
    assert!(edge_line(&output, "A", "B").contains("label=\"go\""));
    assert!(edge_line(&output, "A", "C").contains("label=\"go\""));
}

#[test]
fn script_repeated_edge_is_kept() {
    let output = diagrams::render("graph TD\n    A --> B\n    A --> B\n").unwrap();
    assert_eq!(output.matches("\"A\" -> \"B\"").count(), 2);
}

// =============================================================================
// Subgraphs
// =============================================================================

#[test]
fn script_subgraph_wraps_its_nodes() {
    let input = "\
graph TD
    C
    subgraph Backend
        A --> B
    end
    C --> A
";
    let output = diagrams::render(input).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    let open = lines
        .iter()
        .position(|l| l.contains("subgraph \"cluster_backend\""))
        .unwrap();
    let close = open
        + lines[open..]
            .iter()
            .position(|l| l.trim() == "}")
            .unwrap();
    let inside = |id: &str| {
        let needle = format!("\"{id}\" [");
        lines[open..close].iter().any(|l| l.trim_start().starts_with(&needle))
    };
    assert!(inside("A"));
    assert!(inside("B"));
    assert!(!inside("C"));
    assert!(output.contains("label=\"Backend\";"));
}

#[test]
fn script_nested_subgraphs_cycle_backgrounds() {
    let input = "\
graph TD
    subgraph One
        subgraph Two
            A
        end
    end
";
    let output = diagrams::render(input).unwrap();
    let one = output.find("subgraph \"cluster_one\"").unwrap();
    let two = output.find("subgraph \"cluster_two\"").unwrap();
    assert!(one < two);
    assert!(output[one..two].contains("bgcolor=\"#E5F5FD\";"));
    assert!(output[two..].contains("bgcolor=\"#EBF3E7\";"));
}

#[test]
fn script_subgraph_explicit_id() {
    let output = diagrams::render("graph TD\n    subgraph api [Public API]\n        A\n    end\n").unwrap();
    assert!(output.contains("subgraph \"cluster_api\""));
    assert!(output.contains("label=\"Public API\";"));
}

#[test]
fn script_repeated_subgraph_blocks_merge() {
    let input = "\
graph TD
    subgraph S
        A
    end
    subgraph S
        B
    end
";
    let output = diagrams::render(input).unwrap();
    assert_eq!(output.matches("subgraph \"cluster_s\"").count(), 1);
    let open = output.find("subgraph \"cluster_s\"").unwrap();
    let close = open + output[open..].find("\n    }").unwrap();
    assert!(output[open..close].contains("\"A\" ["), "{output}");
    assert!(output[open..close].contains("\"B\" ["), "{output}");
}

#[test]
fn script_duplicate_subgraph_names_error() {
    let input = "\
graph TD
    subgraph One
        subgraph Shared
            A
        end
    end
    subgraph Two
        subgraph Shared
            B
        end
    end
";
    let err = diagrams::render(input).unwrap_err();
    assert!(err.to_string().contains("cluster_shared"), "got: {err}");
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn script_syntax_error_reports_line() {
    let err = diagrams::render("graph TD\n    A --> B\n    A ~~> B\n").unwrap_err();
    assert_eq!(err.to_string(), "syntax error in graph script: unexpected `A ~~> B`");
}

#[test]
fn script_missing_direction_is_error() {
    assert!(diagrams::render("graph\n    A --> B\n").is_err());
}
