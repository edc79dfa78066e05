use winnow::prelude::*;
use winnow::ascii::{line_ending, space0, space1, till_line_ending};
use winnow::combinator::{alt, eof, opt, repeat};
use winnow::token::{take_until, take_while};

use crate::error::{Error, Result};
use crate::graph_ast::*;
use crate::options::Direction;

pub fn parse_graph(input: &str) -> Result<GraphScript> {
    let mut rest = input;
    let script = graph_script(&mut rest).map_err(|_| syntax_error(rest))?;
    if !rest.trim().is_empty() {
        return Err(syntax_error(rest));
    }
    Ok(script)
}

fn syntax_error(rest: &str) -> Error {
    let context = rest.trim_start().lines().next().unwrap_or("").trim();
    let context = if context.chars().count() > 40 {
        format!("{}...", context.chars().take(40).collect::<String>())
    } else {
        context.to_string()
    };
    Error::Syntax { context }
}

fn graph_script(input: &mut &str) -> winnow::Result<GraphScript> {
    repeat(0.., alt((blank_line, comment_line))).map(|()| ()).parse_next(input)?;
    space0.parse_next(input)?;
    alt(("graph", "flowchart")).parse_next(input)?;
    space1.parse_next(input)?;
    let direction = direction.parse_next(input)?;
    line_end.parse_next(input)?;

    let lines: Vec<Option<Statement>> = repeat(0.., graph_line).parse_next(input)?;

    Ok(GraphScript {
        direction,
        statements: lines.into_iter().flatten().collect(),
    })
}

fn graph_line(input: &mut &str) -> winnow::Result<Option<Statement>> {
    space0.parse_next(input)?;

    if input.is_empty() {
        return Err(winnow::error::ParserError::from_input(input));
    }

    let result = alt((
        blank_line.map(|_| None),
        comment_line.map(|_| None),
        subgraph_block.map(Some),
        edge_line.map(Some),
        alt_edge_line.map(Some),
        node_line.map(Some),
    ))
    .parse_next(input)?;

    Ok(result)
}

fn blank_line(input: &mut &str) -> winnow::Result<()> {
    (space0, line_ending).void().parse_next(input)
}

fn comment_line(input: &mut &str) -> winnow::Result<()> {
    (space0, "%%", till_line_ending, opt(line_ending))
        .void()
        .parse_next(input)
}

/// Optional trailing spaces, then a newline or the end of input.
fn line_end(input: &mut &str) -> winnow::Result<()> {
    (space0, alt((line_ending, eof))).void().parse_next(input)
}

fn at_end_keyword(input: &str) -> bool {
    input
        .strip_prefix("end")
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
}

fn subgraph_block(input: &mut &str) -> winnow::Result<Statement> {
    "subgraph".parse_next(input)?;
    space1.parse_next(input)?;
    let header = take_while(1.., |c: char| c != '\n' && c != '\r').parse_next(input)?;
    let (name, label) = subgraph_header(header.trim_end());
    opt(line_ending).parse_next(input)?;

    let mut statements: Vec<Statement> = Vec::new();
    loop {
        space0.parse_next(input)?;
        if at_end_keyword(input) {
            "end".parse_next(input)?;
            line_end.parse_next(input)?;
            break;
        }
        if input.is_empty() {
            // Unterminated block.
            return Err(winnow::error::ParserError::from_input(input));
        }
        if let Some(stmt) = graph_line(input)? {
            statements.push(stmt);
        }
    }

    Ok(Statement::Subgraph(Subgraph {
        name,
        label,
        statements,
    }))
}

/// `subgraph id [Label]` names the cluster explicitly; a bare `subgraph Label`
/// derives the name from the label.
fn subgraph_header(header: &str) -> (String, String) {
    if let Some((id, rest)) = header.split_once('[') {
        if let Some(label) = rest.strip_suffix(']') {
            let id = id.trim();
            if !id.is_empty() && id.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return (id.to_string(), label.trim().to_string());
            }
        }
    }
    let name = header.replace(' ', "_").to_lowercase();
    (name, header.to_string())
}

fn direction(input: &mut &str) -> winnow::Result<Direction> {
    alt((
        "TD".value(Direction::TopToBottom),
        "TB".value(Direction::TopToBottom),
        "BT".value(Direction::BottomToTop),
        "LR".value(Direction::LeftToRight),
        "RL".value(Direction::RightToLeft),
    ))
    .parse_next(input)
}

fn identifier<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

fn node_ref(input: &mut &str) -> winnow::Result<NodeDecl> {
    let id = identifier.parse_next(input)?;
    let shape_label = opt(shape_label).parse_next(input)?;
    let (shape, label) = shape_label.unwrap_or_else(|| (NodeShape::Box, id.to_string()));
    Ok(NodeDecl {
        id: id.to_string(),
        label,
        shape,
    })
}

fn shape_label(input: &mut &str) -> winnow::Result<(NodeShape, String)> {
    alt((
        circle_label.map(|l| (NodeShape::Circle, l)),
        round_label.map(|l| (NodeShape::Round, l)),
        diamond_label.map(|l| (NodeShape::Diamond, l)),
        bracketed_label.map(|l| (NodeShape::Box, l)),
    ))
    .parse_next(input)
}

fn quoted_inner(quote: char, closer: char) -> impl FnMut(&mut &str) -> winnow::Result<String> {
    move |input: &mut &str| {
        if input.starts_with(quote) {
            let _q: char = winnow::token::any.parse_next(input)?;
            let text = take_while(1.., move |c: char| c != quote).parse_next(input)?;
            let result = text.to_string();
            let _q2: char = winnow::token::any.parse_next(input)?;
            Ok(result)
        } else {
            let text = take_while(1.., move |c: char| c != closer && c != '\n').parse_next(input)?;
            Ok(text.to_string())
        }
    }
}

fn round_label(input: &mut &str) -> winnow::Result<String> {
    "(".parse_next(input)?;
    let text = quoted_inner('"', ')').parse_next(input)?;
    ")".parse_next(input)?;
    Ok(text)
}

fn diamond_label(input: &mut &str) -> winnow::Result<String> {
    "{".parse_next(input)?;
    let text = quoted_inner('"', '}').parse_next(input)?;
    "}".parse_next(input)?;
    Ok(text)
}

fn circle_label(input: &mut &str) -> winnow::Result<String> {
    "((".parse_next(input)?;
    let text = take_while(1.., |c: char| c != ')').parse_next(input)?;
    "))".parse_next(input)?;
    Ok(text.to_string())
}

fn bracketed_label(input: &mut &str) -> winnow::Result<String> {
    "[".parse_next(input)?;
    let text = quoted_inner('"', ']').parse_next(input)?;
    "]".parse_next(input)?;
    Ok(text)
}

fn edge_type(input: &mut &str) -> winnow::Result<EdgeType> {
    alt((
        "-.->".value(EdgeType::DottedArrow),
        "-.-".value(EdgeType::DottedLink),
        "==>".value(EdgeType::ThickArrow),
        "===".value(EdgeType::ThickLink),
        "-->".value(EdgeType::Arrow),
        "---".value(EdgeType::OpenLink),
    ))
    .parse_next(input)
}

fn edge_label(input: &mut &str) -> winnow::Result<String> {
    "|".parse_next(input)?;
    let text = take_while(1.., |c: char| c != '|' && c != '\n').parse_next(input)?;
    "|".parse_next(input)?;
    Ok(text.to_string())
}

fn edge_line(input: &mut &str) -> winnow::Result<Statement> {
    let from = node_ref.parse_next(input)?;
    space0.parse_next(input)?;
    let edge_type = edge_type.parse_next(input)?;
    let label = opt(edge_label).parse_next(input)?;
    space0.parse_next(input)?;
    let mut targets = vec![node_ref.parse_next(input)?];

    loop {
        space0.parse_next(input)?;
        if opt("&").parse_next(input)?.is_none() {
            break;
        }
        space0.parse_next(input)?;
        targets.push(node_ref.parse_next(input)?);
    }
    line_end.parse_next(input)?;

    let edges = targets
        .into_iter()
        .map(|to| EdgeDecl {
            from: from.clone(),
            to,
            edge_type,
            label: label.clone(),
        })
        .collect();
    Ok(Statement::Edges(edges))
}

fn alt_edge_line(input: &mut &str) -> winnow::Result<Statement> {
    let from = node_ref.parse_next(input)?;
    space0.parse_next(input)?;
    "-- ".parse_next(input)?;
    let (label_text, edge_type) = alt((
        (take_until(1.., " -->"), " -->".value(EdgeType::Arrow)),
        (take_until(1.., " ---"), " ---".value(EdgeType::OpenLink)),
    ))
    .parse_next(input)?;
    space0.parse_next(input)?;
    let to = node_ref.parse_next(input)?;
    line_end.parse_next(input)?;

    Ok(Statement::Edges(vec![EdgeDecl {
        from,
        to,
        edge_type,
        label: Some(label_text.trim().to_string()),
    }]))
}

fn node_line(input: &mut &str) -> winnow::Result<Statement> {
    let decl = node_ref.parse_next(input)?;
    line_end.parse_next(input)?;
    Ok(Statement::Node(decl))
}
