//! Reader and writer for the `.zx` text format.
//!
//! The format is line-oriented ASCII. Each non-comment line declares one
//! vertex:
//!
//! ```text
//! <Kind><Id> (<row>, <col>) [<EdgeKind><NeighborId>]* [<extra>]
//! ```
//!
//! `Kind` is one of `I`, `O`, `Z`, `X`, `H`; `EdgeKind` is `S` or `H`.
//! `<extra>` is a qubit id for `I`/`O` lines and a phase expression `p/q`
//! (units of π) otherwise. A literal `-` coordinate requests auto-placement.
//! Comments start with `//`. An edge needs to be listed by only one of its
//! endpoints; the writer lists both when `complete` is requested.

use logos::Logos;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt::Write as _;

use alsvin_types::Phase;

use crate::error::{ZxError, ZxResult};
use crate::graph::ZxGraph;
use crate::vertex::{EdgeKind, VertexId, VertexKind};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"//[^\n]*")]
enum Token {
    #[token("\n")]
    Newline,

    /// A kind letter glued to an id: vertex declaration or neighbor
    /// reference, decided by position.
    #[regex(r"[IOZXHS][0-9]+", |lex| {
        let s = lex.slice();
        let id: u32 = s[1..].parse().ok()?;
        Some((s.as_bytes()[0] as char, id))
    })]
    Tag((char, u32)),

    #[regex(r"-?[0-9]+/[0-9]+", |lex| {
        let (n, d) = lex.slice().split_once('/')?;
        Some((n.parse::<i64>().ok()?, d.parse::<i64>().ok()?))
    })]
    Frac((i64, i64)),

    #[regex(r"-?[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok(), priority = 3)]
    Int(i64),

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token("-")]
    Dash,
}

#[derive(Debug)]
struct VertexLine {
    line: usize,
    kind_char: char,
    file_id: u32,
    row: Option<f64>,
    col: Option<f64>,
    edges: Vec<(EdgeKind, u32)>,
    qubit: Option<i64>,
    phase: Option<Phase>,
}

fn parse_err(line: usize, message: impl Into<String>) -> ZxError {
    ZxError::ParseError {
        line,
        message: message.into(),
    }
}

fn lex(src: &str) -> ZxResult<Vec<(usize, Token)>> {
    let mut tokens = Vec::new();
    let mut line = 1;
    for (tok, span) in Token::lexer(src).spanned() {
        match tok {
            Ok(Token::Newline) => {
                tokens.push((line, Token::Newline));
                line += 1;
            }
            Ok(t) => tokens.push((line, t)),
            Err(()) => {
                return Err(parse_err(
                    line,
                    format!("unexpected input '{}'", &src[span]),
                ));
            }
        }
    }
    Ok(tokens)
}

fn parse_lines(src: &str) -> ZxResult<Vec<VertexLine>> {
    let tokens = lex(src)?;
    let mut lines = Vec::new();
    let mut iter = tokens.into_iter().peekable();

    while let Some((line, tok)) = iter.next() {
        let (kind_char, file_id) = match tok {
            Token::Newline => continue,
            Token::Tag((c, id)) if "IOZXH".contains(c) => (c, id),
            other => {
                return Err(parse_err(line, format!("expected vertex declaration, got {other:?}")));
            }
        };

        let mut decl = VertexLine {
            line,
            kind_char,
            file_id,
            row: None,
            col: None,
            edges: Vec::new(),
            qubit: None,
            phase: None,
        };

        // Coordinates: ( row , col ) with `-` for auto-placement.
        match iter.next() {
            Some((_, Token::LParen)) => {}
            _ => return Err(parse_err(line, "expected '(' after vertex id")),
        }
        decl.row = parse_coord(&mut iter, line)?;
        match iter.next() {
            Some((_, Token::Comma)) => {}
            _ => return Err(parse_err(line, "expected ',' between coordinates")),
        }
        decl.col = parse_coord(&mut iter, line)?;
        match iter.next() {
            Some((_, Token::RParen)) => {}
            _ => return Err(parse_err(line, "expected ')' after coordinates")),
        }

        // Neighbor references, then the optional trailing extra.
        loop {
            match iter.peek() {
                Some((_, Token::Tag((c, id)))) if *c == 'S' || *c == 'H' => {
                    let kind = if *c == 'S' {
                        EdgeKind::Simple
                    } else {
                        EdgeKind::Hadamard
                    };
                    decl.edges.push((kind, *id));
                    iter.next();
                }
                Some((_, Token::Int(_) | Token::Frac(_))) => {
                    let (_, tok) = iter.next().expect("peeked");
                    match (decl.kind_char, tok) {
                        ('I' | 'O', Token::Int(q)) => decl.qubit = Some(q),
                        ('I' | 'O', Token::Frac(_)) => {
                            return Err(parse_err(line, "boundary extra must be a qubit id"));
                        }
                        (_, Token::Int(n)) => decl.phase = Some(Phase::new(n, 1)),
                        (_, Token::Frac((n, d))) => {
                            if d <= 0 {
                                return Err(parse_err(line, "phase denominator must be positive"));
                            }
                            decl.phase = Some(Phase::new(n, d));
                        }
                        _ => unreachable!(),
                    }
                }
                Some((_, Token::Newline)) | None => {
                    iter.next();
                    break;
                }
                Some((_, other)) => {
                    return Err(parse_err(line, format!("unexpected token {other:?}")));
                }
            }
        }
        lines.push(decl);
    }
    Ok(lines)
}

fn parse_coord(
    iter: &mut std::iter::Peekable<std::vec::IntoIter<(usize, Token)>>,
    line: usize,
) -> ZxResult<Option<f64>> {
    match iter.next() {
        Some((_, Token::Int(n))) => Ok(Some(n as f64)),
        Some((_, Token::Float(f))) => Ok(Some(f)),
        Some((_, Token::Dash)) => Ok(None),
        _ => Err(parse_err(line, "expected coordinate or '-'")),
    }
}

/// Parse a `.zx` document into a graph.
pub fn parse_zx(src: &str) -> ZxResult<ZxGraph> {
    let lines = parse_lines(src)?;
    let mut graph = ZxGraph::new();
    let mut ids: FxHashMap<u32, VertexId> = FxHashMap::default();
    let mut auto_col = 1.0;

    // First pass: declare vertices.
    for decl in &lines {
        if ids.contains_key(&decl.file_id) {
            return Err(parse_err(
                decl.line,
                format!("vertex {} declared twice", decl.file_id),
            ));
        }
        let id = match decl.kind_char {
            'I' | 'O' => {
                let qubit = decl.qubit.unwrap_or_else(|| {
                    if decl.kind_char == 'I' {
                        graph.inputs().len() as i64
                    } else {
                        graph.outputs().len() as i64
                    }
                }) as i32;
                if decl.kind_char == 'I' {
                    graph.add_input(qubit)
                } else {
                    graph.add_output(qubit)
                }
                .map_err(|e| parse_err(decl.line, e.to_string()))?
            }
            c => {
                let kind = match c {
                    'Z' => VertexKind::Z,
                    'X' => VertexKind::X,
                    _ => VertexKind::HBox,
                };
                let phase = decl.phase.unwrap_or_else(|| kind.default_phase());
                graph.add_spider(kind, phase, 0.0, 0.0)
            }
        };
        // Explicit coordinates win over auto-placement.
        let vert = graph.vertex_mut(id).expect("just created");
        if let Some(row) = decl.row {
            vert.row = row;
        }
        match decl.col {
            Some(col) => vert.col = col,
            None => {
                vert.col = auto_col;
                auto_col += 1.0;
            }
        }
        ids.insert(decl.file_id, id);
    }

    // Second pass: connect. Each undirected edge is added once even when
    // both endpoints list it.
    let mut seen: FxHashSet<(VertexId, VertexId, EdgeKind)> = FxHashSet::default();
    for decl in &lines {
        let u = ids[&decl.file_id];
        for &(kind, neighbor) in &decl.edges {
            let v = *ids.get(&neighbor).ok_or_else(|| {
                parse_err(
                    decl.line,
                    format!("edge references undeclared vertex {neighbor}"),
                )
            })?;
            let key = if u <= v { (u, v, kind) } else { (v, u, kind) };
            if seen.insert(key) {
                graph.connect_normalized(u, v, kind);
            }
        }
    }
    Ok(graph)
}

/// Render a graph in the `.zx` format. With `complete`, every edge is
/// listed by both endpoints; otherwise only by its lower-id endpoint.
pub fn write_zx(graph: &ZxGraph, complete: bool) -> String {
    let mut out = String::new();
    for (id, vert) in graph.vertices() {
        let kind_char = match vert.kind {
            VertexKind::Boundary => {
                if graph.inputs().contains(&id) {
                    'I'
                } else {
                    'O'
                }
            }
            VertexKind::Z => 'Z',
            VertexKind::X => 'X',
            VertexKind::HBox => 'H',
        };
        write!(out, "{kind_char}{} ({}, {})", id.0, vert.row, vert.col).expect("write to string");
        for (n, k) in graph.neighbors(id) {
            if complete || id < n {
                write!(out, " {k}{}", n.0).expect("write to string");
            }
        }
        match vert.kind {
            VertexKind::Boundary => {
                write!(out, " {}", vert.qubit).expect("write to string");
            }
            kind => {
                if vert.phase != kind.default_phase() {
                    write!(out, " {}", vert.phase).expect("write to string");
                }
            }
        }
        out.push('\n');
    }
    out
}
