//! Reader for the device description text format.
//!
//! Free-form key/value blocks:
//!
//! ```text
//! Name: guadalupe
//! Qubits: 5
//! Gate Set: {CX, RZ, SX, X}
//! Coupling:
//!   [[1], [0, 2], [1, 3], [2, 4], [3]]
//! SGERROR: [0.001, 0.001, 0.002, 0.001, 0.001]
//! SGTIME: [25.0, 25.0, 25.0, 25.0, 25.0]
//! CNOTERROR: [[0, 0.01], [0.01, 0]]
//! CNOTTIME: [[0, 120.5], [120.5, 0]]
//! ```
//!
//! `Coupling` lists each qubit's neighbors. The `CNOT*` tables are indexed
//! by qubit pair; entries for uncoupled pairs are ignored.

use logos::Logos;

use crate::device::{Device, DeviceInfo};
use crate::error::{DuostraError, DuostraResult};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"//[^\n]*")]
enum Token {
    #[token("\n")]
    Newline,

    #[regex(r"[A-Za-z][A-Za-z0-9 ]*:", |lex| {
        lex.slice().trim_end_matches(':').trim().to_string()
    })]
    Key(String),

    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok(), priority = 3)]
    Int(i64),

    #[regex(r"[A-Za-z][A-Za-z0-9_-]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,
}

struct TokenStream {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl TokenStream {
    fn lex(src: &str) -> DuostraResult<Self> {
        let mut tokens = Vec::new();
        let mut line = 1;
        for (tok, span) in Token::lexer(src).spanned() {
            match tok {
                Ok(Token::Newline) => line += 1,
                Ok(t) => tokens.push((line, t)),
                Err(()) => {
                    return Err(DuostraError::ParseError {
                        line,
                        message: format!("unexpected input '{}'", &src[span]),
                    });
                }
            }
        }
        Ok(Self { tokens, pos: 0 })
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos.min(self.tokens.len().saturating_sub(1)))
            .map_or(1, |(line, _)| *line)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += tok.is_some() as usize;
        tok
    }

    fn error(&self, message: impl Into<String>) -> DuostraError {
        DuostraError::ParseError {
            line: self.line(),
            message: message.into(),
        }
    }

    fn expect_number(&mut self) -> DuostraResult<f64> {
        match self.next() {
            Some(Token::Float(f)) => Ok(f),
            Some(Token::Int(i)) => Ok(i as f64),
            other => Err(self.error(format!("expected a number, got {other:?}"))),
        }
    }

    fn expect(&mut self, token: &Token, what: &str) -> DuostraResult<()> {
        match self.next() {
            Some(t) if t == *token => Ok(()),
            other => Err(self.error(format!("expected {what}, got {other:?}"))),
        }
    }

    /// `[x, y, ...]` of numbers.
    fn number_list(&mut self) -> DuostraResult<Vec<f64>> {
        self.expect(&Token::LBracket, "'['")?;
        let mut values = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RBracket) => {
                    self.next();
                    return Ok(values);
                }
                Some(Token::Comma) => {
                    self.next();
                }
                _ => values.push(self.expect_number()?),
            }
        }
    }

    /// `[[...], [...], ...]` of number lists.
    fn nested_number_list(&mut self) -> DuostraResult<Vec<Vec<f64>>> {
        self.expect(&Token::LBracket, "'['")?;
        let mut rows = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RBracket) => {
                    self.next();
                    return Ok(rows);
                }
                Some(Token::Comma) => {
                    self.next();
                }
                Some(Token::LBracket) => rows.push(self.number_list()?),
                other => return Err(self.error(format!("expected '[' or ']', got {other:?}"))),
            }
        }
    }

    /// `{gate, gate, ...}`.
    fn ident_set(&mut self) -> DuostraResult<Vec<String>> {
        self.expect(&Token::LBrace, "'{'")?;
        let mut names = Vec::new();
        loop {
            match self.next() {
                Some(Token::RBrace) => return Ok(names),
                Some(Token::Comma) => {}
                Some(Token::Ident(name)) => names.push(name),
                other => return Err(self.error(format!("expected gate name, got {other:?}"))),
            }
        }
    }
}

/// Parse a device description.
pub fn parse_device(src: &str) -> DuostraResult<Device> {
    let mut stream = TokenStream::lex(src)?;

    let mut name = String::new();
    let mut num_qubits: Option<usize> = None;
    let mut gate_set = Vec::new();
    let mut coupling: Option<Vec<Vec<f64>>> = None;
    let mut sg_error: Vec<f64> = Vec::new();
    let mut sg_time: Vec<f64> = Vec::new();
    let mut cx_error: Vec<Vec<f64>> = Vec::new();
    let mut cx_time: Vec<Vec<f64>> = Vec::new();

    while let Some(token) = stream.next() {
        let Token::Key(key) = token else {
            return Err(stream.error(format!("expected a 'Key:' block, got {token:?}")));
        };
        match key.as_str() {
            "Name" => match stream.next() {
                Some(Token::Ident(n)) => name = n,
                other => return Err(stream.error(format!("expected device name, got {other:?}"))),
            },
            "Qubits" => match stream.next() {
                Some(Token::Int(n)) if n > 0 => num_qubits = Some(n as usize),
                other => return Err(stream.error(format!("expected qubit count, got {other:?}"))),
            },
            "Gate Set" => gate_set = stream.ident_set()?,
            "Coupling" => coupling = Some(stream.nested_number_list()?),
            "SGERROR" => sg_error = stream.number_list()?,
            "SGTIME" => sg_time = stream.number_list()?,
            "CNOTERROR" => cx_error = stream.nested_number_list()?,
            "CNOTTIME" => cx_time = stream.nested_number_list()?,
            other => return Err(stream.error(format!("unknown block '{other}'"))),
        }
    }

    let n = num_qubits.ok_or_else(|| stream.error("missing 'Qubits:' block"))?;
    let coupling = coupling.ok_or_else(|| stream.error("missing 'Coupling:' block"))?;
    if coupling.len() != n {
        return Err(stream.error(format!(
            "coupling lists {} qubits, expected {n}",
            coupling.len()
        )));
    }

    let mut device = Device::new(name, n);
    device.set_gate_set(gate_set);
    for (i, neighbors) in coupling.iter().enumerate() {
        for &j in neighbors {
            let j = j as usize;
            if j >= n {
                return Err(stream.error(format!("coupling neighbor {j} out of range")));
            }
            device.add_edge(i, j);
        }
    }

    for (i, (&time, &error)) in sg_time.iter().zip(&sg_error).enumerate().take(n) {
        device.set_qubit_info(i, DeviceInfo { time, error });
    }
    for (i, row) in cx_time.iter().enumerate().take(n) {
        for (j, &time) in row.iter().enumerate().take(n) {
            if i < j && device.is_adjacent(i, j) {
                let error = cx_error
                    .get(i)
                    .and_then(|r| r.get(j))
                    .copied()
                    .unwrap_or_default();
                device.set_edge_info(i, j, DeviceInfo { time, error });
            }
        }
    }

    device.compute_paths();
    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
// five qubits in a line
Name: ibmq_line
Qubits: 5
Gate Set: {CX, RZ, SX, X, ID}
Coupling:
  [[1], [0, 2], [1, 3], [2, 4], [3]]
SGERROR: [0.001, 0.001, 0.002, 0.001, 0.001]
SGTIME: [25.0, 25.0, 25.0, 25.0, 25.0]
";

    #[test]
    fn test_parse_line_device() {
        let device = parse_device(EXAMPLE).unwrap();
        assert_eq!(device.name(), "ibmq_line");
        assert_eq!(device.num_qubits(), 5);
        assert!(device.is_adjacent(0, 1));
        assert!(!device.is_adjacent(0, 2));
        assert_eq!(device.distance(0, 4), Some(4));
        assert_eq!(device.gate_set().len(), 5);
        assert!((device.qubit_info(2).error - 0.002).abs() < 1e-9);
    }

    #[test]
    fn test_parse_cnot_tables() {
        let src = "\
Name: pair
Qubits: 2
Coupling: [[1], [0]]
CNOTERROR: [[0, 0.01], [0.01, 0]]
CNOTTIME: [[0, 120.5], [120.5, 0]]
";
        let device = parse_device(src).unwrap();
        let info = device.edge_info(0, 1).unwrap();
        assert!((info.time - 120.5).abs() < 1e-9);
        assert!((info.error - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_missing_qubits_is_an_error() {
        let src = "Name: broken\nCoupling: [[1], [0]]\n";
        assert!(matches!(
            parse_device(src),
            Err(DuostraError::ParseError { .. })
        ));
    }

    #[test]
    fn test_error_carries_line_number() {
        let src = "Name: x\nQubits: ?\n";
        match parse_device(src) {
            Err(DuostraError::ParseError { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
