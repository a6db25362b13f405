//! Recursive-descent parser for scenario files.

use std::f64::consts::PI;

use gseim_core::units::parse_value;
use gseim_core::{Circuit, NodeId};
use gseim_devices::{
    Capacitor, ClockedSwitch, CurrentSource, Diode, Inductor, Resistor, VoltageSource, Waveform,
};

use crate::error::{Error, Result};
use crate::lexer::{Lexer, SpannedToken, Token};
use crate::scenario::{Method, OutputVar, Scenario, SolveParams};

/// Parse a complete scenario file.
pub fn parse(input: &str) -> Result<Scenario> {
    let tokens = Lexer::new(input).tokenize()?;
    Parser::new(tokens).parse_scenario()
}

/// Key=value pairs trailing an element line.
struct Params {
    pairs: Vec<(String, String, bool)>,
    line: usize,
}

impl Params {
    fn take(&mut self, key: &str) -> Option<String> {
        for (k, v, used) in self.pairs.iter_mut() {
            if k == key && !*used {
                *used = true;
                return Some(v.clone());
            }
        }
        None
    }

    fn take_f64(&mut self, key: &str) -> Result<Option<f64>> {
        match self.take(key) {
            None => Ok(None),
            Some(raw) => match parse_value(&raw) {
                Some(v) => Ok(Some(v)),
                None => Err(Error::InvalidValue {
                    key: key.to_string(),
                    value: raw,
                    line: self.line,
                }),
            },
        }
    }

    fn f64_or(&mut self, key: &str, default: f64) -> Result<f64> {
        Ok(self.take_f64(key)?.unwrap_or(default))
    }

    fn require_f64(&mut self, key: &str, context: &str) -> Result<f64> {
        self.take_f64(key)?
            .ok_or_else(|| Error::at(self.line, format!("{context} is missing '{key}='")))
    }

    /// Reject unrecognized keys so typos fail loudly.
    fn finish(self, context: &str) -> Result<()> {
        for (k, _, used) in &self.pairs {
            if !used {
                return Err(Error::at(
                    self.line,
                    format!("unknown parameter '{k}' for {context}"),
                ));
            }
        }
        Ok(())
    }
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn line(&self) -> usize {
        self.tokens[self.pos].line
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].token.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn skip_eols(&mut self) {
        while *self.peek() == Token::Eol {
            self.advance();
        }
    }

    fn at_eol(&self) -> bool {
        matches!(self.peek(), Token::Eol | Token::Eof)
    }

    fn expect_eol(&mut self, context: &str) -> Result<()> {
        if self.at_eol() {
            if *self.peek() == Token::Eol {
                self.advance();
            }
            Ok(())
        } else {
            Err(Error::at(
                self.line(),
                format!("unexpected trailing input after {context}"),
            ))
        }
    }

    /// Read an identifier or numeric token as a bare word.
    fn word(&mut self, what: &str) -> Result<String> {
        let line = self.line();
        match self.advance() {
            Token::Ident(s) | Token::Value(s) => Ok(s),
            other => Err(Error::at(line, format!("expected {what}, found {other:?}"))),
        }
    }

    /// Read a `keyword` identifier exactly.
    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        let line = self.line();
        match self.advance() {
            Token::Ident(s) if s == keyword => Ok(()),
            other => Err(Error::at(
                line,
                format!("expected '{keyword}', found {other:?}"),
            )),
        }
    }

    fn parse_scenario(mut self) -> Result<Scenario> {
        let mut circuit = Circuit::new();
        let mut saw_ground = false;

        self.skip_eols();

        // Optional title line.
        if let Token::Ident(word) = self.peek()
            && word == "title"
        {
            self.advance();
            let mut words = Vec::new();
            while !self.at_eol() {
                words.push(self.word("title text")?);
            }
            circuit.set_title(words.join(" "));
            self.expect_eol("title")?;
            self.skip_eols();
        }

        self.expect_keyword("begin_circuit")?;
        self.expect_eol("begin_circuit")?;
        self.parse_circuit_block(&mut circuit, &mut saw_ground)?;
        circuit.validate()?;

        if !saw_ground {
            return Err(Error::at(
                self.line(),
                "circuit has no connection to ground (node 0)",
            ));
        }
        if circuit.num_devices() == 0 {
            return Err(Error::at(self.line(), "circuit block is empty"));
        }

        self.skip_eols();
        self.expect_keyword("begin_solve")?;
        self.expect_eol("begin_solve")?;
        let solve = self.parse_solve_block()?;

        self.skip_eols();
        let mut outputs = Vec::new();
        if let Token::Ident(word) = self.peek()
            && word == "begin_output"
        {
            self.advance();
            self.expect_eol("begin_output")?;
            outputs = self.parse_output_block(&circuit)?;
        }

        self.skip_eols();
        if *self.peek() != Token::Eof {
            return Err(Error::at(
                self.line(),
                "unexpected input after the last block",
            ));
        }

        // Default output selection: every non-ground node voltage, in
        // interning order.
        if outputs.is_empty() {
            for node in circuit.nodes().ids() {
                let name = circuit
                    .nodes()
                    .name_of(node)
                    .unwrap_or_default()
                    .to_string();
                outputs.push(OutputVar::NodeVoltage {
                    label: format!("v({name})"),
                    node,
                });
            }
        }

        Ok(Scenario {
            circuit,
            solve,
            outputs,
        })
    }

    fn parse_circuit_block(&mut self, circuit: &mut Circuit, saw_ground: &mut bool) -> Result<()> {
        loop {
            self.skip_eols();
            let line = self.line();

            let kind = self.word("element type or 'end_circuit'")?;
            if kind == "end_circuit" {
                self.expect_eol("end_circuit")?;
                return Ok(());
            }
            if *self.peek() == Token::Eof {
                return Err(Error::at(line, "circuit block is not closed"));
            }

            let name = self.word("element name")?;
            let pos_name = self.word("positive node")?;
            let neg_name = self.word("negative node")?;
            if pos_name == "0" || neg_name == "0" {
                *saw_ground = true;
            }
            let node_pos = circuit.nodes_mut().intern(&pos_name);
            let node_neg = circuit.nodes_mut().intern(&neg_name);

            let mut params = self.parse_params(line)?;
            self.add_element(circuit, &kind, &name, node_pos, node_neg, &mut params, line)?;
            params.finish(&format!("'{kind}' element"))?;
            self.expect_eol("element line")?;
        }
    }

    fn parse_params(&mut self, line: usize) -> Result<Params> {
        let mut pairs = Vec::new();
        while !self.at_eol() {
            let key = self.word("parameter name")?;
            match self.advance() {
                Token::Equals => {}
                other => {
                    return Err(Error::at(
                        line,
                        format!("expected '=' after '{key}', found {other:?}"),
                    ));
                }
            }
            let value = self.word("parameter value")?;
            pairs.push((key, value, false));
        }
        Ok(Params { pairs, line })
    }

    #[allow(clippy::too_many_arguments)]
    fn add_element(
        &mut self,
        circuit: &mut Circuit,
        kind: &str,
        name: &str,
        node_pos: NodeId,
        node_neg: NodeId,
        params: &mut Params,
        line: usize,
    ) -> Result<()> {
        match kind {
            "res" => {
                let r = params.require_f64("r", "resistor")?;
                if r <= 0.0 {
                    return Err(Error::at(line, format!("resistor '{name}' needs r > 0")));
                }
                circuit.add_device(Resistor::new(name, node_pos, node_neg, r));
            }
            "cap" => {
                let c = params.require_f64("c", "capacitor")?;
                let v0 = params.f64_or("v0", 0.0)?;
                if c <= 0.0 {
                    return Err(Error::at(line, format!("capacitor '{name}' needs c > 0")));
                }
                circuit.add_device(Capacitor::new(name, node_pos, node_neg, c, v0));
            }
            "ind" => {
                let l = params.require_f64("l", "inductor")?;
                let i0 = params.f64_or("i0", 0.0)?;
                if l <= 0.0 {
                    return Err(Error::at(line, format!("inductor '{name}' needs l > 0")));
                }
                circuit.add_device(Inductor::new(name, node_pos, node_neg, l, i0));
            }
            "vsrc" => {
                let waveform = self.parse_waveform(params)?;
                let branch_idx = circuit.next_branch_index();
                circuit.add_device(VoltageSource::new(
                    name, node_pos, node_neg, waveform, branch_idx,
                ));
            }
            "isrc" => {
                let waveform = self.parse_waveform(params)?;
                circuit.add_device(CurrentSource::new(name, node_pos, node_neg, waveform));
            }
            "diode" => {
                let mut diode = Diode::new(name, node_pos, node_neg);
                diode.is = params.f64_or("is", 1e-14)?;
                diode.n = params.f64_or("n", 1.0)?;
                circuit.add_device(diode);
            }
            "switch" => {
                let freq = params.require_f64("f", "switch")?;
                let duty = params.require_f64("d", "switch")?;
                if freq <= 0.0 {
                    return Err(Error::at(line, format!("switch '{name}' needs f > 0")));
                }
                if !(0.0..=1.0).contains(&duty) {
                    return Err(Error::at(
                        line,
                        format!("switch '{name}' duty must be in [0, 1]"),
                    ));
                }
                let mut sw = ClockedSwitch::new(name, node_pos, node_neg, freq, duty);
                sw.td = params.f64_or("td", 0.0)?;
                sw.ron = params.f64_or("ron", 1e-3)?;
                sw.roff = params.f64_or("roff", 1e6)?;
                circuit.add_device(sw);
            }
            other => {
                return Err(Error::UnknownElement {
                    element: other.to_string(),
                    line,
                });
            }
        }
        Ok(())
    }

    fn parse_waveform(&mut self, params: &mut Params) -> Result<Waveform> {
        let kind = params.take("type").unwrap_or_else(|| "dc".to_string());
        let line = params.line;
        match kind.as_str() {
            "dc" => Ok(Waveform::Dc(params.f64_or("dc", 0.0)?)),
            "sine" => {
                let amplitude = params.require_f64("a", "sine source")?;
                let freq = params.require_f64("f", "sine source")?;
                let phase = params.f64_or("phi_deg", 0.0)? * PI / 180.0;
                let offset = params.f64_or("offset", 0.0)?;
                let delay = params.f64_or("td", 0.0)?;
                Ok(Waveform::Sine {
                    offset,
                    amplitude,
                    freq,
                    phase,
                    delay,
                })
            }
            "pulse" => {
                let v1 = params.require_f64("v1", "pulse source")?;
                let v2 = params.require_f64("v2", "pulse source")?;
                let td = params.f64_or("td", 0.0)?;
                let tr = params.f64_or("tr", 0.0)?;
                let tf = params.f64_or("tf", 0.0)?;
                // Without pw the pulse stays at v2 once risen.
                let pw = params.f64_or("pw", f64::MAX)?;
                let per = params.f64_or("per", 0.0)?;
                Ok(Waveform::Pulse {
                    v1,
                    v2,
                    td,
                    tr,
                    tf,
                    pw,
                    per,
                })
            }
            other => Err(Error::at(
                line,
                format!("unknown source waveform type '{other}'"),
            )),
        }
    }

    fn parse_solve_block(&mut self) -> Result<SolveParams> {
        let mut method = Method::Trapezoidal;
        let mut t_start = 0.0;
        let mut t_end = None;
        let mut t_step = None;
        let mut itmax = None;
        let mut vtol = None;
        let mut itol = None;

        loop {
            self.skip_eols();
            let line = self.line();
            let key = self.word("solve parameter or 'end_solve'")?;
            if key == "end_solve" {
                self.expect_eol("end_solve")?;
                break;
            }

            match self.advance() {
                Token::Equals => {}
                other => {
                    return Err(Error::at(
                        line,
                        format!("expected '=' after '{key}', found {other:?}"),
                    ));
                }
            }
            let raw = self.word("solve parameter value")?;
            let numeric = || {
                parse_value(&raw).ok_or_else(|| Error::InvalidValue {
                    key: key.clone(),
                    value: raw.clone(),
                    line,
                })
            };

            match key.as_str() {
                "method" => {
                    method = match raw.as_str() {
                        "be" => Method::BackwardEuler,
                        "trz" => Method::Trapezoidal,
                        other => {
                            return Err(Error::at(
                                line,
                                format!("unknown method '{other}' (expected 'be' or 'trz')"),
                            ));
                        }
                    };
                }
                "t_start" => t_start = numeric()?,
                "t_end" => t_end = Some(numeric()?),
                "t_step" => t_step = Some(numeric()?),
                "itmax" => {
                    let v = numeric()?;
                    if v < 1.0 || v.fract() != 0.0 {
                        return Err(Error::at(line, "itmax must be a positive integer"));
                    }
                    itmax = Some(v as usize);
                }
                "vtol" => vtol = Some(numeric()?),
                "itol" => itol = Some(numeric()?),
                other => {
                    return Err(Error::at(line, format!("unknown solve parameter '{other}'")));
                }
            }
            self.expect_eol("solve parameter")?;
        }

        Ok(SolveParams {
            method,
            t_start,
            t_end: t_end.ok_or(Error::MissingSolveParam("t_end"))?,
            t_step: t_step.ok_or(Error::MissingSolveParam("t_step"))?,
            itmax,
            vtol,
            itol,
        })
    }

    fn parse_output_block(&mut self, circuit: &Circuit) -> Result<Vec<OutputVar>> {
        let mut outputs = Vec::new();

        loop {
            self.skip_eols();
            let line = self.line();
            let kind = self.word("output variable or 'end_output'")?;
            if kind == "end_output" {
                self.expect_eol("end_output")?;
                break;
            }

            match self.advance() {
                Token::LParen => {}
                other => {
                    return Err(Error::at(
                        line,
                        format!("expected '(' after '{kind}', found {other:?}"),
                    ));
                }
            }
            let arg = self.word("output variable argument")?;
            match self.advance() {
                Token::RParen => {}
                other => {
                    return Err(Error::at(line, format!("expected ')', found {other:?}")));
                }
            }

            match kind.as_str() {
                "v" => {
                    let node = circuit.nodes().get(&arg).ok_or_else(|| {
                        Error::at(line, format!("output references unknown node '{arg}'"))
                    })?;
                    outputs.push(OutputVar::NodeVoltage {
                        label: format!("v({arg})"),
                        node,
                    });
                }
                "i" => {
                    let branch = circuit.find_branch_index(&arg).ok_or_else(|| {
                        Error::at(
                            line,
                            format!("output references '{arg}', which has no branch current"),
                        )
                    })?;
                    outputs.push(OutputVar::BranchCurrent {
                        label: format!("i({arg})"),
                        branch,
                    });
                }
                other => {
                    return Err(Error::at(
                        line,
                        format!("unknown output variable kind '{other}' (expected 'v' or 'i')"),
                    ));
                }
            }
            self.expect_eol("output variable")?;
        }

        Ok(outputs)
    }
}
