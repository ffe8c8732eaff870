//! A reference interpreter for the matcher IR.
//!
//! It follows the control flow of the generated Fortran step by step: every choice restores
//! the cursor before each alternative, repetitions stop on a zero-width iteration and
//! lookaheads always restore the cursor. Tests use it to check the matching behavior of a
//! translated grammar without a Fortran compiler.

#![allow(dead_code)]

use std::collections::HashMap;

use fortpeg_backend::ir::*;
use fortpeg_cst::{ActionTypes, Grammar};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    /// The value of an action, represented by its function and the values it was called with
    Action(String, Vec<Value>),
}

impl Value {
    pub fn text(s: &str) -> Self {
        Value::Text(s.to_owned())
    }

    fn as_text(&self) -> &str {
        match self {
            Value::Text(text) => text,
            Value::Action(function, _) => panic!("Expected text, found value of {function}"),
        }
    }
}

type Predicate = fn(&[Value]) -> bool;

pub struct Machine<'a> {
    parser: &'a Parser,
    input: Vec<char>,
    cursor: usize,
    predicates: HashMap<String, Predicate>,
}

impl<'a> Machine<'a> {
    pub fn new(parser: &'a Parser, input: &str) -> Self {
        Machine { parser, input: input.chars().collect(), cursor: 0, predicates: HashMap::new() }
    }

    /// Predicates without an implementation hold.
    pub fn with_predicate(mut self, function: &str, predicate: Predicate) -> Self {
        self.predicates.insert(function.to_owned(), predicate);
        self
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn parse(&mut self, rule: &str) -> Option<Value> {
        let rule = self.parser.rule(rule).unwrap_or_else(|| panic!("No rule `{rule}`"));
        self.call(rule)
    }

    /// Run the parser from its start rule.
    pub fn run(&mut self) -> Option<Value> {
        let rule = self.parser.start_rule().unwrap_or_else(|| panic!("No start rule"));
        self.call(rule)
    }

    fn call(&mut self, rule: &RuleFn) -> Option<Value> {
        let entry = self.cursor;
        let value = self.choice(&rule.body)?;
        if rule.start && self.cursor != self.input.len() {
            self.cursor = entry;
            return None;
        }
        Some(value)
    }

    fn choice(&mut self, choice: &Choice) -> Option<Value> {
        let save = self.cursor;
        for alt in &choice.alternatives {
            self.cursor = save;
            if let Some(value) = self.sequence(alt) {
                return Some(value);
            }
        }
        self.cursor = save;
        None
    }

    fn sequence(&mut self, seq: &Sequence) -> Option<Value> {
        let start = self.cursor;
        let mut env: HashMap<&str, Value> = HashMap::new();

        for Element { matcher, capture } in &seq.elements {
            let mark = self.cursor;
            let value = self.matcher(matcher, &env)?;
            if let Some(Capture { var, source, .. }) = capture {
                let value = match source {
                    CaptureSource::Value => value,
                    CaptureSource::Text => Value::Text(self.slice(mark)),
                };
                env.insert(var, value);
            }
        }

        let value = match &seq.result {
            AltResult::Consumed => Value::Text(self.slice(start)),
            AltResult::Capture(var) => env[var.as_str()].clone(),
            AltResult::Concat(vars) => {
                Value::Text(vars.iter().map(|var| env[var.as_str()].as_text()).collect())
            }
            AltResult::Action(ActionCall { function, args }) => Value::Action(
                function.clone(),
                args.iter().map(|arg| env[arg.as_str()].clone()).collect(),
            ),
        };
        Some(value)
    }

    fn matcher(&mut self, matcher: &Matcher, env: &HashMap<&str, Value>) -> Option<Value> {
        let mark = self.cursor;
        match matcher {
            Matcher::Terminal(terminal) => {
                self.terminal(terminal)?;
                Some(Value::Text(self.slice(mark)))
            }
            Matcher::Call(RuleCall { rule, .. }) => {
                let rule = self.parser.rule(rule).unwrap_or_else(|| panic!("No rule `{rule}`"));
                self.call(rule)
            }
            Matcher::Choice(choice) => self.choice(choice),
            Matcher::Repeat(repeat) => {
                self.repeat(repeat, env)?;
                Some(Value::Text(self.slice(mark)))
            }
            Matcher::Lookahead(Lookahead { negate, body }) => {
                let ok = match body {
                    LookaheadBody::Predicate(call) => self.predicate(call, env),
                    LookaheadBody::Matcher(body) => {
                        let ok = self.matcher(body, env).is_some();
                        self.cursor = mark;
                        ok
                    }
                };
                (ok != *negate).then(|| Value::text(""))
            }
        }
    }

    fn repeat(&mut self, repeat: &Repeat, env: &HashMap<&str, Value>) -> Option<()> {
        let Repeat { body, min, max, separator } = repeat;
        let min = count(min);
        let max = max.as_ref().map(count);

        let save = self.cursor;
        let mut n = 0;
        loop {
            if max.is_some_and(|max| n >= max) {
                break;
            }
            let mark = self.cursor;
            if let Some(separator) = separator {
                if n > 0 && self.matcher(separator, env).is_none() {
                    self.cursor = mark;
                    break;
                }
            }
            if self.matcher(body, env).is_none() {
                self.cursor = mark;
                break;
            }
            n += 1;
            if max.is_none() && self.cursor == mark {
                break;
            }
        }

        if n < min {
            self.cursor = save;
            return None;
        }
        Some(())
    }

    fn predicate(&self, call: &ActionCall, env: &HashMap<&str, Value>) -> bool {
        let args: Vec<Value> = call.args.iter().map(|arg| env[arg.as_str()].clone()).collect();
        self.predicates.get(&call.function).is_none_or(|predicate| predicate(&args))
    }

    fn terminal(&mut self, terminal: &Terminal) -> Option<()> {
        let rest = &self.input[self.cursor..];
        let len = match terminal {
            Terminal::Literal(value) => {
                let value: Vec<char> = value.chars().collect();
                rest.starts_with(&value).then_some(value.len())?
            }
            Terminal::Class(tests) => {
                let c = *rest.first()?;
                tests.iter().any(|test| class_test(test, c)).then_some(1)?
            }
            Terminal::Any => rest.first().map(|_| 1)?,
            Terminal::End => rest.is_empty().then_some(0)?,
        };
        self.cursor += len;
        Some(())
    }

    fn slice(&self, from: usize) -> String {
        self.input[from..self.cursor].iter().collect()
    }
}

fn class_test(test: &ClassTest, c: char) -> bool {
    match test {
        ClassTest::Set(chars) => chars.contains(c),
        ClassTest::Range(bottom, top) => (*bottom..=*top).contains(&c),
    }
}

fn count(bound: &Bound) -> u32 {
    match bound {
        Bound::Count(n) => *n,
        Bound::Expr(expr) => panic!("Cannot evaluate the bound `{expr}`"),
    }
}

/// Lower a grammar to IR, panicking on errors.
pub fn lower(grammar: &Grammar, action_types: &ActionTypes) -> Parser {
    match fortpeg_backend::grammar_to_ir(grammar, action_types) {
        Ok(parser) => parser,
        Err(err) => panic!("Failed to lower the grammar: {err}"),
    }
}
