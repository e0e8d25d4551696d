//! Go source rendering for generated procedures.

use crate::emitter::GeneratedProcedure;
use crate::map_key::KeyExpression;
use crate::strategy::{ELEMENT_VAR, ElementCall, KEY_VAR, RECEIVER, Statement};
use std::fmt::Write;

/// Encoder parameter of the generated procedure.
pub const ENCODER_VAR: &str = "enc";
const ARRAY_ENCODER_VAR: &str = "ae";
const OBJECT_ENCODER_VAR: &str = "oe";

/// Rendering switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Return early when the receiver is a nil pointer.
    pub nil_guard: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { nil_guard: true }
    }
}

/// Line writer with tab indentation.
#[derive(Debug, Default)]
pub struct GoWriter {
    buf: String,
    depth: usize,
}

impl GoWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current depth. Empty input writes a blank line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push('\t');
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    /// Write a line that opens a block.
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    /// Write a line that closes a block.
    pub fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Render one procedure as a `MarshalLogObject` method.
pub fn render_procedure(w: &mut GoWriter, procedure: &GeneratedProcedure, options: RenderOptions) {
    w.open(format!(
        "func ({RECEIVER} *{}) MarshalLogObject({ENCODER_VAR} zapcore.ObjectEncoder) error {{",
        procedure.go_name
    ));
    if options.nil_guard {
        w.open(format!("if {RECEIVER} == nil {{"));
        w.line("return nil");
        w.close("}");
    }
    for statement in &procedure.statements {
        render_statement(w, statement);
    }
    w.line("return nil");
    w.close("}");
}

fn render_statement(w: &mut GoWriter, statement: &Statement) {
    match statement {
        Statement::Add { key, method, value } => {
            w.line(format!("{ENCODER_VAR}.Add{method}({}, {value})", quote(key)));
        }
        Statement::AddArray {
            key,
            source,
            element,
        } => {
            w.open(format!(
                "{ENCODER_VAR}.AddArray({}, zapcore.ArrayMarshalerFunc(func({ARRAY_ENCODER_VAR} zapcore.ArrayEncoder) error {{",
                quote(key)
            ));
            w.open(format!("for _, {ELEMENT_VAR} := range {source} {{"));
            w.line(append_call(element));
            w.close("}");
            w.line("return nil");
            w.close("}))");
        }
        Statement::AddObject {
            key,
            source,
            key_expr,
            value,
        } => {
            // An invalid key renders as a literal, which would leave `k` unused.
            let key_var = if key_expr.is_valid() { KEY_VAR } else { "_" };
            w.open(format!(
                "{ENCODER_VAR}.AddObject({}, zapcore.ObjectMarshalerFunc(func({OBJECT_ENCODER_VAR} zapcore.ObjectEncoder) error {{",
                quote(key)
            ));
            w.open(format!("for {key_var}, {ELEMENT_VAR} := range {source} {{"));
            w.line(entry_call(*key_expr, value));
            w.close("}");
            w.line("return nil");
            w.close("}))");
        }
    }
}

fn append_call(element: &ElementCall) -> String {
    format!(
        "{ARRAY_ENCODER_VAR}.Append{}({})",
        element.method.array_suffix(),
        element.value
    )
}

fn entry_call(key_expr: KeyExpression, value: &ElementCall) -> String {
    format!(
        "{OBJECT_ENCODER_VAR}.Add{}({}, {})",
        value.method.object_suffix(),
        key_expr.render(KEY_VAR),
        value.value
    )
}

/// Go interpreted string literal.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
