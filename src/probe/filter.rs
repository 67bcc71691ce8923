//! jq-compatible filtering of JSON response bodies.
//!
//! Thin wrapper around jaq. Takes a body and a filter expression and returns
//! a display string: the first non-null output marked as derived text, the
//! empty string when the filter yields nothing, or an inline error. The
//! caller never sees an `Err`; filter problems are display text by design of
//! the probe outcome model.

use crossterm::style::Stylize;
use jaq_core::load::{Arena, File, Loader};
use jaq_core::{Compiler, Ctx, RcIter};
use jaq_json::Val;

pub fn apply(expr: &str, body: &str) -> String {
    match evaluate(expr, body) {
        Ok(Some(text)) => format!("=> {}", text.cyan()),
        Ok(None) => String::new(),
        Err(err) => err.red().to_string(),
    }
}

fn evaluate(expr: &str, body: &str) -> Result<Option<String>, String> {
    let input: serde_json::Value = serde_json::from_str(body).map_err(|e| e.to_string())?;

    let program = File {
        code: expr,
        path: (),
    };
    let loader = Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = Arena::default();
    let modules = loader
        .load(&arena, program)
        .map_err(|_| format!("invalid filter: {expr}"))?;
    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(|_| format!("invalid filter: {expr}"))?;

    let inputs = RcIter::new(core::iter::empty());
    for output in filter.run((Ctx::new([], &inputs), Val::from(input))) {
        match output {
            Ok(Val::Null) => continue,
            Ok(val) => return Ok(Some(serde_json::Value::from(val).to_string())),
            Err(err) => return Err(err.to_string()),
        }
    }
    Ok(None)
}
