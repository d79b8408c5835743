//! Route tree inspection.
//!
//! Compiles a configured tree against a `RecordingHost`, binding every
//! handler name to itself, and reports what would be registered.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::{resolve_routes, HandlerSource, ResolveError, RoutesConfig};
use crate::http::RecordingHost;
use crate::lifecycle::QueueScheduler;
use crate::routing::{CompileError, PathWordIndex, PostMiddleware, RouteCompiler};

#[derive(Debug, Error)]
pub enum InspectError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// One registration, by name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteSummary {
    pub method: String,
    pub path: String,
    pub pre: Vec<String>,
    pub action: String,
    pub post: Vec<String>,
}

/// Everything a compiled tree would register.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub routes: Vec<RouteSummary>,
    pub words: PathWordIndex,
}

/// Resolves every name to itself; post middleware become named no-ops.
struct Labels;

impl HandlerSource<String, String, ()> for Labels {
    fn pre(&self, name: &str) -> Option<String> {
        Some(name.to_string())
    }

    fn action(&self, name: &str) -> Option<String> {
        Some(name.to_string())
    }

    fn post(&self, name: &str) -> Option<PostMiddleware<()>> {
        Some(PostMiddleware::named(name, |_, _| {}))
    }
}

/// Compile `config` without binding real handlers.
pub fn inspect(config: &RoutesConfig) -> Result<Inspection, InspectError> {
    let defaults = config.defaults.resolve()?;
    let routes = resolve_routes(&config.routes, &Labels)?;

    let mut host: RecordingHost<String, String, ()> = RecordingHost::new();
    let report = RouteCompiler::new(&mut host, Arc::new(QueueScheduler::new()))
        .with_defaults(defaults)
        .compile(&routes)?;

    let routes = host
        .into_registrations()
        .into_iter()
        .map(|r| RouteSummary {
            method: r.method.to_string(),
            path: r.path.to_string(),
            post: r.action.post_chain().names().map(str::to_string).collect(),
            action: r.action.action().clone(),
            pre: r.pre,
        })
        .collect();

    Ok(Inspection {
        routes,
        words: report.words,
    })
}

impl Inspection {
    /// Plain-text table, one registration per line.
    pub fn render_table(&self) -> String {
        let width = self
            .routes
            .iter()
            .map(|r| r.path.len())
            .max()
            .unwrap_or(0)
            .max("PATH".len());

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<8} {:<width$} {:<16} {:<24} POST",
            "METHOD", "PATH", "ACTION", "PRE"
        );
        for r in &self.routes {
            let _ = writeln!(
                out,
                "{:<8} {:<width$} {:<16} {:<24} {}",
                r.method,
                r.path,
                r.action,
                join_or_dash(&r.pre),
                join_or_dash(&r.post),
            );
        }
        out
    }

    /// Word index as `word: depths` lines.
    pub fn render_words(&self) -> String {
        let mut out = String::new();
        for (word, depths) in self.words.iter() {
            let depths: Vec<String> = depths.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "{word}: {}", depths.join(", "));
        }
        out
    }
}

fn join_or_dash(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(",")
    }
}
