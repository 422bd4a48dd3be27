use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::fmt::SubscriberBuilder;
use yamada::cache::{CacheCfg, Capacity};
use yamada::canon::Canonicalizer;
use yamada::eval::{EvalCfg, Evaluator, ParEvaluator, RingContext};
use yamada::model::{ArcLabel, Diagram};
use yamada::ring::LaurentPoly;

mod input;
mod provenance;

use provenance::Payload;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Canonical forms and Yamada-style invariants of planar diagrams")]
struct Cmd {
    /// Optional run tag; propagated to outputs and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print the canonical form of a diagram read from JSON
    Canon {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Evaluate the invariant of a diagram read from JSON
    Eval {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        opts: EvalOpts,
    },
    /// Evaluate a built-in diagram
    Demo {
        #[arg(long, default_value = "trefoil")]
        name: String,
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        opts: EvalOpts,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args, Clone, Copy)]
struct EvalOpts {
    /// Divide the result by its lowest-degree monomial
    #[arg(long)]
    normalize: bool,
    /// Evaluate independent branches on the rayon pool
    #[arg(long)]
    parallel: bool,
    /// Cache entry bound (0 disables caching); ignored with --unbounded
    #[arg(long, default_value_t = 1 << 16)]
    capacity: usize,
    #[arg(long)]
    unbounded: bool,
    /// Largest sub-diagram (in arcs) worth caching
    #[arg(long, default_value_t = 64)]
    max_key_size: usize,
}

impl EvalOpts {
    fn cfg(self) -> EvalCfg {
        EvalCfg {
            normalize: self.normalize,
            cache: CacheCfg {
                capacity: if self.unbounded {
                    Capacity::Unbounded
                } else {
                    Capacity::Bounded(self.capacity)
                },
                max_key_size: self.max_key_size,
            },
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Canon { input, out } => canon(&input, out.as_deref(), cmd.tag),
        Action::Eval { input, out, opts } => {
            let d = input::load(&input)?;
            let params = json!({ "input": input.display().to_string() });
            let doc = eval(&d, opts, params.clone())?;
            emit(&doc, out.as_deref(), Payload::new("eval", params).with_tag(cmd.tag))
        }
        Action::Demo { name, out, opts } => {
            let d = input::fixture(&name)?;
            let params = json!({ "fixture": name });
            let doc = eval(&d, opts, params.clone())?;
            emit(&doc, out.as_deref(), Payload::new("demo", params).with_tag(cmd.tag))
        }
        Action::Report => report(cmd.tag),
    }
}

fn canon(input: &Path, out: Option<&Path>, tag: Option<String>) -> Result<()> {
    let d = input::load(input)?;
    let mut canon = Canonicalizer::new();
    let labeling = canon.labeling(&d)?;
    let stats = canon.stats();
    tracing::info!(
        nodes = d.node_count(),
        arcs = d.arc_count(),
        candidates = stats.candidates,
        pruned = stats.pruned,
        "canonical form"
    );
    let mut labels: Vec<_> = labeling.labels.iter().collect();
    labels.sort_by_key(|&(_, &new)| new);
    let doc = json!({
        "form": labeling.form,
        "labels": labels,
        "search": stats,
    });
    let payload = Payload::new("canon", json!({ "input": input.display().to_string() }));
    emit(&doc, out, payload.with_tag(tag))
}

fn eval<L: ArcLabel>(d: &Diagram<L>, opts: EvalOpts, params: Value) -> Result<Value> {
    let cfg = opts.cfg();
    let ctx = RingContext::yamada();
    tracing::info!(nodes = d.node_count(), parallel = opts.parallel, "eval");
    let (value, stats): (LaurentPoly, _) = if opts.parallel {
        let ev = ParEvaluator::new(ctx, cfg);
        let v = ev.evaluate(d)?;
        (v, ev.cache().stats())
    } else {
        let mut ev = Evaluator::new(ctx, cfg);
        let v = ev.evaluate(d)?;
        (v, ev.cache().stats())
    };
    Ok(json!({
        "params": params,
        "invariant": value.to_string(),
        "terms": value,
        "cache": stats,
    }))
}

/// Print `doc`, or write it to `out` with a provenance sidecar.
fn emit(doc: &Value, out: Option<&Path>, payload: Payload) -> Result<()> {
    let text = serde_json::to_string_pretty(doc)?;
    let Some(out) = out else {
        println!("{text}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(out, text).with_context(|| format!("writing {}", out.display()))?;
    let sidecar = provenance::write_sidecar(out, &payload)?;
    tracing::info!(out = %out.display(), sidecar = %sidecar.display(), "wrote output");
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let payload = Payload::new("report", json!({ "fixtures": input::FIXTURES })).with_tag(tag);
    let doc = provenance::document(&payload, &[]);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
