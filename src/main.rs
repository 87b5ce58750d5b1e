use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use mathplot::equation::{ShapeParams, format_equation};
use mathplot::evaluator::{Bindings, evaluate};
use mathplot::plot::DEFAULT_RESOLUTION;
use mathplot::{
  DEFAULT_COLOR, GraphKind, GraphOutput, GraphRequest, render_graph,
};
use serde_json::json;

const GRAPH_FAILURE: &str = "There was an error generating the graph. \
  Please check your equation and try again.";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Draw an equation to a PNG file
  Graph {
    /// Equation such as "y = x^2 - 3x", "(x-1)^2 + y^2 = 9" or "x^2 = y^3"
    equation: String,
    #[arg(long, value_enum, default_value_t = Kind::Auto)]
    kind: Kind,
    #[arg(long, allow_hyphen_values = true)]
    xmin: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    xmax: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    ymin: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    ymax: Option<f64>,
    /// Curve colour: #RRGGBB, #RGB, or red, blue, green, purple, orange
    #[arg(long, default_value = DEFAULT_COLOR)]
    color: String,
    /// Samples across the x axis, 100 to 1000
    #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
    resolution: usize,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
    #[arg(short, long, default_value = "graph.png")]
    output: PathBuf,
    /// Print a JSON summary instead of text
    #[arg(long)]
    json: bool,
  },
  /// Evaluate an expression numerically
  Eval {
    expression: String,
    /// Variable binding, e.g. --var x=2
    #[arg(long = "var", value_parser = parse_binding)]
    vars: Vec<(String, f64)>,
  },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
  Auto,
  Polynomial,
  Conic,
  Trig,
}

impl From<Kind> for GraphKind {
  fn from(kind: Kind) -> Self {
    match kind {
      Kind::Auto => GraphKind::Auto,
      Kind::Polynomial => GraphKind::Polynomial,
      Kind::Conic => GraphKind::Conic,
      Kind::Trig => GraphKind::Trig,
    }
  }
}

fn parse_binding(s: &str) -> Result<(String, f64), String> {
  let (name, value) = s
    .split_once('=')
    .ok_or_else(|| format!("expected name=value, got {s:?}"))?;
  let value = value
    .trim()
    .parse::<f64>()
    .map_err(|e| format!("{value:?}: {e}"))?;
  Ok((name.trim().to_string(), value))
}

fn main() {
  env_logger::init();
  let cli = Cli::parse();

  let result = match cli.command {
    Commands::Graph {
      equation,
      kind,
      xmin,
      xmax,
      ymin,
      ymax,
      color,
      resolution,
      width,
      height,
      output,
      json,
    } => {
      let request = GraphRequest {
        equation,
        kind: kind.into(),
        x_min: xmin,
        x_max: xmax,
        y_min: ymin,
        y_max: ymax,
        color,
        resolution,
        width,
        height,
        ..GraphRequest::default()
      };
      graph(&request, &output, json)
        .map_err(|e| anyhow!("{GRAPH_FAILURE}\n{e:#}"))
    }
    Commands::Eval { expression, vars } => {
      let bindings: Bindings = vars.into_iter().collect();
      evaluate(&expression, &bindings)
        .map(|value| println!("{value}"))
        .with_context(|| format!("could not evaluate {expression:?}"))
    }
  };

  if let Err(e) = result {
    eprintln!("Error: {e:#}");
    std::process::exit(1);
  }
}

fn graph(request: &GraphRequest, output: &Path, json: bool) -> Result<()> {
  let rendered = render_graph(request)?;
  let png = rendered.to_png()?;
  std::fs::write(output, png)
    .with_context(|| format!("writing {}", output.display()))?;

  if json {
    println!("{}", serde_json::to_string_pretty(&summary(&rendered, output))?);
  } else {
    let vp = &rendered.viewport;
    println!("Equation: {}", format_equation(rendered.normalized.as_str()));
    println!("Form: {}", rendered.form);
    println!("Domain: [{}, {}]", vp.x_min, vp.x_max);
    println!("Range: [{}, {}]", vp.y_min, vp.y_max);
    if rendered.used_default {
      println!("Note: some parameters could not be read; defaults were used");
    }
    println!("Saved {}", output.display());
  }
  Ok(())
}

fn summary(rendered: &GraphOutput, output: &Path) -> serde_json::Value {
  let vp = &rendered.viewport;
  let params = rendered.params.map(|params| match params {
    ShapeParams::Circle { h, k, r } => json!({ "h": h, "k": k, "r": r }),
    ShapeParams::Ellipse {
      h,
      k,
      a,
      b,
      horizontal,
    }
    | ShapeParams::Hyperbola {
      h,
      k,
      a,
      b,
      horizontal,
    } => json!({ "h": h, "k": k, "a": a, "b": b, "horizontal": horizontal }),
  });
  json!({
    "equation": rendered.equation,
    "normalized": rendered.normalized.as_str(),
    "display": format_equation(rendered.normalized.as_str()),
    "form": rendered.form.name(),
    "params": params,
    "used_default": rendered.used_default,
    "domain": [vp.x_min, vp.x_max],
    "range": [vp.y_min, vp.y_max],
    "width": vp.pixel_width,
    "height": vp.pixel_height,
    "output": output.display().to_string(),
  })
}
