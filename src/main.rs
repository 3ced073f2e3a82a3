//! Evaluate backprop gradients for a parameter fixture, or generate one.
//!
//! Usage:
//!   backprop-eval eval test-parameters.json --trace --check
//!   backprop-eval generate test-parameters.json --seed 7
//!
//! Log output goes to stderr and follows `RUST_LOG`.

use anyhow::{bail, Context, Result};
use backprop_eval::{
    backprop::{EvalConfig, Evaluator, LogTracer, NoopTracer, Tracer},
    check::{max_relative_error, numerical_gradients},
    ParameterFile,
};
use rand::{rngs::StdRng, SeedableRng};
use std::env;

const CHECK_EPSILON: f64 = 1e-5;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let trace = args.iter().any(|a| a == "--trace");

    let default_level = if trace { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match args.first().map(String::as_str) {
        Some("eval") => run_eval(&args[1..]),
        Some("generate") => run_generate(&args[1..]),
        Some("--help") | Some("-h") | None => {
            print_help();
            Ok(())
        }
        Some(other) => {
            print_help();
            bail!("unknown command `{other}`")
        }
    }
}

fn run_eval(args: &[String]) -> Result<()> {
    let mut fixture_path: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut output_path: Option<String> = None;
    let mut trace = false;
    let mut check = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                config_path = Some(flag_value(args, i)?);
                i += 2;
            }
            "--output" | "-o" => {
                output_path = Some(flag_value(args, i)?);
                i += 2;
            }
            "--trace" => {
                trace = true;
                i += 1;
            }
            "--check" => {
                check = true;
                i += 1;
            }
            flag if flag.starts_with('-') => bail!("unknown flag `{flag}` for eval"),
            path => {
                fixture_path = Some(path.to_owned());
                i += 1;
            }
        }
    }

    let fixture_path = fixture_path.context("eval needs a fixture path")?;
    let config = match &config_path {
        Some(path) => EvalConfig::load_json(path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => EvalConfig::default(),
    };

    let case = ParameterFile::load_json(&fixture_path)
        .with_context(|| format!("failed to read fixture {fixture_path}"))?
        .into_case()
        .with_context(|| format!("fixture {fixture_path} is inconsistent"))?;
    log::info!("loaded {} with topology {:?}", fixture_path, case.topology.sizes());

    let evaluator = Evaluator::new(config);
    let mut log_tracer = LogTracer;
    let mut noop = NoopTracer;
    let tracer: &mut dyn Tracer = if trace { &mut log_tracer } else { &mut noop };
    let gradients = evaluator.evaluate_case_traced(&case, tracer)?;

    if check {
        let numerical = numerical_gradients(
            &evaluator,
            &case.network,
            &case.input,
            &case.expected,
            CHECK_EPSILON,
        )?;
        let rel = max_relative_error(&gradients, &numerical)?;
        let abs = gradients.max_abs_diff(&numerical)?;
        log::info!("finite-difference check: max abs diff {abs:.3e}, max relative error {rel:.3e}");
    }

    let json = serde_json::to_string_pretty(&gradients.to_document())?;
    match output_path {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("failed to write {path}"))?;
            log::info!("gradients written to {path}");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_generate(args: &[String]) -> Result<()> {
    let mut out_path: Option<String> = None;
    let mut seed: Option<u64> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" | "-s" => {
                let value = flag_value(args, i)?;
                seed = Some(value.parse().with_context(|| format!("invalid seed `{value}`"))?);
                i += 2;
            }
            flag if flag.starts_with('-') => bail!("unknown flag `{flag}` for generate"),
            path => {
                out_path = Some(path.to_owned());
                i += 1;
            }
        }
    }

    let out_path = out_path.unwrap_or_else(|| "test-parameters.json".to_owned());
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let file = ParameterFile::demo(&mut rng);
    file.save_json(&out_path)
        .with_context(|| format!("failed to write {out_path}"))?;
    log::info!("wrote {:?} fixture to {out_path}", file.sizes);
    Ok(())
}

fn flag_value(args: &[String], i: usize) -> Result<String> {
    args.get(i + 1)
        .cloned()
        .with_context(|| format!("`{}` expects a value", args[i]))
}

fn print_help() {
    println!("backprop-eval: sigmoid network gradients for a single example");
    println!();
    println!("Commands:");
    println!("  eval <fixture.json>      Print bias/weight gradients as JSON");
    println!("      --config, -c <file>  Evaluator settings (JSON)");
    println!("      --output, -o <file>  Write gradients to a file instead of stdout");
    println!("      --trace              Log every intermediate tensor");
    println!("      --check              Compare against finite differences");
    println!("  generate [out.json]      Write a random [2, 3, 3, 1] fixture");
    println!("      --seed, -s <n>       Seed for reproducible parameters");
}
