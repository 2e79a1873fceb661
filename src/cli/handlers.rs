use super::{config::load_styles, Cli};
use crate::engine::create_engine;
use crate::error::{EngineError, Result};
use crate::{compile_calls, CompilationOutput};
use futures::executor::block_on;
use std::fs;
use std::time::Instant;

fn styles_path(matches: &clap::ArgMatches) -> Result<&str> {
    matches
        .get_one::<String>("styles")
        .map(String::as_str)
        .ok_or_else(|| EngineError::invalid_format("Missing styles file argument"))
}

// --- RENDER ---
pub fn handle_render_command(cli: &Cli, matches: &clap::ArgMatches) -> Result<()> {
    let styles = load_styles(styles_path(matches)?)?;

    let compile_start = Instant::now();
    let output = block_on(compile_calls(cli.config().to_engine_config(), &styles.calls))?;
    let compile_time = compile_start.elapsed();

    match matches.get_one::<String>("output") {
        Some(output_path) => {
            fs::write(output_path, &output.css)?;
            println!("✅ Wrote {} atomic rule(s) to {}", output.rule_count, output_path);
            println!("   Output: {} bytes", output.css.len());
            println!("   Time: {:.2}ms", compile_time.as_secs_f64() * 1000.0);
        }
        None => println!("{}", output.css),
    }

    if matches.get_flag("names") {
        print_names(&output);
    }
    warn_unknown(&output);
    Ok(())
}

fn print_names(output: &CompilationOutput) {
    for (index, names) in output.names.iter().enumerate() {
        println!("call {}: {}", index, names.join(" "));
    }
}

fn warn_unknown(output: &CompilationOutput) {
    if !output.unknown.is_empty() {
        log::warn!("Unknown shortcut(s): {}", output.unknown.join(", "));
    }
}

// --- PREVIEW ---
pub fn handle_preview_command(cli: &Cli, matches: &clap::ArgMatches) -> Result<()> {
    let styles = load_styles(styles_path(matches)?)?;

    block_on(async {
        let mut engine = create_engine(cli.config().to_engine_config()).await?;
        for (index, call) in styles.calls.iter().enumerate() {
            let css = engine.preview_styles(call).await?;
            println!("/* call {} */", index);
            println!("{}", css);
        }
        Ok::<(), EngineError>(())
    })
}

// --- CHECK ---
pub fn handle_check_command(cli: &Cli, matches: &clap::ArgMatches) -> Result<()> {
    let path = styles_path(matches)?;
    let styles = load_styles(path)?;
    let output = block_on(compile_calls(cli.config().to_engine_config(), &styles.calls))?;

    if output.unknown.is_empty() {
        println!(
            "✅ {}: {} call(s), {} atomic rule(s), no unknown shortcuts",
            path,
            output.names.len(),
            output.rule_count
        );
        Ok(())
    } else {
        for name in &output.unknown {
            println!("❌ unknown shortcut: {}", name);
        }
        Err(EngineError::invalid_format(format!(
            "{} unknown shortcut(s) in {}",
            output.unknown.len(),
            path
        )))
    }
}
