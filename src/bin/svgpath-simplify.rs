#![warn(unused)]

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Parser;

use svgpath::{simplify_path_data, ParseMode, SimplifyOptions};

/// Simplifies SVG path data and prints the result.
#[derive(Parser, Debug)]
#[command(name = "svgpath-simplify", version, about)]
struct Opt {
    /// Path data, as in the `d` attribute; read from standard input if omitted
    path_data: Option<String>,

    /// Maximum area deviation for a replacement, in percent
    #[arg(short, long, default_value = "5.0")]
    tolerance: f64,

    /// Bisect long runs of curves and simplify each half
    #[arg(long)]
    keep_details: bool,

    /// Never turn cubic curves into quadratic ones
    #[arg(long)]
    force_cubic: bool,

    /// Do not replace curves by elliptical arcs
    #[arg(long)]
    no_arcs: bool,

    /// Simplify with and without --keep-details and keep the closer result
    #[arg(long)]
    multipass: bool,

    /// Fail on the first error in the path data instead of recovering
    #[arg(long)]
    strict: bool,
}

impl Opt {
    fn options(&self) -> SimplifyOptions {
        SimplifyOptions::default()
            .with_tolerance(self.tolerance)
            .with_keep_details(self.keep_details)
            .with_force_cubic(self.force_cubic)
            .with_cubic_to_arc(!self.no_arcs)
            .with_multipass(self.multipass)
    }

    fn mode(&self) -> ParseMode {
        if self.strict {
            ParseMode::Strict
        } else {
            ParseMode::Permissive
        }
    }
}

fn read_input(opt: &Opt) -> Result<String> {
    match opt.path_data {
        Some(ref s) => Ok(s.clone()),
        None => {
            let mut s = String::new();
            io::stdin()
                .read_to_string(&mut s)
                .context("could not read path data from standard input")?;
            Ok(s)
        }
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();

    if !(opt.tolerance.is_finite() && opt.tolerance >= 0.0) {
        anyhow::bail!("tolerance must be a non-negative number, got {}", opt.tolerance);
    }

    let input = read_input(&opt)?;
    let simplified = simplify_path_data(input.trim(), &opt.options(), opt.mode())
        .context("invalid path data")?;

    for diagnostic in &simplified.diagnostics {
        eprintln!("svgpath-simplify: {}", diagnostic);
    }

    println!("{}", simplified.path);

    Ok(())
}
