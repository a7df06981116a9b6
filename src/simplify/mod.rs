//! The simplification pipeline.
//!
//! Path data goes through these stages, in order:
//!
//! * Normalization to absolute, long-hand commands, if needed.
//! * [`cleanup`], to drop commands that draw nothing.
//! * Analysis and chunking, to find runs of commands that can be merged.
//! * Per chunk, [`lines::simplify_lines`] or [`beziers::simplify_curves`].
//! * [`arcs::arc_stage`], unless disabled with [`SimplifyOptions::cubic_to_arc`].
//! * [`cleanup`] again.
//!
//! No stage ever fails; when a replacement is not good enough, the original commands
//! are kept.

use crate::analyze::analyze;
use crate::chunk::build_chunks;
use crate::normalize::normalize;
use crate::options::{ParseMode, SimplifyOptions};
use crate::path_data::{CommandKind, PathData};
use crate::path_parser::{parse_path, ParseError};
use crate::session::Session;
use crate::svgpath_log;

pub mod arcs;
pub mod area;
pub mod beziers;
pub mod cleanup;
pub mod lines;

use self::arcs::arc_stage;
use self::area::micro_path_area;
use self::beziers::simplify_curves;
use self::cleanup::cleanup;
use self::lines::simplify_lines;

/// Simplifies path data.
///
/// The result is absolute and long-hand.  Empty path data stays empty.
pub fn simplify(path: &PathData, options: &SimplifyOptions, session: &Session) -> PathData {
    if path.is_empty() {
        return PathData::default();
    }

    let normalized = normalize(path);
    let cleaned = cleanup(&normalized, session);
    let analysis = analyze(&cleaned);
    let chunks = build_chunks(&analysis.commands);

    svgpath_log!(
        session,
        "simplify: {} commands in {} chunks, {} subpaths",
        analysis.commands.len(),
        chunks.len(),
        analysis.subpaths.len()
    );

    // Areas of closed subpaths, which straightened curves must not change much
    let fills: Vec<Option<f64>> = analysis
        .subpaths
        .iter()
        .map(|info| {
            Some(info)
                .filter(|info| info.closed)
                .map(|info| micro_path_area(info.start, &cleaned.commands()[info.range.clone()]))
        })
        .collect();

    let mut commands = Vec::with_capacity(analysis.commands.len());
    let mut cancelled = false;

    for chunk in &chunks {
        let run = &analysis.commands[chunk.range.clone()];

        cancelled = cancelled || options.is_cancelled();
        if cancelled {
            commands.extend(run.iter().map(|a| a.command));
            continue;
        }

        match chunk.kind {
            CommandKind::LineTo if run.len() > 1 => {
                let size = analysis.subpaths[run[0].subpath]
                    .vertex_bounds
                    .max_dimension();
                commands.extend(simplify_lines(run, size));
            }

            CommandKind::CurveTo | CommandKind::QuadTo => {
                let fit = simplify_curves(run, fills[run[0].subpath], options);

                if fit.commands.len() < run.len() {
                    svgpath_log!(
                        session,
                        "simplify: {} curves at {}..{} replaced by {} (deviation {:.3}%)",
                        run.len(),
                        chunk.range.start,
                        chunk.range.end,
                        fit.commands.len(),
                        fit.deviation
                    );
                }

                commands.extend(fit.commands);
            }

            _ => commands.extend(run.iter().map(|a| a.command)),
        }
    }

    let reduced = PathData::from_commands(commands);

    if cancelled {
        svgpath_log!(session, "simplify: cancelled");
        return reduced;
    }

    let result = if options.cubic_to_arc {
        arc_stage(&reduced, options.tolerance, session)
    } else {
        reduced
    };

    cleanup(&result, session)
}

/// Simplified path data, with the diagnostics from parsing it.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplifiedPath {
    pub path: PathData,
    pub diagnostics: Vec<ParseError>,
}

/// Parses path data and simplifies it.
///
/// Logging is controlled by the `SVGPATH_LOG` environment variable.
///
/// ```
/// use svgpath::{simplify_path_data, ParseMode, SimplifyOptions};
///
/// let simplified = simplify_path_data(
///     "M0 0 L25 0 L50 0 L75 0 L100 0",
///     &SimplifyOptions::default(),
///     ParseMode::Strict,
/// )
/// .unwrap();
///
/// assert_eq!(simplified.path.to_string(), "M0 0 L100 0");
/// ```
pub fn simplify_path_data(
    input: &str,
    options: &SimplifyOptions,
    mode: ParseMode,
) -> Result<SimplifiedPath, ParseError> {
    let session = Session::new();
    let parsed = parse_path(input, mode)?;

    svgpath_log!(
        session,
        "parsed {} commands with {} diagnostics (relative: {}, shorthands: {}, arcs: {}, quadratics: {})",
        parsed.path.len(),
        parsed.diagnostics.len(),
        parsed.has_relatives,
        parsed.has_shorthands,
        parsed.has_arcs,
        parsed.has_quadratics
    );

    Ok(SimplifiedPath {
        path: simplify(&parsed.path, options, &session),
        diagnostics: parsed.diagnostics,
    })
}
