//! Grouping of annotated commands into runs that are safe to merge.

use std::ops::Range;

use crate::analyze::AnnotatedCommand;
use crate::path_data::CommandKind;

/// A maximal run of same-kind commands with no extreme point, corner or inflection
/// inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub kind: CommandKind,

    /// Indices into the annotated commands.
    pub range: Range<usize>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

// Whether `current` must start a new chunk after `prev`.
fn starts_chunk(prev: &AnnotatedCommand, current: &AnnotatedCommand) -> bool {
    prev.kind() != current.kind()
        || prev.extreme
        || prev.corner
        || prev.close_path
        || current.direction_change
        || prev.subpath != current.subpath
        || current.kind() == CommandKind::MoveTo
}

/// Splits annotated commands into chunks, in order.
///
/// Every command belongs to exactly one chunk.
pub fn build_chunks(commands: &[AnnotatedCommand]) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::new();

    for (i, current) in commands.iter().enumerate() {
        let extend = i > 0 && !starts_chunk(&commands[i - 1], current);

        match chunks.last_mut() {
            Some(chunk) if extend => chunk.range.end = i + 1,
            _ => chunks.push(Chunk {
                kind: current.kind(),
                range: i..i + 1,
            }),
        }
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::analyze;
    use crate::path_data::PathData;

    fn chunk_ranges(s: &str) -> Vec<Range<usize>> {
        let analysis = analyze(&s.parse::<PathData>().unwrap());
        build_chunks(&analysis.commands)
            .into_iter()
            .map(|c| c.range)
            .collect()
    }

    #[test]
    fn groups_runs_of_the_same_kind() {
        assert_eq!(
            chunk_ranges("M0 0 L1 0 L2 0 L3 1 C4 2 5 2 6 1 Z"),
            vec![0..1, 1..4, 4..5, 5..6]
        );
    }

    #[test]
    fn splits_at_direction_changes() {
        assert_eq!(
            chunk_ranges("M0 0 C0 10 10 20 20 20 C30 20 40 30 40 40"),
            vec![0..1, 1..2, 2..3]
        );
    }

    #[test]
    fn splits_at_extremes() {
        assert_eq!(
            chunk_ranges(
                "M0 -10 C5.523 -10 10 -5.523 10 0 C10 5.523 5.523 10 0 10 \
                 C-5.523 10 -10 5.523 -10 0 C-10 -5.523 -5.523 -10 0 -10 Z"
            ),
            vec![0..1, 1..2, 2..3, 3..4, 4..5, 5..6]
        );
    }

    #[test]
    fn splits_at_corners() {
        assert_eq!(
            chunk_ranges("M0 0 C0 5 5 10 10 10 C10 15 15 20 20 30"),
            vec![0..1, 1..2, 2..3]
        );
    }

    #[test]
    fn splits_subpaths() {
        assert_eq!(
            chunk_ranges("M0 0 L1 1 L2 0 M5 5 L6 6"),
            vec![0..1, 1..3, 3..4, 4..5]
        );
    }

    #[test]
    fn every_command_is_covered() {
        let analysis = analyze(&"M0 0 L1 0 Q2 1 3 0 Q4 -1 5 0 L6 6 Z".parse().unwrap());
        let chunks = build_chunks(&analysis.commands);

        let total: usize = chunks.iter().map(Chunk::len).sum();
        assert_eq!(total, analysis.commands.len());
        assert!(chunks.windows(2).all(|w| w[0].range.end == w[1].range.start));
    }
}
