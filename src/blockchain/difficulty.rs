use log::debug;

use super::Block;
use super::{DIFFICULTY_FLOOR, RETARGET_MARGIN, RETARGET_WINDOW, TARGET_BLOCK_TIME_SECS};

/// Knobs for the retarget controller. Kept as a value so callers (and tests)
/// thread them in explicitly instead of reading process globals.
#[derive(Debug, Clone, Copy)]
pub struct RetargetParams {
    pub target_secs: f64,
    pub margin: f64,
    pub window: usize,
    pub floor: u32,
}

impl Default for RetargetParams {
    fn default() -> Self {
        Self {
            target_secs: TARGET_BLOCK_TIME_SECS,
            margin: RETARGET_MARGIN,
            window: RETARGET_WINDOW,
            floor: DIFFICULTY_FLOOR,
        }
    }
}

/// Recompute difficulty from the trailing `window` blocks' timestamp deltas.
///
/// Pure function of its inputs. Until `window` blocks exist the current
/// difficulty is returned untouched; the "no change" outcome is the explicit
/// default and the floor is a hard minimum on every path.
pub fn retarget(blocks: &[Block], current: u32, params: &RetargetParams) -> u32 {
    let current = current.max(params.floor);
    if params.window < 2 || blocks.len() < params.window {
        return current;
    }

    let window = &blocks[blocks.len() - params.window..];
    let intervals = (params.window - 1) as f64;
    let span = window[window.len() - 1].timestamp - window[0].timestamp;
    let average = span.max(0.0) / intervals;

    let mut next = current;
    if average < params.target_secs * (1.0 - params.margin) {
        next = current + 1;
    } else if average > params.target_secs * (1.0 + params.margin) {
        next = current.saturating_sub(1);
    }

    let next = next.max(params.floor);
    if next != current {
        debug!(
            "retarget: avg interval {average:.2}s over {} blocks, difficulty {current} -> {next}",
            params.window
        );
    }
    next
}

#[cfg(test)]
mod tests {
    use super::{RetargetParams, retarget};
    use crate::blockchain::Block;

    fn spaced_blocks(count: usize, gap_secs: f64) -> Vec<Block> {
        (0..count)
            .map(|i| {
                Block::new_with_timestamp(
                    i as u64 + 1,
                    Vec::new(),
                    i as u64,
                    "prev".into(),
                    "hash".into(),
                    1_700_000_000.0 + i as f64 * gap_secs,
                )
            })
            .collect()
    }

    fn params() -> RetargetParams {
        RetargetParams {
            target_secs: 60.0,
            margin: 0.35,
            window: 10,
            floor: 4,
        }
    }

    #[test]
    fn unchanged_below_window() {
        let blocks = spaced_blocks(9, 1.0);
        assert_eq!(retarget(&blocks, 5, &params()), 5);
    }

    #[test]
    fn fast_blocks_raise_difficulty_by_one() {
        // 10 blocks averaging 30s against a 60s target with a 35% margin.
        let blocks = spaced_blocks(10, 30.0);
        assert_eq!(retarget(&blocks, 4, &params()), 5);
    }

    #[test]
    fn slow_blocks_lower_difficulty_by_one() {
        let blocks = spaced_blocks(10, 120.0);
        assert_eq!(retarget(&blocks, 6, &params()), 5);
    }

    #[test]
    fn in_band_average_leaves_difficulty_alone() {
        let blocks = spaced_blocks(10, 60.0);
        assert_eq!(retarget(&blocks, 5, &params()), 5);
    }

    #[test]
    fn never_drops_below_floor() {
        let blocks = spaced_blocks(10, 500.0);
        assert_eq!(retarget(&blocks, 4, &params()), 4);
    }

    #[test]
    fn only_the_trailing_window_counts() {
        // Old slow blocks followed by a fast trailing window: raise.
        let mut blocks = spaced_blocks(5, 600.0);
        let base = blocks.last().unwrap().timestamp;
        for i in 0..10 {
            blocks.push(Block::new_with_timestamp(
                blocks.len() as u64 + 1,
                Vec::new(),
                100 + i,
                "prev".into(),
                "hash".into(),
                base + (i + 1) as f64 * 10.0,
            ));
        }
        assert_eq!(retarget(&blocks, 4, &params()), 5);
    }
}
