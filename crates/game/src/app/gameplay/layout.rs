use engine::{Vec2, Viewport};
use tracing::warn;

use super::config::LayoutConfig;

pub(crate) const COIN_SIZE: f32 = 32.0;
pub(crate) const CROWN_SIZE: f32 = 40.0;

const PLATFORM_COIN_X_OFFSET: f32 = 12.0;
const PLATFORM_COIN_RISE: f32 = 40.0;
const LADDER_COIN_X_OFFSET: f32 = 30.0;
const GOAL_RISE: f32 = 40.0;
const CROWN_RISE: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PlatformPlacement {
    pub(crate) position: Vec2,
    pub(crate) size: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LadderKind {
    /// Joins `platforms[lower]` to `platforms[upper]`.
    Connecting { lower: usize, upper: usize },
    Central,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LadderPlacement {
    pub(crate) position: Vec2,
    pub(crate) size: Vec2,
    pub(crate) kind: LadderKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CoinAnchor {
    Platform(usize),
    Ladder(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CoinPlacement {
    /// Top-left of the coin's pickup box.
    pub(crate) position: Vec2,
    pub(crate) anchor: CoinAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GoalPlacement {
    pub(crate) win_platform: PlatformPlacement,
    pub(crate) crown_center: Vec2,
}

/// Everything placed for one viewport size. Indices in `LadderKind` and
/// `CoinAnchor` refer to `platforms` and `ladders` in generation order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LevelLayout {
    pub(crate) viewport: Viewport,
    pub(crate) platforms: Vec<PlatformPlacement>,
    pub(crate) ladders: Vec<LadderPlacement>,
    pub(crate) coins: Vec<CoinPlacement>,
    pub(crate) goal: Option<GoalPlacement>,
    pub(crate) total_coins: usize,
}

impl LevelLayout {
    pub(crate) fn platform_coin_count(&self) -> usize {
        self.coins
            .iter()
            .filter(|coin| matches!(coin.anchor, CoinAnchor::Platform(_)))
            .count()
    }

    pub(crate) fn ladder_coin_count(&self) -> usize {
        self.coins
            .iter()
            .filter(|coin| matches!(coin.anchor, CoinAnchor::Ladder(_)))
            .count()
    }
}

pub(crate) fn generate_layout(viewport: Viewport, config: &LayoutConfig) -> LevelLayout {
    let platforms = place_platforms(viewport, config);
    let ladders = derive_ladders(viewport, &platforms, config);

    let mut coins = platform_coins(&platforms, config);
    coins.extend(ladder_coins(viewport, &ladders, config));
    let total_coins = coins.len();

    LevelLayout {
        viewport,
        goal: place_goal(viewport, &platforms, config),
        platforms,
        ladders,
        coins,
        total_coins,
    }
}

/// `min(max_platforms, floor(usable_height / vertical_gap))`, zero when nothing fits.
pub(crate) fn platform_count(viewport_height: f32, config: &LayoutConfig) -> usize {
    let usable = viewport_height - config.top_margin - config.bottom_margin;
    if usable <= 0.0 || config.vertical_gap <= 0.0 {
        return 0;
    }
    ((usable / config.vertical_gap).floor() as usize).min(config.max_platforms)
}

fn place_platforms(viewport: Viewport, config: &LayoutConfig) -> Vec<PlatformPlacement> {
    let width = viewport.width_f32();
    let height = viewport.height_f32();
    let size = Vec2::new(config.platform_width, config.platform_height);

    (0..platform_count(height, config))
        .map(|index| {
            let column_step = (index % 4) as f32 * 0.05;
            let x = if index % 2 == 0 {
                width * (0.15 + column_step)
            } else {
                width * (0.75 - column_step)
            };
            let y = height - config.bottom_margin - config.vertical_gap * index as f32;
            PlatformPlacement {
                position: Vec2::new(x, y),
                size,
            }
        })
        .collect()
}

fn derive_ladders(
    viewport: Viewport,
    platforms: &[PlatformPlacement],
    config: &LayoutConfig,
) -> Vec<LadderPlacement> {
    let half_ladder = config.ladder_width * 0.5;
    let mut ladders: Vec<LadderPlacement> = platforms
        .windows(2)
        .enumerate()
        .map(|(lower_index, pair)| {
            let (lower, upper) = (pair[0].position, pair[1].position);
            let x = if lower.x < upper.x {
                lower.x + config.platform_width - half_ladder
            } else {
                lower.x - half_ladder
            };
            LadderPlacement {
                position: Vec2::new(x, upper.y),
                size: Vec2::new(config.ladder_width, lower.y - upper.y),
                kind: LadderKind::Connecting {
                    lower: lower_index,
                    upper: lower_index + 1,
                },
            }
        })
        .collect();

    if platforms.len() >= 2 {
        let x = viewport.width_f32() * 0.5 - half_ladder;
        ladders.extend(config.central_ladder_offsets.iter().map(|offset| LadderPlacement {
            position: Vec2::new(x, viewport.height_f32() - offset),
            size: Vec2::new(config.ladder_width, config.central_ladder_height),
            kind: LadderKind::Central,
        }));
    }
    ladders
}

fn platform_coins(platforms: &[PlatformPlacement], config: &LayoutConfig) -> Vec<CoinPlacement> {
    let mut by_height: Vec<usize> = (0..platforms.len()).collect();
    by_height.sort_by(|a, b| platforms[*a].position.y.total_cmp(&platforms[*b].position.y));

    evenly_spaced_picks(by_height.len(), config.platform_coins)
        .into_iter()
        .map(|pick| {
            let index = by_height[pick];
            let platform = platforms[index].position;
            CoinPlacement {
                position: Vec2::new(
                    platform.x + config.platform_width * 0.5 - PLATFORM_COIN_X_OFFSET,
                    platform.y - PLATFORM_COIN_RISE,
                ),
                anchor: CoinAnchor::Platform(index),
            }
        })
        .collect()
}

fn ladder_coins(
    viewport: Viewport,
    ladders: &[LadderPlacement],
    config: &LayoutConfig,
) -> Vec<CoinPlacement> {
    let center_x = viewport.width_f32() * 0.5;
    let mut right_side: Vec<usize> = (0..ladders.len())
        .filter(|index| ladders[*index].position.x > center_x)
        .collect();
    right_side.sort_by(|a, b| ladders[*a].position.y.total_cmp(&ladders[*b].position.y));

    evenly_spaced_picks(right_side.len(), config.ladder_coins)
        .into_iter()
        .map(|pick| {
            let index = right_side[pick];
            let ladder = &ladders[index];
            CoinPlacement {
                position: Vec2::new(
                    ladder.position.x + LADDER_COIN_X_OFFSET,
                    ladder.position.y + ladder.size.y * 0.5,
                ),
                anchor: CoinAnchor::Ladder(index),
            }
        })
        .collect()
}

/// `floor(i * len / count)` for `i` in `0..count`, without out-of-range or repeated picks.
fn evenly_spaced_picks(len: usize, count: usize) -> Vec<usize> {
    let mut picks: Vec<usize> = Vec::with_capacity(count.min(len));
    for i in 0..count {
        let pick = i * len / count;
        if pick >= len || picks.last() == Some(&pick) {
            continue;
        }
        picks.push(pick);
    }
    picks
}

fn place_goal(
    viewport: Viewport,
    platforms: &[PlatformPlacement],
    config: &LayoutConfig,
) -> Option<GoalPlacement> {
    let highest = platforms
        .iter()
        .map(|platform| platform.position.y)
        .min_by(f32::total_cmp)?;
    let top_y = highest - GOAL_RISE;
    let center_x = viewport.width_f32() * 0.5;

    Some(GoalPlacement {
        win_platform: PlatformPlacement {
            position: Vec2::new(
                center_x - config.win_platform_width * 0.5,
                top_y - config.win_platform_height,
            ),
            size: Vec2::new(config.win_platform_width, config.win_platform_height),
        },
        crown_center: Vec2::new(center_x, top_y - CROWN_RISE),
    })
}

/// Warns when the generated total differs from the configured target. Never adjusts.
pub(crate) fn verify_coin_total(layout: &LevelLayout, target_coins: usize) -> bool {
    if layout.total_coins == target_coins {
        return true;
    }
    warn!(
        expected = target_coins,
        actual = layout.total_coins,
        width = layout.viewport.width,
        height = layout.viewport.height,
        "coin_total_mismatch"
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(width: u32, height: u32) -> LevelLayout {
        generate_layout(Viewport::new(width, height), &LayoutConfig::default())
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn reference_viewport_produces_full_layout() {
        let layout = generate(1280, 800);

        assert_eq!(layout.platforms.len(), 8);
        assert_eq!(layout.ladders.len(), 9);
        assert_eq!(
            layout
                .ladders
                .iter()
                .filter(|ladder| ladder.kind == LadderKind::Central)
                .count(),
            2
        );
        assert_eq!(layout.platform_coin_count(), 6);
        assert_eq!(layout.ladder_coin_count(), 3);
        assert_eq!(layout.total_coins, 9);
        assert!(verify_coin_total(&layout, 9));
    }

    #[test]
    fn reference_viewport_platform_positions_alternate_sides() {
        let layout = generate(1280, 800);
        let expected_x = [192.0, 896.0, 320.0, 768.0, 192.0, 896.0, 320.0, 768.0];

        for (index, platform) in layout.platforms.iter().enumerate() {
            assert_close(platform.position.x, expected_x[index]);
            assert_close(platform.position.y, 620.0 - 60.0 * index as f32);
            assert_eq!(platform.size, Vec2::new(120.0, 24.0));
        }
    }

    #[test]
    fn connecting_ladder_sits_on_edge_facing_upper_platform() {
        let layout = generate(1280, 800);

        // lower at x=192 is left of upper at x=896: right edge of lower
        assert_close(layout.ladders[0].position.x, 302.0);
        // lower at x=896 is right of upper at x=320: left edge of lower
        assert_close(layout.ladders[1].position.x, 886.0);
        assert_close(layout.ladders[1].position.y, 500.0);
        assert_close(layout.ladders[1].size.y, 60.0);
    }

    #[test]
    fn central_ladders_are_fixed_height_near_center() {
        let layout = generate(1280, 800);
        let central: Vec<&LadderPlacement> = layout
            .ladders
            .iter()
            .filter(|ladder| ladder.kind == LadderKind::Central)
            .collect();

        assert_close(central[0].position.x, 630.0);
        assert_close(central[0].position.y, 520.0);
        assert_close(central[1].position.y, 320.0);
        assert!(central.iter().all(|ladder| ladder.size.y == 100.0));
    }

    #[test]
    fn every_connecting_ladder_spans_its_pair_exactly() {
        for height in [400, 560, 800, 1080, 1400] {
            let layout = generate(1280, height);
            for ladder in &layout.ladders {
                let LadderKind::Connecting { lower, upper } = ladder.kind else {
                    continue;
                };
                let lower_y = layout.platforms[lower].position.y;
                let upper_y = layout.platforms[upper].position.y;
                assert!(ladder.size.y > 0.0);
                assert_close(ladder.size.y, lower_y - upper_y);
                assert_close(ladder.position.y, upper_y);
            }
        }
    }

    #[test]
    fn platform_count_follows_height_formula() {
        for width in (600..=1920).step_by(220) {
            for height in (400..=1400).step_by(37) {
                let layout = generate(width, height);
                let expected = (((height as f32 - 280.0) / 60.0).floor() as usize).min(12);
                assert_eq!(layout.platforms.len(), expected, "{width}x{height}");
            }
        }
    }

    #[test]
    fn coin_split_is_six_plus_three_whenever_enough_anchors_exist() {
        for width in (600..=1920).step_by(220) {
            for height in (400..=1400).step_by(37) {
                let layout = generate(width, height);
                let center_x = width as f32 * 0.5;
                let right_ladders = layout
                    .ladders
                    .iter()
                    .filter(|ladder| ladder.position.x > center_x)
                    .count();

                assert!(layout.total_coins <= 9, "{width}x{height}");
                assert_eq!(layout.total_coins, layout.coins.len(), "{width}x{height}");
                assert!(layout.platform_coin_count() <= layout.platforms.len().min(6));
                assert!(layout.ladder_coin_count() <= right_ladders.min(3));
                if layout.platforms.len() >= 6 && right_ladders >= 3 {
                    assert_eq!(layout.platform_coin_count(), 6, "{width}x{height}");
                    assert_eq!(layout.ladder_coin_count(), 3, "{width}x{height}");
                }

                let anchors: Vec<CoinAnchor> =
                    layout.coins.iter().map(|coin| coin.anchor).collect();
                for (index, anchor) in anchors.iter().enumerate() {
                    assert!(!anchors[..index].contains(anchor), "{width}x{height}");
                }
            }
        }
    }

    #[test]
    fn central_ladders_follow_configured_offsets() {
        let config = LayoutConfig {
            central_ladder_offsets: vec![300.0],
            ..LayoutConfig::default()
        };
        let layout = generate_layout(Viewport::new(1280, 800), &config);
        let central: Vec<&LadderPlacement> = layout
            .ladders
            .iter()
            .filter(|ladder| ladder.kind == LadderKind::Central)
            .collect();

        assert_eq!(central.len(), 1);
        assert_close(central[0].position.y, 500.0);
        assert_eq!(layout.ladders.len(), 8);
    }

    #[test]
    fn platform_y_strictly_decreases_with_index() {
        let layout = generate(1600, 1200);
        for pair in layout.platforms.windows(2) {
            assert!(pair[1].position.y < pair[0].position.y);
        }
    }

    #[test]
    fn platform_coins_are_centered_above_their_platform() {
        let layout = generate(1280, 800);
        for coin in &layout.coins {
            let CoinAnchor::Platform(index) = coin.anchor else {
                continue;
            };
            let platform = layout.platforms[index].position;
            assert_close(coin.position.x, platform.x + 48.0);
            assert_close(coin.position.y, platform.y - 40.0);
        }
    }

    #[test]
    fn ladder_coins_only_use_right_side_ladders() {
        let layout = generate(1280, 800);
        let ladder_coins: Vec<&CoinPlacement> = layout
            .coins
            .iter()
            .filter(|coin| matches!(coin.anchor, CoinAnchor::Ladder(_)))
            .collect();

        assert_eq!(ladder_coins.len(), 3);
        for coin in ladder_coins {
            let CoinAnchor::Ladder(index) = coin.anchor else {
                unreachable!();
            };
            let ladder = &layout.ladders[index];
            assert!(ladder.position.x > 640.0);
            assert_close(coin.position.x, ladder.position.x + 30.0);
            assert_close(coin.position.y, ladder.position.y + ladder.size.y * 0.5);
        }
    }

    #[test]
    fn goal_sits_above_highest_platform() {
        let layout = generate(1280, 800);
        let goal = layout.goal.expect("goal");

        assert_close(goal.win_platform.position.x, 560.0);
        assert_close(goal.win_platform.position.y, 140.0);
        assert_eq!(goal.win_platform.size, Vec2::new(160.0, 20.0));
        assert_close(goal.crown_center.x, 640.0);
        assert_close(goal.crown_center.y, 130.0);
    }

    #[test]
    fn tall_viewport_caps_platforms_and_still_places_nine_coins() {
        let layout = generate(1920, 1600);
        assert_eq!(layout.platforms.len(), 12);
        assert_eq!(layout.total_coins, 9);
    }

    #[test]
    fn same_viewport_generates_identical_layout() {
        assert_eq!(generate(1366, 768), generate(1366, 768));
    }

    #[test]
    fn small_viewport_degrades_without_panicking() {
        let single = generate(800, 340);
        assert_eq!(single.platforms.len(), 1);
        assert!(single.ladders.is_empty());
        assert_eq!(single.total_coins, 1);
        assert!(single.goal.is_some());
        assert!(!verify_coin_total(&single, 9));

        let empty = generate(800, 200);
        assert!(empty.platforms.is_empty());
        assert!(empty.ladders.is_empty());
        assert!(empty.coins.is_empty());
        assert!(empty.goal.is_none());
    }

    #[test]
    fn evenly_spaced_picks_skip_repeats_when_short() {
        assert_eq!(evenly_spaced_picks(8, 6), vec![0, 1, 2, 4, 5, 6]);
        assert_eq!(evenly_spaced_picks(4, 6), vec![0, 1, 2, 3]);
        assert_eq!(evenly_spaced_picks(0, 3), Vec::<usize>::new());
    }
}
