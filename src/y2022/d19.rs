use {
    crate::*,
    nom::{
        bytes::complete::tag,
        character::complete::line_ending,
        combinator::{map, opt},
        error::Error,
        multi::many0,
        sequence::{delimited, terminated, tuple},
        Err, IResult,
    },
    std::{
        collections::HashSet,
        ops::{Add, Index, IndexMut, Sub},
    },
    strum::{EnumCount, EnumIter, IntoEnumIterator},
};

#[derive(Clone, Copy, Debug, EnumCount, EnumIter, PartialEq)]
#[repr(usize)]
enum Material {
    Ore,
    Clay,
    Obsidian,
    Geode,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
struct MaterialCounts([u16; Material::COUNT]);

impl MaterialCounts {
    fn all_le(self, other: Self) -> bool {
        self.0
            .into_iter()
            .zip(other.0)
            .all(|(count, other_count)| count <= other_count)
    }
}

impl Add for MaterialCounts {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        for (count, other_count) in self.0.iter_mut().zip(other.0) {
            *count += other_count;
        }

        self
    }
}

impl Sub for MaterialCounts {
    type Output = Self;

    fn sub(mut self, other: Self) -> Self {
        for (count, other_count) in self.0.iter_mut().zip(other.0) {
            *count -= other_count;
        }

        self
    }
}

impl Index<Material> for MaterialCounts {
    type Output = u16;

    fn index(&self, material: Material) -> &u16 {
        &self.0[material as usize]
    }
}

impl IndexMut<Material> for MaterialCounts {
    fn index_mut(&mut self, material: Material) -> &mut u16 {
        &mut self.0[material as usize]
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
struct Blueprint {
    id: u32,
    robot_costs: [MaterialCounts; Material::COUNT],
}

impl Blueprint {
    /// Per material, the largest single-robot cost; more robots of a kind than that can never all
    /// pay out in one minute. Geode robots are always useful.
    fn max_useful_robots(&self) -> MaterialCounts {
        let mut max_useful_robots: MaterialCounts = MaterialCounts::default();

        for material in Material::iter() {
            max_useful_robots[material] = if material == Material::Geode {
                u16::MAX
            } else {
                self.robot_costs
                    .iter()
                    .map(|robot_cost| robot_cost[material])
                    .max()
                    .unwrap_or_default()
            };
        }

        max_useful_robots
    }

    fn max_geodes(&self, minutes: u16) -> u16 {
        let mut searcher: ScheduleSearcher = ScheduleSearcher {
            blueprint: self,
            max_useful_robots: self.max_useful_robots(),
            best: 0_u16,
            visited: HashSet::new(),
        };
        let mut robots: MaterialCounts = MaterialCounts::default();

        robots[Material::Ore] = 1_u16;

        searcher.visit(ScheduleState {
            materials: MaterialCounts::default(),
            robots,
            minutes_remaining: minutes,
        });

        searcher.best
    }
}

impl Parse for Blueprint {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            tuple((
                delimited(
                    tag("Blueprint "),
                    parse_integer::<u32>,
                    tag(": Each ore robot costs "),
                ),
                terminated(parse_integer::<u16>, tag(" ore. Each clay robot costs ")),
                terminated(parse_integer::<u16>, tag(" ore. Each obsidian robot costs ")),
                terminated(parse_integer::<u16>, tag(" ore and ")),
                terminated(parse_integer::<u16>, tag(" clay. Each geode robot costs ")),
                terminated(parse_integer::<u16>, tag(" ore and ")),
                terminated(parse_integer::<u16>, tag(" obsidian.")),
            )),
            |(
                id,
                ore_robot_ore,
                clay_robot_ore,
                obsidian_robot_ore,
                obsidian_robot_clay,
                geode_robot_ore,
                geode_robot_obsidian,
            )| {
                let mut robot_costs: [MaterialCounts; Material::COUNT] = Default::default();

                robot_costs[Material::Ore as usize][Material::Ore] = ore_robot_ore;
                robot_costs[Material::Clay as usize][Material::Ore] = clay_robot_ore;
                robot_costs[Material::Obsidian as usize][Material::Ore] = obsidian_robot_ore;
                robot_costs[Material::Obsidian as usize][Material::Clay] = obsidian_robot_clay;
                robot_costs[Material::Geode as usize][Material::Ore] = geode_robot_ore;
                robot_costs[Material::Geode as usize][Material::Obsidian] = geode_robot_obsidian;

                Self { id, robot_costs }
            },
        )(input)
    }
}

#[derive(Clone, Copy, Eq, Hash, PartialEq)]
struct ScheduleState {
    materials: MaterialCounts,
    robots: MaterialCounts,
    minutes_remaining: u16,
}

/// Depth-first search over build schedules. `best` accumulates the highest geode count seen so
/// far, which both is the eventual answer and feeds the optimistic bound that prunes branches.
struct ScheduleSearcher<'b> {
    blueprint: &'b Blueprint,
    max_useful_robots: MaterialCounts,
    best: u16,
    visited: HashSet<ScheduleState>,
}

impl<'b> ScheduleSearcher<'b> {
    /// Even a geode robot built every remaining minute can only add a triangular number of
    /// geodes. Branches whose optimistic total can't beat the running best are cut.
    fn optimistic_geodes(state: &ScheduleState) -> u16 {
        let minutes: u16 = state.minutes_remaining;

        state.materials[Material::Geode]
            + state.robots[Material::Geode] * minutes
            + triangle_number(minutes.saturating_sub(1_u16) as usize) as u16
    }

    /// The state a minute later when `build` is purchased at the start of the minute: costs are
    /// paid up front, the old robots accrue, and the new robot comes online at the end.
    fn step(&self, state: &ScheduleState, build: Option<Material>) -> ScheduleState {
        let mut materials: MaterialCounts = state.materials;
        let mut robots: MaterialCounts = state.robots;

        if let Some(material) = build {
            materials = materials - self.blueprint.robot_costs[material as usize];
        }

        materials = materials + state.robots;

        if let Some(material) = build {
            robots[material] += 1_u16;
        }

        // Material beyond what the remaining minutes can spend never matters, so clamping it
        // collapses equivalent states
        let minutes_remaining: u16 = state.minutes_remaining - 1_u16;

        for material in Material::iter() {
            if material != Material::Geode {
                materials[material] = materials[material]
                    .min(minutes_remaining * self.max_useful_robots[material]);
            }
        }

        ScheduleState {
            materials,
            robots,
            minutes_remaining,
        }
    }

    fn visit(&mut self, state: ScheduleState) {
        if state.minutes_remaining == 0_u16 {
            self.best = self.best.max(state.materials[Material::Geode]);

            return;
        }

        if Self::optimistic_geodes(&state) <= self.best || !self.visited.insert(state) {
            return;
        }

        // A minute spent building a geode robot dominates every alternative
        if self.blueprint.robot_costs[Material::Geode as usize].all_le(state.materials) {
            self.visit(self.step(&state, Some(Material::Geode)));

            return;
        }

        for material in [Material::Obsidian, Material::Clay, Material::Ore] {
            if state.robots[material] < self.max_useful_robots[material]
                && self.blueprint.robot_costs[material as usize].all_le(state.materials)
            {
                self.visit(self.step(&state, Some(material)));
            }
        }

        self.visit(self.step(&state, None));
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<Blueprint>);

impl Solution {
    const Q1_MINUTES: u16 = 24_u16;
    const Q2_MINUTES: u16 = 32_u16;
    const Q2_BLUEPRINTS: usize = 3_usize;

    fn sum_of_quality_levels(&self) -> u32 {
        self.0
            .iter()
            .map(|blueprint| blueprint.id * blueprint.max_geodes(Self::Q1_MINUTES) as u32)
            .sum()
    }

    fn product_of_first_max_geodes(&self) -> u64 {
        self.0
            .iter()
            .take(Self::Q2_BLUEPRINTS)
            .map(|blueprint| blueprint.max_geodes(Self::Q2_MINUTES) as u64)
            .product()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(many0(terminated(Blueprint::parse, opt(line_ending))), Self)(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.sum_of_quality_levels());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.product_of_first_max_geodes());
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STR: &'static str = "\
        Blueprint 1: \
        Each ore robot costs 4 ore. \
        Each clay robot costs 2 ore. \
        Each obsidian robot costs 3 ore and 14 clay. \
        Each geode robot costs 2 ore and 7 obsidian.\n\
        Blueprint 2: \
        Each ore robot costs 2 ore. \
        Each clay robot costs 3 ore. \
        Each obsidian robot costs 3 ore and 8 clay. \
        Each geode robot costs 3 ore and 12 obsidian.\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| SOLUTION_STR.try_into().unwrap())
    }

    /// No pruning, no memoization: every affordable purchase and idling are all tried, every
    /// minute.
    fn exhaustive_max_geodes(blueprint: &Blueprint, state: ScheduleState) -> u16 {
        if state.minutes_remaining == 0_u16 {
            return state.materials[Material::Geode];
        }

        Material::iter()
            .filter(|material| {
                blueprint.robot_costs[*material as usize].all_le(state.materials)
            })
            .map(Some)
            .chain([None])
            .map(|build| {
                let mut materials: MaterialCounts = state.materials;
                let mut robots: MaterialCounts = state.robots;

                if let Some(material) = build {
                    materials = materials - blueprint.robot_costs[material as usize];
                }

                materials = materials + state.robots;

                if let Some(material) = build {
                    robots[material] += 1_u16;
                }

                exhaustive_max_geodes(
                    blueprint,
                    ScheduleState {
                        materials,
                        robots,
                        minutes_remaining: state.minutes_remaining - 1_u16,
                    },
                )
            })
            .max()
            .unwrap()
    }

    #[test]
    fn test_try_from_str() {
        let solution: &Solution = solution();

        assert_eq!(solution.0.len(), 2_usize);
        assert_eq!(solution.0[0_usize].id, 1_u32);
        assert_eq!(
            solution.0[0_usize].robot_costs[Material::Obsidian as usize],
            MaterialCounts([3_u16, 14_u16, 0_u16, 0_u16])
        );
        assert_eq!(
            solution.0[1_usize].robot_costs[Material::Geode as usize],
            MaterialCounts([3_u16, 0_u16, 12_u16, 0_u16])
        );
    }

    #[test]
    fn test_max_geodes() {
        let solution: &Solution = solution();

        assert_eq!(solution.0[0_usize].max_geodes(24_u16), 9_u16);
        assert_eq!(solution.0[1_usize].max_geodes(24_u16), 12_u16);
    }

    #[test]
    fn test_sum_of_quality_levels() {
        assert_eq!(solution().sum_of_quality_levels(), 33_u32);
    }

    #[test]
    fn test_product_of_first_max_geodes() {
        let solution: &Solution = solution();

        assert_eq!(solution.0[0_usize].max_geodes(32_u16), 56_u16);
        assert_eq!(solution.0[1_usize].max_geodes(32_u16), 62_u16);
        assert_eq!(solution.product_of_first_max_geodes(), 3472_u64);
    }

    #[test]
    fn test_pruning_matches_exhaustive_search() {
        for blueprint in &solution().0 {
            for minutes in [6_u16, 8_u16, 10_u16] {
                let mut robots: MaterialCounts = MaterialCounts::default();

                robots[Material::Ore] = 1_u16;

                assert_eq!(
                    blueprint.max_geodes(minutes),
                    exhaustive_max_geodes(
                        blueprint,
                        ScheduleState {
                            materials: MaterialCounts::default(),
                            robots,
                            minutes_remaining: minutes,
                        }
                    )
                );
            }
        }
    }

    #[test]
    fn test_max_geodes_is_monotone_in_minutes() {
        let blueprint: &Blueprint = &solution().0[0_usize];
        let mut previous: u16 = 0_u16;

        for minutes in 0_u16..=24_u16 {
            let max_geodes: u16 = blueprint.max_geodes(minutes);

            assert!(max_geodes >= previous);

            previous = max_geodes;
        }
    }
}
