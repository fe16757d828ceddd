//! Property tests for the layout engine on random genealogies.
//!
//! Generated records may reference unknown parents, list themselves as a
//! parent and form ancestry cycles of any length.

use float_cmp::approx_eq;
use proptest::prelude::*;

use lineage::{
    TreeBuilder,
    config::{AppConfig, LayoutConfig, RankDirection, StyleConfig},
    layout::FamilyLayout,
    person::Person,
};

fn id_for(index: usize, count: usize) -> String {
    if index < count {
        format!("p{index:02}")
    } else {
        format!("ghost{index}")
    }
}

/// Random records; indices past the record count become dangling references.
fn genealogy() -> impl Strategy<Value = Vec<Person>> {
    (1usize..18)
        .prop_flat_map(|n| {
            prop::collection::vec(
                (
                    prop::collection::vec(0..n + 2, 0..4),
                    prop::collection::vec(0..n + 1, 0..2),
                ),
                n,
            )
        })
        .prop_map(|records| {
            let n = records.len();
            records
                .iter()
                .enumerate()
                .map(|(i, (parents, spouses))| {
                    Person::new(id_for(i, n))
                        .with_parents(parents.iter().map(|&p| id_for(p, n)))
                        .with_spouses(spouses.iter().map(|&s| id_for(s, n)))
                })
                .collect()
        })
}

/// Layout settings covering both directions and root tightening.
fn settings() -> impl Strategy<Value = LayoutConfig> {
    (0usize..3, any::<bool>(), any::<bool>()).prop_map(|(tolerance, tighten, upward)| {
        let direction = if upward {
            RankDirection::BottomToTop
        } else {
            RankDirection::TopToBottom
        };
        LayoutConfig::default()
            .with_affinity_tolerance(tolerance)
            .with_tighten_roots(tighten)
            .with_direction(direction)
    })
}

fn run(persons: &[Person], layout: &LayoutConfig) -> FamilyLayout {
    let config = AppConfig::new(layout.clone(), StyleConfig::default());
    TreeBuilder::new(config)
        .layout(persons)
        .expect("generated records have unique identifiers")
}

proptest! {
    #[test]
    fn prop_ranked_edges_point_down(persons in genealogy(), layout in settings()) {
        let result = run(&persons, &layout);
        for edge in result.edges().iter().filter(|edge| !edge.is_unranked()) {
            let parent = result.vertex(edge.source().as_str()).unwrap();
            let child = result.vertex(edge.target().as_str()).unwrap();
            prop_assert!(
                parent.rank() < child.rank(),
                "{} (rank {}) -> {} (rank {})",
                edge.source(), parent.rank(), edge.target(), child.rank()
            );
            match layout.direction() {
                RankDirection::TopToBottom => {
                    prop_assert!(parent.position().y() < child.position().y());
                }
                RankDirection::BottomToTop => {
                    prop_assert!(parent.position().y() > child.position().y());
                }
            }
        }
    }

    #[test]
    fn prop_every_record_is_placed_once(persons in genealogy(), layout in settings()) {
        let result = run(&persons, &layout);
        prop_assert_eq!(result.vertices().len(), persons.len());

        let mut slots: Vec<(usize, usize)> =
            result.vertices().iter().map(|v| (v.rank(), v.order())).collect();
        slots.sort_unstable();
        slots.dedup();
        prop_assert_eq!(slots.len(), persons.len());
    }

    #[test]
    fn prop_layout_is_deterministic(persons in genealogy(), layout in settings()) {
        let first = run(&persons, &layout);
        let second = run(&persons, &layout);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_boxes_never_overlap(persons in genealogy(), layout in settings()) {
        let result = run(&persons, &layout);
        let vertices = result.vertices();
        for (i, a) in vertices.iter().enumerate() {
            prop_assert!(a.position().is_finite());
            for b in &vertices[i + 1..] {
                prop_assert!(
                    !a.bounds().intersects(&b.bounds()),
                    "{} overlaps {}", a.id(), b.id()
                );
                let same_x = approx_eq!(f32, a.position().x(), b.position().x());
                let same_y = approx_eq!(f32, a.position().y(), b.position().y());
                prop_assert!(!(same_x && same_y));
            }
        }
    }

    #[test]
    fn prop_every_rank_is_centred(persons in genealogy(), layout in settings()) {
        let result = run(&persons, &layout);
        for rank in 0..result.rank_count() {
            let centres: Vec<f32> = result
                .vertices()
                .iter()
                .filter(|v| v.rank() == rank)
                .map(|v| v.center().x())
                .collect();
            let sum: f32 = centres.iter().sum();
            prop_assert!(approx_eq!(f32, sum / centres.len() as f32, 0.0, epsilon = 0.01));
        }
    }

    #[test]
    fn prop_unranked_edges_are_reported(persons in genealogy(), layout in settings()) {
        let result = run(&persons, &layout);
        let unranked = result.edges().iter().filter(|edge| edge.is_unranked()).count();
        let broken = result
            .diagnostics()
            .iter()
            .filter(|d| d.code().as_str() == "L010")
            .count();
        prop_assert_eq!(unranked, broken);
    }
}
