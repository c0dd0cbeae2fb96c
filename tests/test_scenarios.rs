#![cfg(test)]
extern crate knapsack_bnb;

use knapsack_bnb::*;

fn configs() -> Vec<SearchConfig> {
    [
        Concurrency::Sequential,
        Concurrency::Parallel,
        Concurrency::Distributed { ranks: 1 },
        Concurrency::Distributed { ranks: 2 },
        Concurrency::Distributed { ranks: 5 },
    ]
    .into_iter()
    .map(|concurrency| SearchConfigBuilder::default()
        .concurrency(concurrency)
        .nb_threads(2_usize)
        .build()
        .unwrap())
    .collect()
}

fn ids(outcome: &SearchOutcome) -> Vec<i32> {
    outcome.selected.iter().map(|i| i.id).collect()
}

#[test]
fn four_items_capacity_ten() {
    let items = vec![
        Item::new(1, 10.0, 5.0),
        Item::new(2, 40.0, 4.0),
        Item::new(3, 30.0, 6.0),
        Item::new(4, 50.0, 3.0),
    ];
    for config in configs() {
        let outcome = run(&items, 10.0, &config).unwrap();
        assert_eq!(90.0, outcome.optimal_value);
        assert_eq!(vec![4, 2], ids(&outcome));
        assert_eq!(7.0, outcome.total_weight());
    }
}

#[test]
fn no_item_at_all() {
    for config in configs() {
        let outcome = run(&[], 100.0, &config).unwrap();
        assert_eq!(0.0, outcome.optimal_value);
        assert!(outcome.selected.is_empty());
    }
}

#[test]
fn one_item_heavier_than_the_knapsack() {
    for config in configs() {
        let outcome = run(&[Item::new(1, 99.0, 20.0)], 10.0, &config).unwrap();
        assert_eq!(0.0, outcome.optimal_value);
        assert!(outcome.selected.is_empty());
    }
}

#[test]
fn identical_ratios_are_tie_broken_by_value() {
    let items = vec![Item::new(1, 10.0, 5.0), Item::new(2, 20.0, 10.0)];
    let mut sorted = items.clone();
    sort_items(&mut sorted);
    assert_eq!(vec![2, 1], sorted.iter().map(|i| i.id).collect::<Vec<_>>());

    for config in configs() {
        for _ in 0..3 {
            let outcome = run(&items, 10.0, &config).unwrap();
            assert_eq!(20.0, outcome.optimal_value);
            assert_eq!(vec![2], ids(&outcome));
        }
    }
}

#[test]
fn zero_weight_items_do_not_break_the_ordering() {
    let items = vec![
        Item::new(1, 0.0, 0.0),
        Item::new(2, 7.0, 0.0),
        Item::new(3, 9.0, 3.0),
    ];
    for config in configs() {
        let outcome = run(&items, 2.0, &config).unwrap();
        assert_eq!(7.0, outcome.optimal_value);
        assert!(ids(&outcome).contains(&2));
    }
}

#[test]
fn invalid_configurations_are_rejected() {
    let no_thread = SearchConfigBuilder::default().nb_threads(0_usize).build();
    assert!(no_thread.is_err());
    let no_rank = SearchConfigBuilder::default()
        .concurrency(Concurrency::Distributed { ranks: 0 })
        .build();
    assert!(no_rank.is_err());
}
