//! Redistribution order: each owner's output follows its own history
//! order, with duplicate references producing duplicate objects, and
//! missing targets shrinking the list without failing it.

use crate::common::{raw_history, reference_of, World, ARTICLE_TAG, USER_TAG};
use std::sync::Arc;
use tether::{FetchOverrides, HistoryField, Prefetcher, Reference, Relation, TargetId};

#[test]
fn output_follows_history_order_with_duplicates() {
    let world = World::new();
    world.seed_user(1, "alice");
    world.seed_article(5, "intro");

    // [(T1,1),(T2,5),(T1,1)] resolves to [user 1, article 5, user 1].
    let owner = HistoryField::from_raw(raw_history(&[
        (USER_TAG.as_u32(), 1),
        (ARTICLE_TAG.as_u32(), 5),
        (USER_TAG.as_u32(), 1),
    ]));

    let prefetcher = Prefetcher::new(world.registry.clone());
    let results = prefetcher.run(&[&owner], &Relation::many("items"), &FetchOverrides::none());

    let resolved = results[0].as_ref().unwrap();
    assert_eq!(resolved.len(), 3);
    assert_eq!(
        reference_of(&resolved[0]),
        Reference::new(USER_TAG, TargetId::new(1))
    );
    assert_eq!(
        reference_of(&resolved[1]),
        Reference::new(ARTICLE_TAG, TargetId::new(5))
    );
    assert_eq!(
        reference_of(&resolved[2]),
        Reference::new(USER_TAG, TargetId::new(1))
    );
    assert!(Arc::ptr_eq(&resolved[0], &resolved[2]));
}

#[test]
fn missing_target_shrinks_list_without_error() {
    let world = World::new();
    // User 1 was deleted; only the article remains, plus the duplicate
    // stale user reference.
    world.seed_article(5, "intro");

    let owner = HistoryField::from_raw(raw_history(&[
        (USER_TAG.as_u32(), 1),
        (ARTICLE_TAG.as_u32(), 5),
        (USER_TAG.as_u32(), 1),
    ]));

    let prefetcher = Prefetcher::new(world.registry.clone());
    let results = prefetcher.run(&[&owner], &Relation::many("items"), &FetchOverrides::none());

    let resolved = results[0].as_ref().unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(
        reference_of(&resolved[0]),
        Reference::new(ARTICLE_TAG, TargetId::new(5))
    );
}

#[test]
fn per_owner_order_is_independent_of_other_owners() {
    let world = World::new();
    world.seed_user(1, "alice");
    world.seed_user(2, "bob");
    world.seed_article(5, "intro");

    let forward = HistoryField::from_raw(raw_history(&[
        (USER_TAG.as_u32(), 1),
        (USER_TAG.as_u32(), 2),
        (ARTICLE_TAG.as_u32(), 5),
    ]));
    let backward = HistoryField::from_raw(raw_history(&[
        (ARTICLE_TAG.as_u32(), 5),
        (USER_TAG.as_u32(), 2),
        (USER_TAG.as_u32(), 1),
    ]));

    let prefetcher = Prefetcher::new(world.registry.clone());
    let results = prefetcher.run(
        &[&forward, &backward],
        &Relation::many("items"),
        &FetchOverrides::none(),
    );

    let first: Vec<_> = results[0]
        .as_ref()
        .unwrap()
        .iter()
        .map(reference_of)
        .collect();
    let second: Vec<_> = results[1]
        .as_ref()
        .unwrap()
        .iter()
        .map(reference_of)
        .collect();

    assert_eq!(
        first,
        vec![
            Reference::new(USER_TAG, TargetId::new(1)),
            Reference::new(USER_TAG, TargetId::new(2)),
            Reference::new(ARTICLE_TAG, TargetId::new(5)),
        ]
    );
    assert_eq!(
        second,
        vec![
            Reference::new(ARTICLE_TAG, TargetId::new(5)),
            Reference::new(USER_TAG, TargetId::new(2)),
            Reference::new(USER_TAG, TargetId::new(1)),
        ]
    );
}

#[test]
fn only_last_snapshot_resolves() {
    let world = World::new();
    world.seed_user(1, "old");
    world.seed_user(2, "current");

    // History: first snapshot referenced user 1, current references user 2.
    let owner = HistoryField::from_raw("[[[1,1]],[[1,2]]]");

    let prefetcher = Prefetcher::new(world.registry.clone());
    let results = prefetcher.run(&[&owner], &Relation::many("items"), &FetchOverrides::none());

    let resolved = results[0].as_ref().unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].target_id(), TargetId::new(2));
}
