//! Cache soundness: a cached sequence is reused only while the stored
//! history still implies it, and the batch path warms the same cache the
//! lazy path reads.

use crate::common::{raw_history, World, ARTICLE_TAG, USER_TAG};
use tether::{
    Cardinality, FetchOverrides, HistoryField, Prefetcher, Reference, Relation, Resolver, Snapshot,
    TargetId,
};

#[test]
fn warm_cache_reads_issue_no_fetches() {
    let world = World::new();
    world.seed_user(1, "alice");
    world.seed_article(5, "intro");

    let owner = HistoryField::from_raw(raw_history(&[
        (USER_TAG.as_u32(), 1),
        (ARTICLE_TAG.as_u32(), 5),
    ]));
    let resolver = Resolver::new(world.registry.clone());
    let relation = Relation::many("items");

    let first = resolver.read(&owner, &relation).unwrap();
    let cold_calls = world.total_calls();
    assert!(cold_calls > 0);

    let second = resolver.read(&owner, &relation).unwrap();
    assert_eq!(world.total_calls(), cold_calls);
    assert_eq!(first.len(), second.len());
}

#[test]
fn history_append_invalidates_cached_sequence() {
    let world = World::new();
    world.seed_user(1, "alice");
    world.seed_user(2, "bob");

    let mut owner = HistoryField::from_raw(raw_history(&[(USER_TAG.as_u32(), 1)]));
    let resolver = Resolver::new(world.registry.clone());
    let relation = Relation::many("items");

    let stale = resolver.read(&owner, &relation).unwrap();
    assert_eq!(stale[0].target_id(), TargetId::new(1));

    let mut snapshot = Snapshot::new();
    snapshot.push(Reference::new(USER_TAG, TargetId::new(2)));
    owner.append_snapshot(snapshot).unwrap();

    let fresh = resolver.read(&owner, &relation).unwrap();
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].target_id(), TargetId::new(2));
}

#[test]
fn batch_prefetch_warms_the_lazy_path() {
    let world = World::new();
    world.seed_user(1, "alice");

    let owner = HistoryField::from_raw(raw_history(&[(USER_TAG.as_u32(), 1)]));
    let relation = Relation::many("items");

    let prefetcher = Prefetcher::new(world.registry.clone());
    prefetcher.run(&[&owner], &relation, &FetchOverrides::none());
    assert_eq!(world.user_calls.calls(), 1);

    // The lazy read finds the installed cache valid: zero further fetches.
    let resolver = Resolver::new(world.registry.clone());
    let resolved = resolver.read(&owner, &relation).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(world.user_calls.calls(), 1);
}

#[test]
fn single_and_many_views_share_one_history() {
    let world = World::new();
    world.seed_user(1, "alice");
    world.seed_article(5, "intro");

    let owner = HistoryField::from_raw(raw_history(&[
        (ARTICLE_TAG.as_u32(), 5),
        (USER_TAG.as_u32(), 1),
    ]));
    let resolver = Resolver::new(world.registry.clone());

    let many = Relation::many("terminations");
    let single = Relation::single("termination");
    assert_eq!(many.cardinality(), Cardinality::Many);
    assert_eq!(single.cardinality(), Cardinality::Single);

    let all = resolver.read(&owner, &many).unwrap();
    let one = resolver.read_one(&owner, &single).unwrap().unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(one.type_tag(), ARTICLE_TAG);
    assert_eq!(one.target_id(), TargetId::new(5));

    // Distinct relation names cache independently.
    assert!(owner.cached("terminations").is_some());
    assert!(owner.cached("termination").is_some());
}

#[test]
fn explicit_invalidate_forces_refetch() {
    let world = World::new();
    world.seed_user(1, "alice");

    let owner = HistoryField::from_raw(raw_history(&[(USER_TAG.as_u32(), 1)]));
    let resolver = Resolver::new(world.registry.clone());
    let relation = Relation::many("items");

    resolver.read(&owner, &relation).unwrap();
    assert_eq!(world.user_calls.calls(), 1);

    assert!(owner.invalidate("items"));
    resolver.read(&owner, &relation).unwrap();
    assert_eq!(world.user_calls.calls(), 2);
}
