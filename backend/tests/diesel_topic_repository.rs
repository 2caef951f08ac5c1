//! `DieselTopicRepository` against embedded PostgreSQL.
//!
//! Revision-guarded updates and the cascade from a topic to its comments,
//! votes and favorites are enforced by SQL, so they are exercised here.

use chrono::Utc;
use homecraft::domain::ports::{
    CommentRepository, FavoriteRepository, TopicRepository, TopicRepositoryError, VoteRepository,
};
use homecraft::domain::{Comment, CommentBody, Favorite, TopicDraft, TopicId, Vote};
use homecraft::outbound::persistence::{
    DieselCommentRepository, DieselFavoriteRepository, DieselTopicRepository,
    DieselVoteRepository,
};
use homecraft::test_support::DESCRIPTION_30;
use rstest::{fixture, rstest};

#[path = "support/pg_embed.rs"]
mod pg_embed;

#[expect(
    dead_code,
    reason = "Shared helpers include functions used only by other integration suites."
)]
mod support;

use pg_embed::shared_cluster;
use support::{PgWorld, handle_cluster_setup_failure};

#[fixture]
fn pg() -> Option<PgWorld> {
    match shared_cluster().and_then(PgWorld::setup) {
        Ok(world) => Some(world),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn topics(world: &PgWorld) -> DieselTopicRepository {
    DieselTopicRepository::new(world.pool.clone())
}

fn retitled(title: &str) -> TopicDraft {
    TopicDraft::try_new(title, DESCRIPTION_30, None, None).expect("draft")
}

#[rstest]
fn deleting_a_topic_cascades_to_dependent_rows(pg: Option<PgWorld>) {
    let Some(world) = pg else { return };
    let owner = world.add_member("ada@example.com");
    let reader = world.add_member("grace@example.com");
    let topic = world.add_topic(&owner, None);
    let body = CommentBody::new("Try a new washer").expect("comment body");
    world
        .block_on(
            DieselCommentRepository::new(world.pool.clone())
                .insert(&Comment::new(topic.id, reader, body, Utc::now())),
        )
        .expect("comment");
    world
        .block_on(
            DieselVoteRepository::new(world.pool.clone()).insert(&Vote::new(
                topic.id, reader, true,
            )),
        )
        .expect("vote");
    world
        .block_on(
            DieselFavoriteRepository::new(world.pool.clone()).insert(&Favorite::new(
                reader,
                topic.id,
                Utc::now(),
            )),
        )
        .expect("favorite");

    let deleted = world
        .block_on(topics(&world).delete(&topic.id))
        .expect("delete topic");

    assert!(deleted);
    for table in ["comments", "votes", "favorites"] {
        assert_eq!(
            world.rows_referencing(table, "topic_id", &topic.id),
            0,
            "{table} rows survived the topic"
        );
    }
    assert_eq!(world.rows_referencing("topics", "id", &topic.id), 0);
}

#[rstest]
fn updates_bump_the_stored_revision(pg: Option<PgWorld>) {
    let Some(world) = pg else { return };
    let owner = world.add_member("ada@example.com");
    let topic = world.add_topic(&owner, None);
    let repo = topics(&world);
    let edited = topic.revised(retitled("Dripping tap"));

    world
        .block_on(repo.update(&edited, topic.revision))
        .expect("update");
    let stored = world
        .block_on(repo.find_record(&topic.id))
        .expect("find")
        .expect("topic present");

    assert_eq!(stored.topic.revision, 2);
    assert_eq!(stored.topic.title.as_str(), "Dripping tap");
}

#[rstest]
fn stale_updates_report_the_stored_revision(pg: Option<PgWorld>) {
    let Some(world) = pg else { return };
    let owner = world.add_member("ada@example.com");
    let topic = world.add_topic(&owner, None);
    let repo = topics(&world);
    let first_edit = topic.revised(retitled("Dripping tap"));
    world
        .block_on(repo.update(&first_edit, topic.revision))
        .expect("first edit");

    let stale_edit = topic.revised(retitled("Noisy pipes"));
    let err = world
        .block_on(repo.update(&stale_edit, topic.revision))
        .expect_err("stale edit");

    assert_eq!(err, TopicRepositoryError::revision_mismatch(1_u32, 2_u32));
    let stored = world
        .block_on(repo.find_record(&topic.id))
        .expect("find")
        .expect("topic present");
    assert_eq!(stored.topic.title.as_str(), "Dripping tap");
}

#[rstest]
fn updating_a_missing_topic_is_not_found(pg: Option<PgWorld>) {
    let Some(world) = pg else { return };
    let owner = world.add_member("ada@example.com");
    let mut ghost = world.add_topic(&owner, None);
    ghost.id = TopicId::random();

    let err = world
        .block_on(topics(&world).update(&ghost, ghost.revision))
        .expect_err("missing topic");

    assert_eq!(err, TopicRepositoryError::not_found());
}

#[rstest]
fn topics_must_reference_an_existing_category(pg: Option<PgWorld>) {
    let Some(world) = pg else { return };
    let owner = world.add_member("ada@example.com");
    let plumbing = world.add_category("Plumbing");
    let topic = world.add_topic(&owner, Some(plumbing));
    let moved = topic.moved_to(Some(homecraft::domain::CategoryId::random()));

    let err = world
        .block_on(topics(&world).update(&moved, topic.revision))
        .expect_err("unknown category");

    assert_eq!(err, TopicRepositoryError::category_not_found());
}

#[rstest]
fn listing_filters_by_category_and_counts_per_category(pg: Option<PgWorld>) {
    let Some(world) = pg else { return };
    let owner = world.add_member("ada@example.com");
    let plumbing = world.add_category("Plumbing");
    let filed = world.add_topic(&owner, Some(plumbing));
    world.add_topic(&owner, None);
    let repo = topics(&world);

    let records = world
        .block_on(repo.list_records(Some(plumbing)))
        .expect("list");
    let counts = world.block_on(repo.count_by_category()).expect("counts");

    let ids: Vec<_> = records.iter().map(|record| record.topic.id).collect();
    assert_eq!(ids, [filed.id]);
    assert_eq!(records[0].category_name.as_deref(), Some("Plumbing"));
    assert_eq!(counts.get(&plumbing), Some(&1));
}
