//! Tests for the rating engine.

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockVoteRepository;
use crate::test_support::ForumFixture;
use rstest::rstest;

fn request(topic_id: TopicId, user_id: UserId, is_liked: bool) -> RateTopicRequest {
    RateTopicRequest {
        topic_id,
        user_id,
        is_liked,
    }
}

#[tokio::test]
async fn like_then_dislike_from_two_users_then_switch() {
    let fixture = ForumFixture::new();
    let u1 = fixture.add_member("Ada", "Lovelace").await;
    let u2 = fixture.add_member("Grace", "Hopper").await;
    let topic = fixture.add_topic(&u1, "Leaky Faucet", None).await;
    let service = RatingService::new(fixture.store());

    let after_first = service.rate(request(topic, u1, true)).await.expect("rate");
    assert_eq!((after_first.like_count, after_first.dislike_count), (1, 0));

    let after_second = service.rate(request(topic, u2, false)).await.expect("rate");
    assert_eq!((after_second.like_count, after_second.dislike_count), (1, 1));

    let after_switch = service.rate(request(topic, u1, false)).await.expect("rate");
    assert_eq!((after_switch.like_count, after_switch.dislike_count), (0, 2));
    assert_eq!(fixture.store().vote_rows(&topic), 2);
}

#[rstest]
#[case(&[true])]
#[case(&[true, true])]
#[case(&[true, false])]
#[case(&[false, true, false, true])]
#[tokio::test]
async fn repeated_ratings_keep_one_row_holding_the_last_value(#[case] sequence: &[bool]) {
    let fixture = ForumFixture::new();
    let user = fixture.add_member("Ada", "Lovelace").await;
    let topic = fixture.add_topic(&user, "Leaky Faucet", None).await;
    let service = RatingService::new(fixture.store());

    for liked in sequence {
        service.rate(request(topic, user, *liked)).await.expect("rate");
    }

    let last = sequence.last().copied().expect("non-empty sequence");
    let vote = VoteRepository::find_for(&*fixture.store(), &topic, &user)
        .await
        .expect("lookup")
        .expect("vote row");
    assert_eq!(vote.is_liked, last);
    assert_eq!(fixture.store().vote_rows(&topic), 1);
}

#[tokio::test]
async fn counts_equal_distinct_raters() {
    let fixture = ForumFixture::new();
    let owner = fixture.add_member("Ada", "Lovelace").await;
    let topic = fixture.add_topic(&owner, "Deck stain", None).await;
    let service = RatingService::new(fixture.store());

    let mut last = RatingTally::default();
    for (index, liked) in [true, false, true, true, false].into_iter().enumerate() {
        let rater = fixture.add_member("Rater", &format!("No{index}")).await;
        last = service.rate(request(topic, rater, liked)).await.expect("rate");
        service.rate(request(topic, rater, liked)).await.expect("re-rate");
    }

    assert_eq!(last.total(), 5);
    assert_eq!((last.like_count, last.dislike_count), (3, 2));
}

#[tokio::test]
async fn rating_unknown_topic_is_not_found() {
    let fixture = ForumFixture::new();
    let user = fixture.add_member("Ada", "Lovelace").await;
    let service = RatingService::new(fixture.store());

    let err = service
        .rate(request(TopicId::random(), user, true))
        .await
        .expect_err("unknown topic");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn losing_insert_race_is_retried_as_update() {
    let topic = TopicId::random();
    let user = UserId::random();
    let mut votes = MockVoteRepository::new();
    votes.expect_find_for().times(1).return_once(|_, _| Ok(None));
    votes
        .expect_insert()
        .times(1)
        .return_once(|_| Err(VoteRepositoryError::duplicate_vote()));
    votes
        .expect_set_liked()
        .withf(|_, _, liked| !*liked)
        .times(1)
        .return_once(|_, _, _| Ok(true));
    votes.expect_tally().times(1).return_once(|_| {
        Ok(RatingTally {
            like_count: 0,
            dislike_count: 1,
        })
    });

    let service = RatingService::new(Arc::new(votes));
    let tally = service.rate(request(topic, user, false)).await.expect("rate");

    assert_eq!(tally.dislike_count, 1);
}

#[tokio::test]
async fn vote_vanishing_mid_update_reports_not_found() {
    let mut votes = MockVoteRepository::new();
    votes
        .expect_find_for()
        .return_once(|topic_id, user_id| Ok(Some(Vote::new(*topic_id, *user_id, true))));
    votes.expect_set_liked().return_once(|_, _, _| Ok(false));
    votes.expect_tally().never();

    let service = RatingService::new(Arc::new(votes));
    let err = service
        .rate(request(TopicId::random(), UserId::random(), false))
        .await
        .expect_err("vanished");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn connection_failures_are_service_unavailable() {
    let mut votes = MockVoteRepository::new();
    votes
        .expect_find_for()
        .return_once(|_, _| Err(VoteRepositoryError::connection("pool timed out")));

    let service = RatingService::new(Arc::new(votes));
    let err = service
        .rate(request(TopicId::random(), UserId::random(), true))
        .await
        .expect_err("unavailable");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_votes_from_one_user_leave_one_row() {
    let fixture = ForumFixture::new();
    let user = fixture.add_member("Ada", "Lovelace").await;
    let topic = fixture.add_topic(&user, "Leaky Faucet", None).await;
    let service = Arc::new(RatingService::new(fixture.store()));

    let handles: Vec<_> = (0..8)
        .map(|index| {
            let svc = Arc::clone(&service);
            tokio::spawn(async move { svc.rate(request(topic, user, index % 2 == 0)).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("join").expect("rate");
    }

    assert_eq!(fixture.store().vote_rows(&topic), 1);
}
