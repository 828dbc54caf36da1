use feed_sim::scoring::ModifierKind;
use feed_sim::stages::{CandidateSource, FilterRule, FilterStatus, RankTier, Visibility};
use feed_sim::{EngagementCounts, FeedPipeline, PipelineState, PostCandidate, SimConfig, SimError};

fn pipeline() -> FeedPipeline {
    FeedPipeline::new(&SimConfig::default())
}

fn plain_post(text: &str) -> PostCandidate {
    PostCandidate::new(text, false, false, 100)
}

fn likes(count: u64) -> EngagementCounts {
    EngagementCounts::new(count, 0, 0)
}

#[test]
fn sourcing_threshold_is_strict() {
    let pipeline = pipeline();
    let engagement = likes(10);

    let at_threshold = PostCandidate::new("hello there", false, false, 500);
    let above = PostCandidate::new("hello there", false, false, 501);
    let premium = PostCandidate::new("hello there", false, true, 0);

    let report = pipeline.run(&at_threshold, &engagement).unwrap();
    assert_eq!(report.sourcing.payload, CandidateSource::LocalOnly);

    let report = pipeline.run(&above, &engagement).unwrap();
    assert_eq!(report.sourcing.payload, CandidateSource::Global);

    let report = pipeline.run(&premium, &engagement).unwrap();
    assert!(report.sourcing.payload.is_global());
}

#[test]
fn media_question_post_scores_twelve() {
    let post = PostCandidate::new("Test post?", true, false, 500);
    let report = pipeline().run(&post, &likes(10)).unwrap();

    let scoring = report.scoring.as_ref().expect("scored");
    assert!((scoring.payload.base_potential - 2.4).abs() < 1e-6);
    assert!((scoring.payload.engagement_score - 5.0).abs() < 1e-6);
    assert!((scoring.payload.final_score - 12.0).abs() < 1e-6);

    let kinds: Vec<ModifierKind> = scoring.payload.modifiers.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![ModifierKind::MediaBoost, ModifierKind::ConversationStarter]
    );

    let visibility = report.visibility.as_ref().expect("visibility");
    assert_eq!(visibility.status, Visibility::Show);
    assert_eq!(visibility.payload, RankTier::Low);
    assert_eq!(report.final_state(), PipelineState::Done);
    assert!(report.final_state().is_terminal());
    assert!(report.path.iter().rev().skip(1).all(|state| !state.is_terminal()));
}

#[test]
fn replies_dominate_engagement() {
    let post = plain_post("Shipping a new release today");
    let report = pipeline()
        .run(&post, &EngagementCounts::new(0, 10, 0))
        .unwrap();

    let scoring = report.scoring.as_ref().unwrap();
    assert!((scoring.payload.base_potential - 1.0).abs() < 1e-6);
    assert!((scoring.payload.final_score - 135.0).abs() < 1e-6);
    assert!((scoring.payload.engagement.reply - 135.0).abs() < 1e-6);
    assert_eq!(report.tier(), Some(RankTier::High));
}

#[test]
fn banned_keyword_drops_before_scoring() {
    let post = plain_post("Huge GIVEAWAY running this week");
    let report = pipeline().run(&post, &likes(1000)).unwrap();

    assert_eq!(report.filtering.status, FilterStatus::Dropped);
    assert_eq!(report.filtering.payload, Some(FilterRule::MutedKeyword));
    assert!(report.scoring.is_none());
    assert!(report.visibility.is_none());
    assert!(report.is_dropped());
    assert!(report.final_state().is_terminal());
    assert_eq!(
        report.path,
        vec![
            PipelineState::Sourcing,
            PipelineState::Filtering,
            PipelineState::Dropped
        ]
    );
}

#[test]
fn multi_word_and_cjk_keywords_are_muted() {
    let pipeline = pipeline();

    let report = pipeline.run(&plain_post("DM me for the link"), &likes(5)).unwrap();
    assert_eq!(report.filtering.status, FilterStatus::Dropped);

    let report = pipeline.run(&plain_post("今日も稼げる方法"), &likes(5)).unwrap();
    assert_eq!(report.filtering.status, FilterStatus::Dropped);
}

#[test]
fn hashtag_limit_is_inclusive() {
    let pipeline = pipeline();

    let five = plain_post("launch day #a #b #c #d #e");
    let report = pipeline.run(&five, &likes(10)).unwrap();
    assert_ne!(report.filtering.status, FilterStatus::Dropped);
    assert!(report.scoring.is_some());

    let six = plain_post("launch day #a #b #c #d #e #f");
    let report = pipeline.run(&six, &likes(10)).unwrap();
    assert_eq!(report.filtering.status, FilterStatus::Dropped);
    assert_eq!(report.filtering.payload, Some(FilterRule::HashtagSpam));
}

#[test]
fn first_terminal_guard_short_circuits() {
    let post = plain_post("giveaway #a #b #c #d #e #f");
    let report = pipeline().run(&post, &likes(10)).unwrap();

    assert_eq!(report.filtering.payload, Some(FilterRule::MutedKeyword));
    assert_eq!(report.filtering.log.len(), 1);
}

#[test]
fn short_text_without_media_warns_but_continues() {
    let pipeline = pipeline();

    let report = pipeline.run(&plain_post("hi"), &likes(40)).unwrap();
    assert_eq!(report.filtering.status, FilterStatus::Warning);
    assert_eq!(report.filtering.payload, Some(FilterRule::LowQuality));
    assert_eq!(report.final_state(), PipelineState::Done);
    assert!((report.final_score().unwrap() - 20.0).abs() < 1e-6);

    let with_media = PostCandidate::new("hi", true, false, 100);
    let report = pipeline.run(&with_media, &likes(40)).unwrap();
    assert_eq!(report.filtering.status, FilterStatus::Passed);
}

#[test]
fn link_halves_potential_and_limits_visibility() {
    let post = plain_post("read this https://example.com/post");
    let report = pipeline().run(&post, &likes(10)).unwrap();

    let scoring = report.scoring.as_ref().unwrap();
    assert!((scoring.payload.base_potential - 0.5).abs() < 1e-6);
    assert!((scoring.payload.final_score - 2.5).abs() < 1e-6);
    assert_eq!(
        report.visibility.as_ref().unwrap().status,
        Visibility::Limited
    );
}

#[test]
fn longform_boost_needs_premium_and_length() {
    let pipeline = pipeline();
    let long_text = "a".repeat(141);
    let boundary_text = "a".repeat(140);

    let premium = PostCandidate::new(long_text.clone(), false, true, 0);
    let report = pipeline.run(&premium, &likes(10)).unwrap();
    assert!((report.scoring.unwrap().payload.base_potential - 1.1).abs() < 1e-6);

    let free = PostCandidate::new(long_text, false, false, 0);
    let report = pipeline.run(&free, &likes(10)).unwrap();
    assert!((report.scoring.unwrap().payload.base_potential - 1.0).abs() < 1e-6);

    let boundary = PostCandidate::new(boundary_text, false, true, 0);
    let report = pipeline.run(&boundary, &likes(10)).unwrap();
    assert!((report.scoring.unwrap().payload.base_potential - 1.0).abs() < 1e-6);
}

#[test]
fn all_modifiers_stack_once_each() {
    let text = format!("{} https://example.com ?? ？", "word ".repeat(30));
    let post = PostCandidate::new(text, true, true, 0);
    let report = pipeline().run(&post, &likes(10)).unwrap();

    let scoring = report.scoring.unwrap();
    assert_eq!(scoring.payload.modifiers.len(), 4);
    assert!((scoring.payload.base_potential - 2.0 * 0.5 * 1.2 * 1.1).abs() < 1e-6);
}

#[test]
fn full_width_question_mark_counts() {
    let report = pipeline().run(&plain_post("どう思う？"), &likes(10)).unwrap();
    assert!((report.scoring.unwrap().payload.base_potential - 1.2).abs() < 1e-6);
}

#[test]
fn visibility_and_tier_boundaries() {
    let pipeline = pipeline();
    let post = plain_post("Shipping a new release today");

    let cases = [
        (19, Visibility::Limited, RankTier::Low),
        (20, Visibility::Show, RankTier::Low),
        (60, Visibility::Show, RankTier::Low),
        (62, Visibility::Show, RankTier::Mid),
        (200, Visibility::Show, RankTier::Mid),
        (202, Visibility::Show, RankTier::High),
    ];

    for (like_count, visibility, tier) in cases {
        let report = pipeline.run(&post, &likes(like_count)).unwrap();
        let stage = report.visibility.unwrap();
        assert_eq!(stage.status, visibility, "likes={}", like_count);
        assert_eq!(stage.payload, tier, "likes={}", like_count);
    }
}

#[test]
fn empty_text_is_rejected_before_the_pipeline() {
    let result = pipeline().run(&plain_post("   "), &likes(10));
    assert!(matches!(result, Err(SimError::MissingText)));
}

#[test]
fn repeated_runs_are_identical() {
    let pipeline = pipeline();
    let post = PostCandidate::new("Would you try this? #rust", true, true, 2_000);
    let engagement = EngagementCounts::new(12, 3, 4);

    let first = pipeline.run(&post, &engagement).unwrap();
    let second = pipeline.run(&post, &engagement).unwrap();

    assert_eq!(first, second);
    assert!(first.post_id.starts_with("post_"));
}

#[test]
fn configured_threshold_changes_sourcing() {
    let mut config = SimConfig::default();
    config.sourcing.global_follower_threshold = 50;
    let pipeline = FeedPipeline::new(&config);

    let report = pipeline.run(&plain_post("hello there"), &likes(10)).unwrap();
    assert_eq!(report.sourcing.payload, CandidateSource::Global);
}
