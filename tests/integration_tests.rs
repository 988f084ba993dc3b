//! Integration tests for the jam-ranker pipeline
//!
//! These tests exercise the crate end to end:
//! - Snapshot discovery and loading from disk
//! - Attribution of team entries to every member
//! - Composite scoring and dense ranking
//! - Cross-file duplicate reporting and output files

mod fixtures;

use jam_ranker::ingest::RecordNormalizer;
use jam_ranker::metrics::PipelineMetrics;
use jam_ranker::output;
use jam_ranker::pipeline::{PipelineOptions, RankingPipeline};
use jam_ranker::ranking::CompositeRanker;
use jam_ranker::scoring::ScoringLegend;
use jam_ranker::sources::{discover_sources, load_batches, RecordSource};
use jam_ranker::types::{Category, ContributorId};
use serde_json::{json, Value};
use std::sync::Arc;

use fixtures::{assert_close, batch, two_event_batches, write_snapshot, RecordBuilder};

fn pipeline_with_duplicates() -> RankingPipeline {
    RankingPipeline::new(
        RecordNormalizer::default(),
        CompositeRanker::default(),
        PipelineOptions {
            include_duplicates: true,
            ..PipelineOptions::default()
        },
    )
}

#[test]
fn test_team_entry_is_credited_to_every_member() {
    let outcome = pipeline_with_duplicates().run(&two_event_batches());

    assert_eq!(outcome.rankings.len(), 2);

    let first = &outcome.rankings[0];
    assert_eq!(first.identity, ContributorId(7));
    assert_eq!(first.rank, 1);
    assert_eq!(first.appearance_count, 2);
    assert_eq!(first.team_sizes, vec![1, 2]);
    assert_eq!(first.event_versions, vec![48, 49]);
    assert_eq!(first.unique_games, 2);
    // Fun: (0.8 * 12 + 0.4 * 1) / 2 = 5.0, weighted by 0.35
    assert_close(first.performance_score, 1.75);
    assert_close(first.composite_score, 160.0);

    let second = &outcome.rankings[1];
    assert_eq!(second.identity, ContributorId(9));
    assert_eq!(second.rank, 2);
    assert_eq!(second.appearance_count, 1);
    assert_close(second.performance_score, 0.14);
    assert_close(second.composite_score, 21.2);
}

#[test]
fn test_category_breakdown_explains_performance() {
    let outcome = pipeline_with_duplicates().run(&two_event_batches());
    let top = &outcome.rankings[0];

    assert_eq!(top.categories.len(), Category::COUNT);
    let fun = top
        .categories
        .iter()
        .find(|summary| summary.category == Category::Fun)
        .unwrap();
    assert_close(fun.combined_score, 5.0);
    assert_close(fun.avg_score, 0.6);
    assert_eq!(fun.best_placement, Some(10));
    assert_close(fun.mean_placement.unwrap(), 35.0);

    let humor = top
        .categories
        .iter()
        .find(|summary| summary.category == Category::Humor)
        .unwrap();
    assert_close(humor.combined_score, 0.0);
    assert_eq!(humor.best_placement, None);
}

#[test]
fn test_cross_file_duplicates_are_reported_not_merged_away() {
    let outcome = pipeline_with_duplicates().run(&two_event_batches());

    let report = outcome.duplicates.unwrap();
    assert_eq!(report.identities(), vec![ContributorId(7)]);
    assert_eq!(report.record_count(), 2);
    assert_eq!(outcome.stats.cross_file_duplicates, 1);

    // Both records still count toward the contributor's score
    assert_eq!(outcome.rankings[0].appearance_count, 2);
}

#[test]
fn test_duplicate_report_only_on_request() {
    let outcome = RankingPipeline::default().run(&two_event_batches());
    assert!(outcome.duplicates.is_none());
    assert_eq!(outcome.stats.cross_file_duplicates, 1);
}

#[test]
fn test_tied_scores_share_rank_and_order_by_identity() {
    let batches = vec![batch(
        "ludum_dare_games_50.json",
        vec![
            RecordBuilder::author(30).grade(1, 3.0, 20),
            RecordBuilder::author(20).grade(1, 3.0, 20),
            RecordBuilder::author(10).grade(1, 1.0, 200),
        ],
    )];

    let outcome = RankingPipeline::default().run(&batches);
    let order: Vec<(u32, u64)> = outcome
        .rankings
        .iter()
        .map(|row| (row.rank, row.identity.0))
        .collect();

    assert_eq!(order, vec![(1, 20), (1, 30), (3, 10)]);
}

#[test]
fn test_equal_entries_in_different_order_tie() {
    let batches = vec![batch(
        "ludum_dare_games_50.json",
        vec![
            RecordBuilder::author(1).grade(2, 0.1, 10).cool(3.0),
            RecordBuilder::author(2).grade(2, 1.7, 10).cool(0.7),
            RecordBuilder::author(1).grade(2, 0.2, 10).cool(0.1),
            RecordBuilder::author(2).grade(2, 0.2, 10).cool(0.1),
            RecordBuilder::author(1).grade(2, 1.7, 10).cool(0.7),
            RecordBuilder::author(2).grade(2, 0.1, 10).cool(3.0),
        ],
    )];

    let outcome = RankingPipeline::default().run(&batches);
    let rows = &outcome.rankings;

    assert_eq!(rows[0].composite_score, rows[1].composite_score);
    assert_eq!(
        rows.iter().map(|row| (row.rank, row.identity.0)).collect::<Vec<_>>(),
        vec![(1, 1), (1, 2)]
    );
}

#[test]
fn test_repeated_identity_in_one_record_counts_once() {
    let batches = vec![batch(
        "ludum_dare_games_55.json",
        vec![
            RecordBuilder::with_author(json!("[7, 7]")).grade(2, 4.0, 10),
            RecordBuilder::with_author(json!([8, 7, 8])).grade(2, 4.0, 10),
        ],
    )];

    let outcome = RankingPipeline::default().run(&batches);

    let seven = outcome
        .rankings
        .iter()
        .find(|row| row.identity == ContributorId(7))
        .unwrap();
    assert_eq!(seven.appearance_count, 2);
    assert_eq!(seven.team_sizes, vec![1, 2]);

    let eight = outcome
        .rankings
        .iter()
        .find(|row| row.identity == ContributorId(8))
        .unwrap();
    assert_eq!(eight.appearance_count, 1);
    assert_eq!(outcome.stats.normalization.identity_pairs, 3);
}

#[test]
fn test_unusable_records_are_dropped_and_counted() {
    let batches = vec![batch(
        "ludum_dare_games_51.json",
        vec![
            RecordBuilder::with_author(json!("[broken")),
            RecordBuilder::with_author(json!(0)),
            RecordBuilder::with_author(Value::Null),
            RecordBuilder::author(4).grade(1, 4.0, 5),
        ],
    )];

    let outcome = RankingPipeline::default().run(&batches);

    assert_eq!(outcome.rankings.len(), 1);
    assert_eq!(outcome.rankings[0].identity, ContributorId(4));
    assert_eq!(outcome.stats.normalization.records_seen, 4);
    assert_eq!(outcome.stats.normalization.records_accepted, 1);
    assert_eq!(outcome.stats.normalization.records_dropped, 3);
    assert_eq!(outcome.stats.normalization.malformed_identities, 1);
}

#[test]
fn test_participation_is_capped() {
    let records = (0..7)
        .map(|_| RecordBuilder::author(3).grade(1, 1.0, 500))
        .collect();
    let outcome = RankingPipeline::default().run(&[batch("ludum_dare_games_52.json", records)]);

    let row = &outcome.rankings[0];
    assert_eq!(row.appearance_count, 7);
    assert_close(row.participation_score, 5.0);
}

#[test]
fn test_community_averages_every_engagement_value() {
    let batches = vec![batch(
        "ludum_dare_games_53.json",
        vec![
            RecordBuilder::author(5).cool(10.0).given(20.0),
            RecordBuilder::author(5).cool(4.0),
        ],
    )];

    let outcome = RankingPipeline::default().run(&batches);
    let row = &outcome.rankings[0];

    assert_close(row.community_score, 34.0 / 3.0);
    assert_close(row.performance_score, 0.0);
    // 100 * (0.1 * 2 + 0.1 * 34/3)
    assert_close(row.composite_score, 20.0 + 340.0 / 3.0);
}

#[test]
fn test_extreme_engagement_keeps_scores_finite() {
    let batches = vec![batch(
        "ludum_dare_games_53.json",
        vec![
            RecordBuilder::author(5).cool(1.7e308).given(1.7e308),
            RecordBuilder::author(5).cool(-40.0).given(6.0),
        ],
    )];

    let outcome = RankingPipeline::default().run(&batches);
    let row = &outcome.rankings[0];

    assert_close(row.community_score, 6.0);
    assert!(row.composite_score.is_finite());

    let rendered: Value =
        serde_json::from_str(&output::to_json(&outcome.rankings, false).unwrap()).unwrap();
    assert!(rendered[0]["composite_score"].is_f64());
}

#[test]
fn test_missing_team_size_falls_back_to_identity_count() {
    let batches = vec![batch(
        "ludum_dare_games_54.json",
        vec![RecordBuilder::team(&[1, 2, 3]).grade(2, 3.0, 30)],
    )];

    let outcome = RankingPipeline::default().run(&batches);

    assert_eq!(outcome.rankings.len(), 3);
    for row in &outcome.rankings {
        assert_eq!(row.team_sizes, vec![3]);
        assert_eq!(row.rank, 1);
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let pipeline = pipeline_with_duplicates();
    let first = pipeline.run(&two_event_batches());
    let second = pipeline.run(&two_event_batches());

    assert_eq!(first.rankings, second.rankings);
    assert_eq!(
        output::to_json(&first.rankings, false).unwrap(),
        output::to_json(&second.rankings, false).unwrap()
    );
}

#[tokio::test]
async fn test_parallel_run_matches_sequential_run() {
    let pipeline = pipeline_with_duplicates();

    let sequential = pipeline.run(&two_event_batches());
    let parallel = pipeline.run_parallel(two_event_batches()).await.unwrap();

    assert_eq!(sequential.rankings, parallel.rankings);
    assert_eq!(
        sequential.stats.normalization,
        parallel.stats.normalization
    );
}

#[tokio::test]
async fn test_snapshot_files_end_to_end() {
    let data_dir = tempfile::tempdir().unwrap();
    write_snapshot(
        data_dir.path(),
        "ludum_dare_games_48.json",
        vec![RecordBuilder::author(7).team_size(1).version(48).grade(2, 4.0, 10)],
    );
    write_snapshot(
        data_dir.path(),
        "ludum_dare_games_49.json",
        vec![RecordBuilder::team(&[7, 9]).team_size(2).version(49).grade(2, 2.0, 60)],
    );
    // Neither matches the snapshot pattern
    write_snapshot(data_dir.path(), "other_games_50.json", vec![RecordBuilder::author(1)]);
    std::fs::write(data_dir.path().join("ludum_dare_games_notes.txt"), "notes").unwrap();

    let discovered = discover_sources(data_dir.path(), "ludum_dare_games_", "json")
        .await
        .unwrap();
    let tags: Vec<&str> = discovered.iter().map(|source| source.source_tag()).collect();
    assert_eq!(tags, vec!["ludum_dare_games_48.json", "ludum_dare_games_49.json"]);

    let sources: Vec<Arc<dyn RecordSource>> = discovered
        .into_iter()
        .map(|source| Arc::new(source) as Arc<dyn RecordSource>)
        .collect();
    let batches = load_batches(&sources, 2).await.unwrap();

    let metrics = Arc::new(PipelineMetrics::new().unwrap());
    let outcome = pipeline_with_duplicates()
        .with_metrics(metrics.clone())
        .run_parallel(batches)
        .await
        .unwrap();

    let out_dir = tempfile::tempdir().unwrap();
    let rankings_path = out_dir.path().join("ranked_authors.json");
    let duplicates_path = out_dir.path().join("author_dup.json");
    let legend_path = out_dir.path().join("legend.txt");
    let metrics_path = out_dir.path().join("metrics.prom");

    output::write_rankings(&rankings_path, &outcome.rankings, true)
        .await
        .unwrap();
    output::write_duplicates(&duplicates_path, outcome.duplicates.as_ref().unwrap(), true)
        .await
        .unwrap();
    output::write_legend(&legend_path, &ScoringLegend::current())
        .await
        .unwrap();
    output::write_metrics(&metrics_path, metrics.render().unwrap())
        .await
        .unwrap();

    let rankings: Value =
        serde_json::from_str(&std::fs::read_to_string(&rankings_path).unwrap()).unwrap();
    assert_eq!(rankings[0]["identity"], json!(7));
    assert_eq!(rankings[0]["rank"], json!(1));
    assert_eq!(rankings[1]["identity"], json!(9));
    assert_eq!(
        rankings[0]["source_tags"],
        json!(["ludum_dare_games_48.json", "ludum_dare_games_49.json"])
    );

    let duplicates: Value =
        serde_json::from_str(&std::fs::read_to_string(&duplicates_path).unwrap()).unwrap();
    assert_eq!(duplicates["entries"][0]["identity"], json!(7));

    let legend = std::fs::read_to_string(&legend_path).unwrap();
    assert!(legend.contains("POSITION TIERS:"));

    let exposition = std::fs::read_to_string(&metrics_path).unwrap();
    assert!(exposition.contains("jam_ranker_contributors_ranked 2"));
}

#[tokio::test]
async fn test_missing_data_dir_is_a_discovery_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let error = discover_sources(&missing, "ludum_dare_games_", "json")
        .await
        .unwrap_err();
    assert!(error.to_string().contains("nope"));
}

#[test]
fn test_empty_input_produces_empty_ranking() {
    let outcome = RankingPipeline::default().run(&[]);
    assert!(outcome.rankings.is_empty());
    assert_eq!(outcome.stats.contributors, 0);
}
