//! Pure response-to-view transforms.
//!
//! Everything here is deterministic: functions that stamp a time take `now`
//! as a parameter. Missing optional text never fails a transform; it falls
//! back to a fixed placeholder so cards always render complete.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use stratwatch_client::types::{
    ArticleDetail, PipelineStatus, RecentAnalysis, StorySummary, ThreadConnection,
};
use stratwatch_common::types::{
    ConnectedStory, DashboardStats, ImportanceLevel, SourceRef, StoryCard, StrategicDimensions,
    StrategicThread, TimelineEvent,
};

const NO_IMPACT: &str = "No impact analysis available";
const NO_TIMING: &str = "No timing analysis available";
const NO_PLAYERS: &str = "No players analysis available";
const NO_PRECEDENT: &str = "No precedent analysis available";
const NO_TAKEAWAY: &str = "No strategic takeaway available";
const UNTITLED: &str = "Untitled";
const FALLBACK_URL: &str = "#";

/// Source name synthesized for aggregate-endpoint stories, which carry no
/// source records of their own.
const SYNTHETIC_SOURCE_NAME: &str = "Strategic Analysis";

/// Excerpts are cut at a hard character count, not a word boundary.
const EXCERPT_MAX_CHARS: usize = 100;

/// No endpoint reports a monitored-source count yet. Placeholder, not an
/// invariant.
const SOURCES_MONITORED_PLACEHOLDER: u32 = 156;

/// Connections without a `connection_type` label are bucketed positionally
/// in batches of this size.
const FALLBACK_BUCKET_SIZE: usize = 3;

fn text_or(value: &Option<String>, fallback: &str) -> String {
    match value {
        Some(s) if !s.is_empty() => s.clone(),
        _ => fallback.to_string(),
    }
}

fn parse_timestamp(value: &Option<String>, now: DateTime<Utc>) -> DateTime<Utc> {
    value
        .as_deref()
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now)
}

/// First 100 characters plus `...` when the text runs longer; the full text
/// verbatim otherwise. May split mid-word.
pub fn excerpt(text: &str) -> String {
    if text.chars().count() > EXCERPT_MAX_CHARS {
        let mut cut: String = text.chars().take(EXCERPT_MAX_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// Stable 32-bit string hash rendered as a decimal string.
///
/// Thread connections arrive without story identifiers, so story references
/// are derived from titles. The exact arithmetic (`(hash << 5) - hash +
/// unit` over UTF-16 code units with 32-bit wraparound, then absolute
/// value) is a compatibility contract with existing dashboard data: thread
/// story ids only match story ids when the same titles recur.
pub fn title_hash(title: &str) -> String {
    let mut hash: i32 = 0;
    for unit in title.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs().to_string()
}

fn dimensions(
    impact: &Option<String>,
    timing: &Option<String>,
    players: &Option<String>,
    precedent: &Option<String>,
) -> StrategicDimensions {
    StrategicDimensions {
        impact: text_or(impact, NO_IMPACT),
        timing: text_or(timing, NO_TIMING),
        players: text_or(players, NO_PLAYERS),
        precedent: text_or(precedent, NO_PRECEDENT),
    }
}

/// Build a story card from the aggregate payload.
///
/// The aggregate endpoint carries no nested connections or source records,
/// so the card gets an empty connected-stories list and exactly one
/// synthesized source whose id mirrors the story id.
pub fn story_card_from_summary(story: &StorySummary, now: DateTime<Utc>) -> StoryCard {
    let takeaway = text_or(&story.strategic_takeaway, NO_TAKEAWAY);
    let published_at = parse_timestamp(&story.publish_date, now);

    StoryCard {
        id: story.id.clone(),
        title: text_or(&story.title, UNTITLED),
        importance: ImportanceLevel::from_label(story.importance_level.as_deref()),
        strategic_dimensions: dimensions(
            &story.impact_analysis,
            &story.timing_analysis,
            &story.players_analysis,
            &story.precedent_analysis,
        ),
        connected_stories: Vec::new(),
        sources: vec![SourceRef {
            id: story.id.clone(),
            name: SYNTHETIC_SOURCE_NAME.to_string(),
            url: text_or(&story.url, FALLBACK_URL),
            excerpt: excerpt(&takeaway),
            published_at,
        }],
        strategic_takeaway: takeaway,
        published_at,
        score: story.importance_score.unwrap_or(0.0),
    }
}

/// Build a story card from the detail endpoint, the only payload with
/// nested connections. The detail connections carry no dates or importance,
/// so those fields are generic until the backend supplies them.
pub fn story_card_from_detail(article: &ArticleDetail, now: DateTime<Utc>) -> StoryCard {
    let takeaway = text_or(&article.strategic_takeaway, NO_TAKEAWAY);
    let published_at = parse_timestamp(&article.publish_date, now);

    let connected_stories = article
        .connections
        .iter()
        .map(|conn| ConnectedStory {
            id: conn.connected_id.clone(),
            title: conn.connected_title.clone(),
            relative_time: "Recently".to_string(),
            exact_date: now.date_naive(),
            importance: ImportanceLevel::Medium,
        })
        .collect();

    StoryCard {
        id: article.id.clone(),
        title: text_or(&article.title, UNTITLED),
        importance: ImportanceLevel::from_label(article.importance_level.as_deref()),
        strategic_dimensions: dimensions(
            &article.impact_analysis,
            &article.timing_analysis,
            &article.players_analysis,
            &article.precedent_analysis,
        ),
        connected_stories,
        sources: vec![SourceRef {
            id: article.id.clone(),
            name: SYNTHETIC_SOURCE_NAME.to_string(),
            url: text_or(&article.url, FALLBACK_URL),
            excerpt: excerpt(&takeaway),
            published_at,
        }],
        strategic_takeaway: takeaway,
        published_at,
        score: article.importance_score.unwrap_or(0.0),
    }
}

/// Group flat pairwise connections into strategic threads.
///
/// Records bucket by `connection_type`; unlabeled records fall back to
/// positional batches of three (`thread-{n}`), so emission is deterministic
/// for a given input order. Thread strength is the arithmetic mean of the
/// bucket's relationship strengths. Timeline dates walk backwards one day
/// per record from `now`.
pub fn threads_from_connections(
    connections: &[ThreadConnection],
    now: DateTime<Utc>,
) -> Vec<StrategicThread> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<&ThreadConnection>> = HashMap::new();

    for (index, conn) in connections.iter().enumerate() {
        let key = match &conn.connection_type {
            Some(label) if !label.is_empty() => label.clone(),
            _ => format!("thread-{}", index / FALLBACK_BUCKET_SIZE),
        };
        if let Some(bucket) = buckets.get_mut(&key) {
            bucket.push(conn);
        } else {
            order.push(key.clone());
            buckets.insert(key, vec![conn]);
        }
    }

    order
        .iter()
        .enumerate()
        .map(|(position, key)| {
            let bucket = &buckets[key];

            let mut story_ids: Vec<String> = Vec::new();
            for conn in bucket {
                push_unique(&mut story_ids, title_hash(&conn.primary_title));
                push_unique(&mut story_ids, title_hash(&conn.connected_title));
            }

            let strength = bucket
                .iter()
                .map(|conn| conn.relationship_strength)
                .sum::<f64>()
                / bucket.len() as f64;

            let title = bucket[0]
                .connection_type
                .clone()
                .filter(|label| !label.is_empty())
                .unwrap_or_else(|| format!("Strategic Thread {}", position + 1));

            let timeline_events = bucket
                .iter()
                .enumerate()
                .map(|(idx, conn)| TimelineEvent {
                    date: now - Duration::days(idx as i64),
                    event: format!("{} connects to {}", conn.primary_title, conn.connected_title),
                    story_id: title_hash(&conn.primary_title),
                })
                .collect();

            StrategicThread {
                id: key.clone(),
                title,
                story_ids,
                timeline_events,
                strength,
            }
        })
        .collect()
}

fn push_unique(ids: &mut Vec<String>, id: String) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

/// Fold pipeline counters and the recent-analysis list into dashboard stats.
pub fn stats_from_status(
    status: &PipelineStatus,
    recent_analysis: &[RecentAnalysis],
    now: DateTime<Utc>,
) -> DashboardStats {
    DashboardStats {
        total_stories_analyzed: recent_analysis.len() as u64,
        sources_monitored: SOURCES_MONITORED_PLACEHOLDER,
        alerts_count: status.active_sessions,
        last_update_time: DateTime::from_timestamp(status.last_update, 0).unwrap_or(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratwatch_client::types::ArticleConnection;

    fn summary(takeaway: Option<&str>) -> StorySummary {
        StorySummary {
            id: "s1".to_string(),
            title: Some("OpenAI Acquires Leading Chip Design Team from Google".to_string()),
            strategic_takeaway: takeaway.map(str::to_string),
            importance_level: Some("HIGH".to_string()),
            importance_score: Some(91.0),
            publish_date: Some("2025-06-20T06:00:00Z".to_string()),
            url: Some("https://example.com/s1".to_string()),
            ..Default::default()
        }
    }

    fn conn(primary: &str, connected: &str, strength: f64, label: Option<&str>) -> ThreadConnection {
        ThreadConnection {
            primary_title: primary.to_string(),
            connected_title: connected.to_string(),
            relationship_strength: strength,
            connection_type: label.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn long_takeaway_is_cut_to_exactly_103_chars() {
        let takeaway = "x".repeat(250);
        let cut = excerpt(&takeaway);
        assert_eq!(cut.chars().count(), 103);
        assert!(cut.ends_with("..."));
        assert_eq!(&cut[..100], &takeaway[..100]);
    }

    #[test]
    fn short_takeaway_is_used_verbatim() {
        assert_eq!(excerpt("short and sweet"), "short and sweet");
        let exactly_100 = "y".repeat(100);
        assert_eq!(excerpt(&exactly_100), exactly_100);
    }

    #[test]
    fn title_hash_is_deterministic() {
        let title = "OpenAI Acquires Leading Chip Design Team from Google";
        assert_eq!(title_hash(title), title_hash(title));
        assert!(title_hash(title).chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn title_hash_known_values() {
        // 'A' = 65, 'B' = 66: 65 * 31 + 66 = 2081.
        assert_eq!(title_hash("AB"), "2081");
        assert_eq!(title_hash(""), "0");
    }

    #[test]
    fn missing_text_fields_fall_back_to_placeholders() {
        let now = Utc::now();
        let card = story_card_from_summary(&StorySummary::default(), now);

        assert_eq!(card.title, "Untitled");
        assert_eq!(card.strategic_takeaway, "No strategic takeaway available");
        assert_eq!(card.strategic_dimensions.impact, "No impact analysis available");
        assert_eq!(card.strategic_dimensions.timing, "No timing analysis available");
        assert_eq!(card.strategic_dimensions.players, "No players analysis available");
        assert_eq!(card.strategic_dimensions.precedent, "No precedent analysis available");
        assert_eq!(card.importance, ImportanceLevel::Medium);
        assert_eq!(card.score, 0.0);
        assert_eq!(card.published_at, now);
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let now = Utc::now();
        let story = StorySummary {
            impact_analysis: Some(String::new()),
            title: Some(String::new()),
            ..Default::default()
        };
        let card = story_card_from_summary(&story, now);
        assert_eq!(card.title, "Untitled");
        assert_eq!(card.strategic_dimensions.impact, "No impact analysis available");
    }

    #[test]
    fn summary_card_synthesizes_one_source_and_no_connections() {
        let card = story_card_from_summary(&summary(Some("A short takeaway")), Utc::now());

        assert!(card.connected_stories.is_empty());
        assert_eq!(card.sources.len(), 1);
        assert_eq!(card.sources[0].id, card.id);
        assert_eq!(card.sources[0].name, "Strategic Analysis");
        assert_eq!(card.sources[0].excerpt, "A short takeaway");
        assert_eq!(card.importance, ImportanceLevel::High);
        assert_eq!(card.score, 91.0);
    }

    #[test]
    fn detail_card_maps_connections() {
        let article = ArticleDetail {
            id: "s1".to_string(),
            title: Some("Model training pact".to_string()),
            connections: vec![ArticleConnection {
                connected_title: "Datacenter buildout".to_string(),
                connected_id: "s9".to_string(),
                relationship_strength: 0.8,
                connection_type: Some("Compute Race".to_string()),
                connected_takeaway: None,
            }],
            ..Default::default()
        };

        let now = Utc::now();
        let card = story_card_from_detail(&article, now);
        assert_eq!(card.connected_stories.len(), 1);
        assert_eq!(card.connected_stories[0].id, "s9");
        assert_eq!(card.connected_stories[0].title, "Datacenter buildout");
        assert_eq!(card.connected_stories[0].exact_date, now.date_naive());
    }

    #[test]
    fn labeled_connections_bucket_by_type() {
        let now = Utc::now();
        let threads = threads_from_connections(
            &[
                conn("A", "B", 0.9, Some("Compute Race")),
                conn("C", "D", 0.7, Some("Talent Wars")),
                conn("A", "E", 0.5, Some("Compute Race")),
            ],
            now,
        );

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].id, "Compute Race");
        assert_eq!(threads[0].title, "Compute Race");
        assert_eq!(threads[0].timeline_events.len(), 2);
        assert_eq!(threads[1].id, "Talent Wars");
    }

    #[test]
    fn thread_strength_is_the_bucket_mean() {
        let now = Utc::now();
        let threads = threads_from_connections(
            &[
                conn("A", "B", 0.9, Some("Compute Race")),
                conn("C", "D", 0.7, Some("Compute Race")),
                conn("E", "F", 0.5, Some("Compute Race")),
            ],
            now,
        );

        assert_eq!(threads.len(), 1);
        assert!((threads[0].strength - 0.7).abs() < 1e-9);
        assert!(threads[0].strength >= 0.0 && threads[0].strength <= 1.0);
    }

    #[test]
    fn unlabeled_connections_bucket_in_batches_of_three() {
        let now = Utc::now();
        let connections: Vec<ThreadConnection> = (0..7)
            .map(|i| conn(&format!("P{i}"), &format!("C{i}"), 0.5, None))
            .collect();
        let threads = threads_from_connections(&connections, now);

        assert_eq!(threads.len(), 3);
        assert_eq!(threads[0].id, "thread-0");
        assert_eq!(threads[0].title, "Strategic Thread 1");
        assert_eq!(threads[0].timeline_events.len(), 3);
        assert_eq!(threads[1].id, "thread-1");
        assert_eq!(threads[1].title, "Strategic Thread 2");
        assert_eq!(threads[2].id, "thread-2");
        assert_eq!(threads[2].timeline_events.len(), 1);
    }

    #[test]
    fn empty_type_labels_use_the_positional_fallback() {
        let now = Utc::now();
        let threads = threads_from_connections(&[conn("A", "B", 0.4, Some(""))], now);
        assert_eq!(threads[0].id, "thread-0");
        assert_eq!(threads[0].title, "Strategic Thread 1");
    }

    #[test]
    fn story_ids_are_hashed_titles_deduplicated_in_order() {
        let now = Utc::now();
        let threads = threads_from_connections(
            &[
                conn("A", "B", 0.9, Some("Compute Race")),
                conn("A", "C", 0.7, Some("Compute Race")),
            ],
            now,
        );

        let expected = vec![title_hash("A"), title_hash("B"), title_hash("C")];
        assert_eq!(threads[0].story_ids, expected);
    }

    #[test]
    fn timeline_dates_walk_backwards_from_now() {
        let now = Utc::now();
        let threads = threads_from_connections(
            &[
                conn("A", "B", 0.9, Some("Compute Race")),
                conn("C", "D", 0.7, Some("Compute Race")),
            ],
            now,
        );

        let events = &threads[0].timeline_events;
        assert_eq!(events[0].date, now);
        assert_eq!(events[1].date, now - Duration::days(1));
        assert_eq!(events[0].event, "A connects to B");
        assert_eq!(events[0].story_id, title_hash("A"));
    }

    #[test]
    fn no_connections_yield_no_threads() {
        assert!(threads_from_connections(&[], Utc::now()).is_empty());
    }

    #[test]
    fn stats_fold_counters_and_epoch_seconds() {
        let now = Utc::now();
        let status = PipelineStatus {
            active_sessions: 3,
            articles_in_pipeline: 12,
            last_update: 1_750_000_000,
        };
        let recent = vec![RecentAnalysis::default(), RecentAnalysis::default()];

        let stats = stats_from_status(&status, &recent, now);
        assert_eq!(stats.total_stories_analyzed, 2);
        assert_eq!(stats.alerts_count, 3);
        assert_eq!(stats.sources_monitored, 156);
        assert_eq!(stats.last_update_time.timestamp(), 1_750_000_000);
    }
}
