use chrono::{DateTime, Utc};

use crate::models::Post;

/// Flat recency bonus for posts made in the viewer's own hallway, in hours.
/// A post from another hallway outranks a same-hallway post only once it is
/// more than this many hours fresher.
const SAME_HALLWAY_BONUS_HOURS: i64 = 36;

/// Order posts for one viewer: newest first, with posts from the viewer's
/// hallway boosted by a flat bonus. `None` means no hallway preference
/// (pure recency).
///
/// Every post is scored against the single anchor `now`, which makes the
/// order a strict weak ordering; scoring pairs against each other instead
/// would not be guaranteed transitive. Ties on score prefer the viewer's
/// hallway, then keep the incoming order (the sort is stable).
pub fn rank(viewer_hallway: Option<&str>, now: DateTime<Utc>, mut posts: Vec<Post>) -> Vec<Post> {
    match viewer_hallway {
        Some(hallway) => {
            posts.sort_by(|a, b| {
                let key_a = (score(a, hallway, now), a.hallway == hallway);
                let key_b = (score(b, hallway, now), b.hallway == hallway);
                key_b.cmp(&key_a)
            });
        }
        None => {
            posts.sort_by_key(|post| age_in_hours(post.created_at, now));
        }
    }
    posts
}

fn score(post: &Post, viewer_hallway: &str, now: DateTime<Utc>) -> i64 {
    let recency = -age_in_hours(post.created_at, now);
    if post.hallway == viewer_hallway {
        recency + SAME_HALLWAY_BONUS_HOURS
    } else {
        recency
    }
}

/// Age rounded to the nearest whole hour.
fn age_in_hours(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ((now - timestamp).num_minutes() as f64 / 60.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn post(hours_old: i64, hallway: &str) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: format!("post from {hallway}"),
            body: "body".to_string(),
            category: "general".to_string(),
            author_id: Uuid::new_v4(),
            hallway: hallway.to_string(),
            location: "noord".to_string(),
            comment_ids: vec![],
            deleted: false,
            created_at: anchor() - Duration::hours(hours_old),
        }
    }

    #[test]
    fn empty_and_single_inputs_pass_through() {
        assert!(rank(Some("2a"), anchor(), vec![]).is_empty());

        let only = post(5, "2a");
        let ranked = rank(Some("2a"), anchor(), vec![only.clone()]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, only.id);
    }

    #[test]
    fn same_hallway_bonus_beats_moderate_recency_gap() {
        // 36h bonus dominates a 29h recency gap
        let near = post(30, "2b");
        let mine = post(1, "2a");
        let ranked = rank(Some("2a"), anchor(), vec![near.clone(), mine.clone()]);
        assert_eq!(ranked[0].id, mine.id);
        assert_eq!(ranked[1].id, near.id);
    }

    #[test]
    fn recency_beats_bonus_past_the_threshold() {
        // 39h recency gap exceeds the 36h bonus
        let mine = post(40, "2a");
        let fresh = post(1, "2b");
        let ranked = rank(Some("2a"), anchor(), vec![mine.clone(), fresh.clone()]);
        assert_eq!(ranked[0].id, fresh.id);
        assert_eq!(ranked[1].id, mine.id);
    }

    #[test]
    fn no_hallway_means_pure_recency() {
        let old_mine = post(20, "2a");
        let fresh_other = post(2, "2b");
        let middle = post(10, "2c");
        let ranked = rank(
            None,
            anchor(),
            vec![old_mine.clone(), fresh_other.clone(), middle.clone()],
        );
        assert_eq!(ranked[0].id, fresh_other.id);
        assert_eq!(ranked[1].id, middle.id);
        assert_eq!(ranked[2].id, old_mine.id);
    }

    #[test]
    fn score_tie_prefers_viewer_hallway() {
        // 0h elsewhere scores 0; 36h in the viewer's hallway also scores 0
        let fresh_other = post(0, "2b");
        let old_mine = post(36, "2a");
        let ranked = rank(Some("2a"), anchor(), vec![fresh_other.clone(), old_mine.clone()]);
        assert_eq!(ranked[0].id, old_mine.id);
        assert_eq!(ranked[1].id, fresh_other.id);
    }

    #[test]
    fn ranking_is_deterministic() {
        let posts = vec![post(3, "2a"), post(50, "2b"), post(12, "2a"), post(1, "2c")];
        let first = rank(Some("2a"), anchor(), posts.clone());
        let second = rank(Some("2a"), anchor(), posts);
        let first_ids: Vec<_> = first.iter().map(|p| p.id).collect();
        let second_ids: Vec<_> = second.iter().map(|p| p.id).collect();
        assert_eq!(first_ids, second_ids);

        // Re-ranking the ranked output changes nothing
        let again = rank(Some("2a"), anchor(), first.clone());
        let again_ids: Vec<_> = again.iter().map(|p| p.id).collect();
        assert_eq!(first_ids, again_ids);
    }

    #[test]
    fn mixed_hallways_order_consistently() {
        // Three posts spanning both sides of the bonus threshold
        let a = post(2, "2a"); // score 34
        let b = post(10, "2b"); // score -10
        let c = post(44, "2a"); // score -8
        let ranked = rank(Some("2a"), anchor(), vec![b.clone(), c.clone(), a.clone()]);
        assert_eq!(ranked[0].id, a.id);
        assert_eq!(ranked[1].id, c.id);
        assert_eq!(ranked[2].id, b.id);
    }

    #[test]
    fn ages_round_to_nearest_hour() {
        assert_eq!(age_in_hours(anchor() - Duration::minutes(29), anchor()), 0);
        assert_eq!(age_in_hours(anchor() - Duration::minutes(31), anchor()), 1);
        assert_eq!(age_in_hours(anchor() - Duration::minutes(90), anchor()), 2);
    }
}
