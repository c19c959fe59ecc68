//! Free-text relevance scoring for FAQ search.
//!
//! Scoring: 10 points per distinct matching token, a 50 point bonus when
//! any token hits the question text, plus the entry's view counter.

use models::faq;

use crate::errors::ServiceError;

const MIN_QUERY_LEN: usize = 3;
const MIN_TOKEN_LEN: usize = 3;
const TOKEN_POINTS: i64 = 10;
const QUESTION_BONUS: i64 = 50;

/// Lowercased search tokens from a raw query string.
///
/// Rejects queries shorter than three characters after trimming and queries
/// where no token of at least three characters survives the split.
pub fn parse_query(q: &str) -> Result<Vec<String>, ServiceError> {
    let trimmed = q.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN {
        return Err(ServiceError::Validation(format!(
            "query must be at least {MIN_QUERY_LEN} characters"
        )));
    }
    let tokens: Vec<String> = trimmed
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(|t| t.to_lowercase())
        .collect();
    if tokens.is_empty() {
        return Err(ServiceError::Validation(format!(
            "query needs at least one token of {MIN_TOKEN_LEN}+ characters"
        )));
    }
    Ok(tokens)
}

/// Relevance score for one entry, or `None` when no token matches.
///
/// A token matches when it appears as a case-insensitive substring of the
/// question, the answer, or the serialized keyword list.
pub fn score(tokens: &[String], entry: &faq::Model) -> Option<i64> {
    let question = entry.question.to_lowercase();
    let answer = entry.answer.to_lowercase();
    let keywords = entry.keywords.to_string().to_lowercase();

    let mut matched = 0i64;
    let mut question_hit = false;
    for token in tokens {
        let in_question = question.contains(token.as_str());
        let in_answer = answer.contains(token.as_str());
        let in_keywords = keywords.contains(token.as_str());
        if in_question || in_answer || in_keywords {
            matched += 1;
        }
        if in_question {
            question_hit = true;
        }
    }
    if matched == 0 {
        return None;
    }
    let bonus = if question_hit { QUESTION_BONUS } else { 0 };
    Some(matched * TOKEN_POINTS + bonus + entry.view_count as i64)
}

/// Score and order candidates, best first. Ties keep no particular order.
pub fn rank(tokens: &[String], candidates: Vec<faq::Model>) -> Vec<faq::Model> {
    let mut scored: Vec<(i64, faq::Model)> = candidates
        .into_iter()
        .filter_map(|entry| score(tokens, &entry).map(|s| (s, entry)))
        .collect();
    scored.sort_unstable_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, entry)| entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn entry(question: &str, answer: &str, keywords: serde_json::Value, views: i32) -> faq::Model {
        faq::Model {
            id: Uuid::new_v4(),
            question: question.into(),
            answer: answer.into(),
            keywords,
            view_count: views,
            published: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn short_query_rejected() {
        assert!(parse_query("  ab ").is_err());
        assert!(parse_query("").is_err());
    }

    #[test]
    fn query_with_only_short_tokens_rejected() {
        // long enough overall, but every token is under three characters
        assert!(parse_query("a b cd").is_err());
    }

    #[test]
    fn tokens_are_lowercased_and_filtered() {
        let tokens = parse_query("  Fix MY leaky   TAP ").unwrap();
        assert_eq!(tokens, vec!["fix", "leaky", "tap"]);
    }

    #[test]
    fn no_match_scores_none() {
        let e = entry("How to pay?", "Use the portal.", serde_json::json!(["billing"]), 9);
        assert_eq!(score(&["plumber".into()], &e), None);
    }

    #[test]
    fn question_match_gets_bonus() {
        let e = entry("How do I book a plumber?", "From the provider page.", serde_json::json!([]), 0);
        // one token, question hit: 10 + 50
        assert_eq!(score(&["plumber".into()], &e), Some(60));
    }

    #[test]
    fn answer_only_match_has_no_bonus() {
        let e = entry("How do I book?", "Ask any plumber listed.", serde_json::json!([]), 3);
        // one token, no question hit: 10 + views
        assert_eq!(score(&["plumber".into()], &e), Some(13));
    }

    #[test]
    fn keyword_match_counts() {
        let e = entry("Payment options", "Cards only.", serde_json::json!(["invoice", "billing"]), 0);
        assert_eq!(score(&["billing".into()], &e), Some(10));
    }

    #[test]
    fn distinct_tokens_accumulate() {
        let e = entry("Cancel a booking", "Open your booking and press cancel.", serde_json::json!([]), 5);
        // both tokens match, question hit: 2*10 + 50 + 5
        assert_eq!(score(&["cancel".into(), "booking".into()], &e), Some(75));
    }

    #[test]
    fn rank_orders_by_score_desc_and_drops_non_matches() {
        let high = entry("Plumber rates", "Hourly.", serde_json::json!([]), 100);
        let low = entry("Electrician rates", "Hourly, plumber referrals too.", serde_json::json!([]), 0);
        let none = entry("Unrelated", "Nothing here.", serde_json::json!([]), 50);
        let ranked = rank(&["plumber".into()], vec![low.clone(), none, high.clone()]);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, high.id);
        assert_eq!(ranked[1].id, low.id);
    }

    #[test]
    fn popularity_breaks_equal_text_matches() {
        let popular = entry("Service area", "Cities we cover.", serde_json::json!([]), 40);
        let fresh = entry("Service area", "Cities we cover.", serde_json::json!([]), 2);
        let ranked = rank(&["service".into()], vec![fresh.clone(), popular.clone()]);
        assert_eq!(ranked[0].id, popular.id);
        assert_eq!(ranked[1].id, fresh.id);
    }
}
