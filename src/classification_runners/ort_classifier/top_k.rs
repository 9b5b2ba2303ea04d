use crate::common::ClassificationResult;

/// Picks at most `k` entries with confidence `>= threshold`, highest first.
///
/// Only the first `min(probs.len(), labels.len())` entries are considered. Ties keep
/// the earlier index first. When nothing reaches the threshold, the single highest
/// entry is returned instead, so the result is empty only when there is nothing to rank.
pub fn top_k(probs: &[f32], labels: &[String], k: usize, threshold: f32) -> Vec<ClassificationResult> {
    let valid = probs.len().min(labels.len());
    let probs = &probs[..valid];

    let mut candidates: Vec<(usize, f32)> = probs
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, confidence)| confidence >= threshold)
        .collect();

    if candidates.is_empty() {
        return argmax(probs)
            .map(|(i, confidence)| vec![ClassificationResult::new(i, &labels[i], confidence)])
            .unwrap_or_default();
    }

    // stable: equal confidences stay in index order
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates.truncate(k);

    candidates
        .into_iter()
        .map(|(i, confidence)| ClassificationResult::new(i, &labels[i], confidence))
        .collect()
}

fn argmax(probs: &[f32]) -> Option<(usize, f32)> {
    let (&first, rest) = probs.split_first()?;
    let mut best = (0, first);
    for (i, &confidence) in rest.iter().enumerate() {
        if confidence > best.1 {
            best = (i + 1, confidence);
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        ["Harmful", "Kitchen", "Other", "Recyclable"].iter().map(|x| x.to_string()).collect()
    }

    fn pairs(results: &[ClassificationResult]) -> Vec<(&str, f32)> {
        results.iter().map(|r| (r.label.as_str(), r.confidence)).collect()
    }

    #[test]
    fn keeps_only_entries_over_threshold() {
        let results = top_k(&[0.05, 0.82, 0.02, 0.11], &labels(), 3, 0.1);
        assert_eq!(pairs(&results), vec![("Kitchen", 0.82), ("Recyclable", 0.11)]);
        assert_eq!(results[0].class_id, Some(1));
    }

    #[test]
    fn falls_back_to_global_max() {
        let results = top_k(&[0.05, 0.02, 0.03, 0.01], &labels(), 3, 0.1);
        assert_eq!(pairs(&results), vec![("Harmful", 0.05)]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let results = top_k(&[0.1, 0.0, 0.0, 0.0], &labels(), 3, 0.1);
        assert_eq!(pairs(&results), vec![("Harmful", 0.1)]);
    }

    #[test]
    fn truncates_to_k_highest() {
        let results = top_k(&[0.3, 0.4, 0.2, 0.5], &labels(), 3, 0.1);
        assert_eq!(pairs(&results), vec![("Recyclable", 0.5), ("Kitchen", 0.4), ("Harmful", 0.3)]);
    }

    #[test]
    fn ties_keep_first_seen() {
        let results = top_k(&[0.25, 0.25, 0.25, 0.25], &labels(), 3, 0.1);
        let ids: Vec<_> = results.iter().map(|r| r.class_id.unwrap()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn mismatched_lengths_use_the_shorter() {
        // more outputs than labels
        let results = top_k(&[0.1, 0.2, 0.3, 0.4, 0.9, 0.8], &labels(), 3, 0.1);
        assert!(results.iter().all(|r| r.class_id.unwrap() < 4));
        assert_eq!(results[0].label, "Recyclable");

        // more labels than outputs
        let results = top_k(&[0.01, 0.02], &labels(), 3, 0.1);
        assert_eq!(pairs(&results), vec![("Kitchen", 0.02)]);
    }

    #[test]
    fn empty_input_gives_empty_result() {
        assert!(top_k(&[], &labels(), 3, 0.1).is_empty());
        assert!(top_k(&[0.9], &[], 3, 0.1).is_empty());
    }

    #[test]
    fn nan_is_never_a_candidate() {
        let results = top_k(&[f32::NAN, 0.5, f32::NAN, 0.05], &labels(), 3, 0.1);
        assert_eq!(pairs(&results), vec![("Kitchen", 0.5)]);
    }
}
