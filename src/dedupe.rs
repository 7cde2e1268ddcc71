use chrono::NaiveDate;
use std::collections::HashMap;

use crate::timestamp::day_key;
use crate::types::DateCandidate;

/// Collapse candidates that land on the same local calendar day
///
/// Within a day the candidate with the highest-priority kind wins. On equal
/// kinds the first one seen is kept. Days appear in the order their first
/// candidate appears in the input; callers sort the result themselves.
///
/// # Arguments
/// * `candidates` - Dates of any number of tasks and days
///
/// # Returns
/// One candidate per distinct day
pub fn dedupe_by_day(candidates: Vec<DateCandidate>) -> Vec<DateCandidate> {
    if candidates.len() <= 1 {
        return candidates;
    }

    let mut slots: HashMap<NaiveDate, usize> = HashMap::new();
    let mut kept: Vec<DateCandidate> = Vec::new();

    for candidate in candidates {
        let key = day_key(&candidate.date);
        match slots.get(&key) {
            Some(&idx) => {
                if candidate.kind > kept[idx].kind {
                    kept[idx] = candidate;
                }
            }
            None => {
                slots.insert(key, kept.len());
                kept.push(candidate);
            }
        }
    }

    kept
}
