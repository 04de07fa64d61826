use crate::domain::Title;

/// Global rating/vote calibration: `C` (mean rating) and `M` (90th
/// percentile vote count, the Bayesian smoothing floor used downstream).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub c: f64,
    pub m: i64,
}

/// Scans every title with both `imdb_rating` and `imdb_votes` present and
/// computes the mean rating and 90th-percentile vote count.
///
/// If no title qualifies, returns `C = 0.0, M = 1` per the empty-input
/// contract; the caller is responsible for emitting the diagnostic.
pub fn calibrate(titles: &[Title]) -> Calibration {
    let mut votes: Vec<i64> = Vec::new();
    let mut rating_sum = 0.0f64;
    let mut rating_count = 0usize;

    for title in titles {
        let (Some(rating), Some(vote_count)) = (title.imdb_rating, title.imdb_votes) else {
            continue;
        };
        rating_sum += rating;
        rating_count += 1;
        votes.push(vote_count);
    }

    if votes.is_empty() {
        return Calibration { c: 0.0, m: 1 };
    }

    let c = rating_sum / rating_count as f64;

    votes.sort_unstable();
    let n = votes.len();
    let idx = ((0.9 * n as f64) as usize).saturating_sub(1);
    let idx = idx.min(n - 1);
    let mut m = votes[idx];
    if m <= 0 {
        m = 1;
    }

    Calibration { c, m }
}
