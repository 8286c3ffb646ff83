use recite_core::model::ScoreBand;

/// CSS class for a score band.
#[must_use]
pub fn band_class(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::High => "score-high",
        ScoreBand::Mid => "score-mid",
        ScoreBand::Low => "score-low",
    }
}

/// `correct/total (pct%)`
#[must_use]
pub fn score_label(correct: u32, total: u32, percentage: u32) -> String {
    format!("{correct}/{total} ({percentage}%)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries_map_to_classes() {
        assert_eq!(band_class(ScoreBand::from_percentage(80)), "score-high");
        assert_eq!(band_class(ScoreBand::from_percentage(79)), "score-mid");
        assert_eq!(band_class(ScoreBand::from_percentage(50)), "score-mid");
        assert_eq!(band_class(ScoreBand::from_percentage(49)), "score-low");
    }
}
