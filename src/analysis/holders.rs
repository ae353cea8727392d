use std::fmt;

use serde::Deserialize;

/// One entry of a token's top-holder list. `pct` is the share of total
/// supply in percent; sources that only report raw amounts leave it at zero
/// and the scanner derives it from the supply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolderBalance {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub pct: f64,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcentrationRisk {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl fmt::Display for ConcentrationRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::VeryHigh => "VERY HIGH",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct HolderSummary {
    pub total_holders: u64,
    pub top5_pct: f64,
    pub top10_pct: f64,
    pub top20_pct: f64,
    pub top50_pct: f64,
    pub largest_holder_pct: f64,
    pub gini_coefficient: f64,
    pub risk: ConcentrationRisk,
}

pub fn summarize_holders(total_holders: u64, top_holders: &[HolderBalance]) -> Option<HolderSummary> {
    if top_holders.is_empty() {
        return None;
    }

    let top_pct = |n: usize| top_holders.iter().take(n).map(|h| h.pct).sum::<f64>();
    let top50 = top_pct(50);

    Some(HolderSummary {
        total_holders,
        top5_pct: top_pct(5),
        top10_pct: top_pct(10),
        top20_pct: top_pct(20),
        top50_pct: top50,
        largest_holder_pct: top_holders[0].pct,
        gini_coefficient: gini_coefficient(top_holders),
        risk: concentration_risk(top50 / 100.0),
    })
}

pub fn concentration_risk(top50_ratio: f64) -> ConcentrationRisk {
    if top50_ratio > 0.8 {
        ConcentrationRisk::VeryHigh
    } else if top50_ratio > 0.6 {
        ConcentrationRisk::High
    } else if top50_ratio > 0.4 {
        ConcentrationRisk::Medium
    } else {
        ConcentrationRisk::Low
    }
}

/// Gini coefficient over the holder shares: 0 = evenly spread, 1 = a single
/// wallet holds everything.
pub fn gini_coefficient(holders: &[HolderBalance]) -> f64 {
    if holders.is_empty() {
        return 0.0;
    }

    let mut shares: Vec<f64> = holders.iter().map(|h| h.pct).collect();
    shares.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = shares.len() as f64;
    let total: f64 = shares.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = shares
        .iter()
        .enumerate()
        .map(|(i, share)| (i as f64 + 1.0) * share)
        .sum();

    (2.0 * weighted) / (n * total) - (n + 1.0) / n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holders(pcts: &[f64]) -> Vec<HolderBalance> {
        pcts.iter()
            .map(|&pct| HolderBalance {
                pct,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_concentration_risk_boundaries() {
        assert_eq!(concentration_risk(0.4), ConcentrationRisk::Low);
        assert_eq!(concentration_risk(0.41), ConcentrationRisk::Medium);
        assert_eq!(concentration_risk(0.61), ConcentrationRisk::High);
        assert_eq!(concentration_risk(0.81), ConcentrationRisk::VeryHigh);
    }

    #[test]
    fn test_gini_extremes() {
        assert_eq!(gini_coefficient(&[]), 0.0);
        assert_eq!(gini_coefficient(&holders(&[0.0, 0.0])), 0.0);

        // Perfectly even split tends to zero.
        let even = gini_coefficient(&holders(&[25.0, 25.0, 25.0, 25.0]));
        assert!(even.abs() < 0.26, "even split should score low, got {even}");

        // One whale dominating tends toward 1.
        let whale = gini_coefficient(&holders(&[0.01, 0.01, 0.01, 99.0]));
        assert!(whale > 0.7, "whale split should score high, got {whale}");
    }

    #[test]
    fn test_summarize_empty_holder_list() {
        assert!(summarize_holders(0, &[]).is_none());
    }

    #[test]
    fn test_summarize_groups_and_risk() {
        let list = holders(&[40.0, 20.0, 15.0, 5.0, 3.0, 2.0]);
        let summary = summarize_holders(120, &list).unwrap();

        assert_eq!(summary.total_holders, 120);
        assert!((summary.top5_pct - 83.0).abs() < 1e-9);
        assert!((summary.top10_pct - 85.0).abs() < 1e-9);
        assert!((summary.largest_holder_pct - 40.0).abs() < 1e-9);
        assert_eq!(summary.risk, ConcentrationRisk::VeryHigh);
    }
}
