use crate::scan::result::DomainResult;

/// Weighted mean over `(score, weight)` pairs. `None` when nothing carries weight.
pub(crate) fn weighted_mean(entries: impl Iterator<Item = (f64, f64)>) -> Option<f64> {
    let (total, weight_sum) = entries.fold((0.0, 0.0), |(total, weight_sum), (score, weight)| {
        (total + score * weight, weight_sum + weight)
    });

    (weight_sum > 0.0).then(|| total / weight_sum)
}

/// Unrounded overall score; domains without a score are left out entirely.
pub(crate) fn overall_exact(domains: &[DomainResult]) -> Option<f64> {
    weighted_mean(
        domains
            .iter()
            .filter_map(|domain| domain.exact_score.map(|score| (score, domain.weight))),
    )
}
