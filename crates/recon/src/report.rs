use std::fmt::Write;

use crate::model::{CompareResult, PairReport, RunStatistics};

/// Collects pair fragments and run counters as the traversal processes pairs.
#[derive(Debug, Default)]
pub struct ReportAggregator {
    output_all: bool,
    stats: RunStatistics,
    emitted: Vec<PairReport>,
}

impl ReportAggregator {
    pub fn new(output_all: bool) -> Self {
        Self {
            output_all,
            ..Self::default()
        }
    }

    /// Count `report` and keep it if it has issues (or when emitting all).
    ///
    /// `non_match` marks a pair whose confidence fell below the expansion
    /// threshold.
    pub fn record(&mut self, report: PairReport, non_match: bool) {
        let stats = &mut self.stats;
        stats.pairs_checked += 1;
        if report.perfect {
            stats.perfect_matches += 1;
        }
        if non_match {
            stats.non_matches += 1;
        }
        stats.partial_matches = stats.pairs_checked - stats.perfect_matches - stats.non_matches;
        stats.max_separation = stats.max_separation.max(report.separation);

        let has_issues = report.has_issues();
        if has_issues {
            stats.with_issues += 1;
        }
        if has_issues || self.output_all {
            self.emitted.push(report);
        }
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    pub fn finish(self) -> (RunStatistics, Vec<PairReport>) {
        (self.stats, self.emitted)
    }
}

/// Line-oriented report: anchor, each emitted fragment, then the summary.
pub fn render_text(result: &CompareResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Starting with: {}", result.anchor);
    out.push('\n');

    for pair in &result.pairs {
        out.push_str(&pair.render());
        out.push('\n');
    }

    if let Some(reason) = result.stop_reason {
        let _ = writeln!(out, "Comparison stopped early: {reason}");
    } else {
        out.push_str("All tree checks completed.\n");
    }

    let s = &result.summary;
    let _ = writeln!(out, "  -- Individuals checked: {}", s.pairs_checked);
    let _ = writeln!(out, "      -- Perfect Matches: {}", s.perfect_matches);
    let _ = writeln!(out, "      -- Partial Matches: {}", s.partial_matches);
    let _ = writeln!(out, "      -- Non Matches:     {}", s.non_matches);
    let _ = writeln!(out, "      -- Max Separation:  {}", s.max_separation);
    let _ = writeln!(out, "      -- With Issues:     {}", s.with_issues);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompareMeta, Mismatch, MismatchField, ReportLine, StopReason};

    fn report(separation: u32, perfect: bool, lines: Vec<ReportLine>) -> PairReport {
        PairReport {
            identity: format!("Person {separation} (1900-?)"),
            counterpart: format!("Person {separation} (1900-?)"),
            separation,
            confidence: if perfect { 1.0 } else { 0.8 },
            perfect,
            lines,
        }
    }

    fn gender_mismatch() -> ReportLine {
        ReportLine::Mismatch(Mismatch {
            field: MismatchField::Gender,
            left: "M".into(),
            right: "F".into(),
        })
    }

    #[test]
    fn counts_every_pair_but_emits_only_issues() {
        let mut agg = ReportAggregator::new(false);
        agg.record(report(0, true, vec![ReportLine::PerfectMatch, ReportLine::NoParents]), false);
        agg.record(report(1, false, vec![gender_mismatch()]), false);
        agg.record(report(2, false, vec![]), true);

        let (stats, emitted) = agg.finish();
        assert_eq!(stats.pairs_checked, 3);
        assert_eq!(stats.perfect_matches, 1);
        assert_eq!(stats.partial_matches, 1);
        assert_eq!(stats.non_matches, 1);
        assert_eq!(stats.max_separation, 2);
        assert_eq!(stats.with_issues, 1);
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].separation, 1);
    }

    #[test]
    fn output_all_keeps_clean_fragments() {
        let mut agg = ReportAggregator::new(true);
        agg.record(report(0, true, vec![ReportLine::PerfectMatch]), false);
        assert_eq!(agg.stats().with_issues, 0);
        let (_, emitted) = agg.finish();
        assert_eq!(emitted.len(), 1);
    }

    #[test]
    fn render_text_layout() {
        let mut agg = ReportAggregator::new(false);
        agg.record(report(1, false, vec![gender_mismatch()]), false);
        let (summary, pairs) = agg.finish();
        let result = CompareResult {
            meta: CompareMeta {
                name: None,
                engine_version: "0.0.0".into(),
                run_at: "2026-01-01T00:00:00+00:00".into(),
            },
            anchor: "Jane Doe (1980-)".into(),
            summary,
            pairs,
            stop_reason: None,
        };

        let text = render_text(&result);
        assert!(text.starts_with("Starting with: Jane Doe (1980-)\n"));
        assert!(text.contains(
            "Person 1 (1900-?) : Degree of Separation=1\n - GENDER MIS-MATCH : M vs F\n"
        ));
        assert!(text.contains("All tree checks completed."));
        assert!(text.contains("  -- Individuals checked: 1\n"));
        assert!(text.contains("      -- Partial Matches: 1\n"));
        assert!(text.ends_with("      -- With Issues:     1\n"));

        let stopped = CompareResult {
            stop_reason: Some(StopReason::PairLimit),
            ..result
        };
        assert!(render_text(&stopped).contains("Comparison stopped early: pair limit reached"));
    }
}
