use std::collections::VecDeque;

use chrono::Datelike;
use gedcompare_gedcom::{Criteria, GedcomTree};

use crate::cancel::CancellationToken;
use crate::config::CompareConfig;
use crate::error::CompareError;
use crate::graph::PersonGraph;
use crate::ledger::DedupLedger;
use crate::matcher::{quick_match, score};
use crate::model::{
    CandidatePair, CompareMeta, CompareResult, PairReport, PersonFields, ReportLine, StopReason,
};
use crate::report::ReportAggregator;

/// Pairs scoring below this many tenths are non-matches and are not expanded.
/// Pairs that exited scoring early are non-matches regardless.
pub const EXPANSION_THRESHOLD_TENTHS: u8 = 2;

const NOT_AN_INDIVIDUAL: &str = "(not an individual)";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub name: Option<String>,
    /// `None` leaves traversal depth unbounded.
    pub max_separation: Option<u32>,
    /// Expand spouses and children as well as parents.
    pub include_relatives: bool,
    pub output_all: bool,
    pub max_pairs: Option<usize>,
    /// Year used to decide whether someone is presumed dead in identity lines.
    pub reference_year: i32,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            name: None,
            max_separation: None,
            include_relatives: false,
            output_all: false,
            max_pairs: None,
            reference_year: chrono::Local::now().year(),
        }
    }
}

impl CompareOptions {
    pub fn from_config(config: &CompareConfig) -> Self {
        Self {
            name: config.name.clone(),
            max_separation: config.scope.max_separation,
            include_relatives: config.scope.include_relatives,
            output_all: config.output.all,
            max_pairs: config.scope.max_pairs,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Run a comparison per config over two already parsed trees.
pub fn run(
    config: &CompareConfig,
    left: &GedcomTree,
    right: &GedcomTree,
) -> Result<CompareResult, CompareError> {
    let criteria = config.criteria()?;
    compare(left, right, &criteria, CompareOptions::from_config(config), None)
}

/// Locate the anchor pair and traverse both graphs from it.
pub fn compare<G: PersonGraph>(
    left: &G,
    right: &G,
    criteria: &Criteria,
    options: CompareOptions,
    cancel: Option<CancellationToken>,
) -> Result<CompareResult, CompareError> {
    let anchor = resolve_anchors(left, right, criteria)?;
    let mut traversal = Traversal::new(left, right, anchor, options);
    if let Some(token) = cancel {
        traversal = traversal.with_cancellation(token);
    }
    Ok(traversal.run())
}

/// First person matching `criteria` in each graph.
///
/// Fails before any traversal when either graph has no match, naming the
/// graph(s) that failed.
pub fn resolve_anchors<G: PersonGraph>(
    left: &G,
    right: &G,
    criteria: &Criteria,
) -> Result<(G::Handle, G::Handle), CompareError> {
    match (left.find_first(criteria), right.find_first(criteria)) {
        (Some(l), Some(r)) => Ok((l, r)),
        (l, r) => {
            tracing::warn!(
                left_found = l.is_some(),
                right_found = r.is_some(),
                "anchor lookup failed"
            );
            Err(CompareError::AnchorNotFound {
                left: l.is_none(),
                right: r.is_none(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// Breadth-first walk over both graphs in lockstep, starting at the anchor pair.
///
/// Owns all run state: the FIFO queue, the dedup ledger and the report
/// aggregator. Nothing outlives the call to [`Traversal::run`] except the
/// returned result.
pub struct Traversal<'g, G: PersonGraph> {
    left: &'g G,
    right: &'g G,
    options: CompareOptions,
    anchor: String,
    queue: VecDeque<CandidatePair<G::Handle>>,
    ledger: DedupLedger<G::Handle>,
    report: ReportAggregator,
    cancel: Option<CancellationToken>,
    stop_reason: Option<StopReason>,
}

impl<'g, G: PersonGraph> Traversal<'g, G> {
    pub fn new(
        left: &'g G,
        right: &'g G,
        anchor: (G::Handle, G::Handle),
        options: CompareOptions,
    ) -> Self {
        let seed = CandidatePair {
            left: anchor.0,
            right: anchor.1,
            separation: 0,
        };
        let mut ledger = DedupLedger::new();
        ledger.admit(seed.key());

        let anchor_identity = identity_of(left.person(anchor.0).as_ref(), options.reference_year);
        let report = ReportAggregator::new(options.output_all);

        Self {
            left,
            right,
            options,
            anchor: anchor_identity,
            queue: VecDeque::from([seed]),
            ledger,
            report,
            cancel: None,
            stop_reason: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn ledger(&self) -> &DedupLedger<G::Handle> {
        &self.ledger
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Process pairs until the queue drains or a stop is requested.
    pub fn run(mut self) -> CompareResult {
        tracing::info!(anchor = %self.anchor, "starting traversal");
        while !self.queue.is_empty() {
            if let Some(reason) = self.stop_requested() {
                tracing::warn!(
                    %reason,
                    pending = self.queue.len(),
                    "stopping before queue exhausted"
                );
                self.stop_reason = Some(reason);
                break;
            }
            self.step();
        }
        self.finish()
    }

    /// Process the pair at the head of the queue and return its separation.
    /// `None` when the queue is empty.
    pub fn step(&mut self) -> Option<u32> {
        let pair = self.queue.pop_front()?;
        let separation = pair.separation;
        self.process(pair);
        Some(separation)
    }

    /// Separations of the pairs still queued, in dequeue order.
    pub fn queued_separations(&self) -> impl Iterator<Item = u32> + '_ {
        self.queue.iter().map(|pair| pair.separation)
    }

    pub fn finish(self) -> CompareResult {
        let (summary, pairs) = self.report.finish();
        CompareResult {
            meta: CompareMeta {
                name: self.options.name,
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
            },
            anchor: self.anchor,
            summary,
            pairs,
            stop_reason: self.stop_reason,
        }
    }

    fn stop_requested(&self) -> Option<StopReason> {
        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Some(StopReason::Cancelled);
        }
        match self.options.max_pairs {
            Some(limit) if self.report.stats().pairs_checked >= limit => {
                Some(StopReason::PairLimit)
            }
            _ => None,
        }
    }

    fn process(&mut self, pair: CandidatePair<G::Handle>) {
        self.ledger.check(pair.key());

        let year = self.options.reference_year;
        let left = self.left.person(pair.left);
        let right = self.right.person(pair.right);
        let identity = identity_of(left.as_ref(), year);
        let counterpart = identity_of(right.as_ref(), year);
        tracing::info!(
            left = %identity,
            right = %counterpart,
            separation = pair.separation,
            "comparing"
        );

        let result = score(left.as_ref(), right.as_ref());
        let mut lines: Vec<ReportLine> = result
            .mismatches
            .iter()
            .cloned()
            .map(ReportLine::Mismatch)
            .collect();
        if result.is_perfect() {
            lines.push(ReportLine::PerfectMatch);
        }

        let non_match = !result.is_expandable(EXPANSION_THRESHOLD_TENTHS);
        if non_match {
            tracing::debug!(
                confidence = result.confidence(),
                early_exit = result.early_exit,
                "insufficient confidence in match, skipping relatives"
            );
        } else {
            if self.options.include_relatives {
                self.expand_spouses(&pair, &mut lines);
            }
            self.expand_parents(&pair, &mut lines);
            if self.options.include_relatives {
                self.expand_children(&pair, &mut lines);
            }
        }

        self.report.record(
            PairReport {
                identity,
                counterpart,
                separation: pair.separation,
                confidence: result.confidence(),
                perfect: result.is_perfect(),
                lines,
            },
            non_match,
        );
    }

    fn expand_spouses(&mut self, pair: &CandidatePair<G::Handle>, lines: &mut Vec<ReportLine>) {
        tracing::debug!("checking spouses");
        let ours = self.left.spouses(pair.left);
        let theirs = self.right.spouses(pair.right);
        let outcome = self.match_category("spouse", &ours, &theirs, pair.separation + 1);
        lines.extend(
            outcome
                .unmatched_left
                .into_iter()
                .map(|person| ReportLine::UnmatchedSpouse { person }),
        );

        let left_marriages = self.left.marriages(pair.left).len();
        let right_marriages = self.right.marriages(pair.right).len();
        if left_marriages != ours.len() || right_marriages != ours.len() {
            lines.push(ReportLine::SpouseMarriageCount {
                spouses: ours.len(),
                left_marriages,
                right_marriages,
            });
        }
        if ours.is_empty() {
            lines.push(ReportLine::NoSpouses);
        }
    }

    fn expand_parents(&mut self, pair: &CandidatePair<G::Handle>, lines: &mut Vec<ReportLine>) {
        tracing::debug!("checking parents");
        let ours = self.left.parents(pair.left);
        let theirs = self.right.parents(pair.right);
        let outcome = self.match_category("parent", &ours, &theirs, pair.separation + 1);
        lines.extend(
            outcome
                .unmatched_left
                .into_iter()
                .map(|person| ReportLine::UnmatchedParent { person }),
        );
        // Tree-2 parents are the only counterparts reported when unmatched.
        let year = self.options.reference_year;
        for (&handle, matched) in theirs.iter().zip(outcome.right_matched) {
            if let (false, Some(parent)) = (matched, self.right.person(handle)) {
                lines.push(ReportLine::UnmatchedCounterpartParent {
                    person: parent.identity(year),
                });
            }
        }

        match ours.len() {
            0 => lines.push(ReportLine::NoParents),
            1 => lines.push(ReportLine::MissingOneParent),
            _ => {}
        }
    }

    fn expand_children(&mut self, pair: &CandidatePair<G::Handle>, lines: &mut Vec<ReportLine>) {
        tracing::debug!("checking children");
        let ours = self.left.children(pair.left);
        let theirs = self.right.children(pair.right);
        let outcome = self.match_category("child", &ours, &theirs, pair.separation + 1);
        lines.extend(
            outcome
                .unmatched_left
                .into_iter()
                .map(|person| ReportLine::UnmatchedChild { person }),
        );
        if ours.is_empty() {
            lines.push(ReportLine::NoChildren);
        }
    }

    /// Pre-filter the cross product of one relationship category and try to
    /// admit every passing pair at `separation`. Non-person handles are never
    /// marked matched.
    fn match_category(
        &mut self,
        category: &'static str,
        ours: &[G::Handle],
        theirs: &[G::Handle],
        separation: u32,
    ) -> CategoryOutcome {
        let year = self.options.reference_year;
        let ours: Vec<_> = ours.iter().map(|&h| (h, self.left.person(h))).collect();
        let theirs: Vec<_> = theirs.iter().map(|&h| (h, self.right.person(h))).collect();
        let mut outcome = CategoryOutcome {
            unmatched_left: Vec::new(),
            right_matched: vec![false; theirs.len()],
        };

        for (lh, lf) in &ours {
            let Some(lf) = lf else { continue };
            let mut found = false;
            for (i, (rh, rf)) in theirs.iter().enumerate() {
                let Some(rf) = rf else { continue };
                if !quick_match(lf, rf) {
                    continue;
                }
                found = true;
                outcome.right_matched[i] = true;
                self.admit(
                    CandidatePair {
                        left: *lh,
                        right: *rh,
                        separation,
                    },
                    category,
                );
            }
            if !found {
                outcome.unmatched_left.push(lf.identity(year));
            }
        }
        outcome
    }

    fn admit(&mut self, pair: CandidatePair<G::Handle>, category: &'static str) -> bool {
        if let Some(max) = self.options.max_separation {
            if pair.separation > max {
                tracing::debug!(
                    category,
                    left = ?pair.left,
                    right = ?pair.right,
                    separation = pair.separation,
                    "beyond max separation"
                );
                return false;
            }
        }
        if self.ledger.admit(pair.key()) {
            tracing::info!(
                category,
                left = ?pair.left,
                right = ?pair.right,
                separation = pair.separation,
                "added"
            );
            self.queue.push_back(pair);
            true
        } else {
            tracing::info!(category, left = ?pair.left, right = ?pair.right, "duplicate");
            false
        }
    }
}

#[derive(Debug)]
struct CategoryOutcome {
    unmatched_left: Vec<String>,
    /// Parallel to the tree-2 handles passed in.
    right_matched: Vec<bool>,
}

fn identity_of(fields: Option<&PersonFields>, reference_year: i32) -> String {
    fields
        .map(|p| p.identity(reference_year))
        .unwrap_or_else(|| NOT_AN_INDIVIDUAL.to_string())
}
