//! Forward dataflow computing the loans in scope at each node.

use cr_cfg::{Cfg, NodeId};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::debug;

use crate::{
    config::{JoinPolicy, RegionckConfig},
    facts::NodeAnnotation,
    loans::{Loan, LoanId},
    region::RegionArena,
};

/// Result of the in-scope computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InScopeLoans {
    /// Per node, indexed by node id, ascending
    pub in_scope: Vec<Vec<LoanId>>,
    /// Nodes processed before the worklist drained
    pub iterations: usize,
}

/// Worklist solver for
/// `in(N) = { L in join(out(P)) | N in L.region }` and
/// `out(N) = (in(N) - kill(N)) + gen(N)`.
pub(crate) struct InScopeLoansComputation<'a> {
    pub cfg: &'a Cfg,
    pub config: &'a RegionckConfig,
    pub regions: &'a RegionArena,
    pub loans: &'a [Loan],
    pub annotations: &'a [NodeAnnotation],
}

impl InScopeLoansComputation<'_> {
    pub(crate) fn compute(&self) -> InScopeLoans {
        let len = self.cfg.len();
        let kills: Vec<FxHashSet<LoanId>> = self
            .cfg
            .nodes()
            .iter()
            .map(|node| self.kill_set(node.id))
            .collect();

        let mut in_sets: Vec<FxHashSet<LoanId>> = vec![FxHashSet::default(); len];
        let mut out_sets: Vec<Option<FxHashSet<LoanId>>> = vec![None; len];

        let mut worklist: VecDeque<NodeId> = self.cfg.reverse_postorder().into();
        let mut queued: FxHashSet<NodeId> = worklist.iter().copied().collect();
        let mut iterations = 0;

        while let Some(node) = worklist.pop_front() {
            queued.remove(&node);
            iterations += 1;

            let joined = self.join(node, &out_sets);
            let in_scope: FxHashSet<LoanId> = joined
                .into_iter()
                .filter(|loan| {
                    self.regions
                        .get(self.loans[loan.index()].region)
                        .is_some_and(|region| region.contains(node))
                })
                .collect();

            let mut out: FxHashSet<LoanId> = in_scope
                .difference(&kills[node.index()])
                .copied()
                .collect();
            out.extend(self.annotations[node.index()].loans().iter().copied());

            in_sets[node.index()] = in_scope;
            let changed = out_sets[node.index()].as_ref() != Some(&out);
            if changed {
                out_sets[node.index()] = Some(out);
                for &succ in self.cfg.successors(node) {
                    if queued.insert(succ) {
                        worklist.push_back(succ);
                    }
                }
            }
        }

        debug!(iterations, "computed in-scope loans");

        let in_scope = in_sets
            .into_iter()
            .map(|set| {
                let mut loans: Vec<LoanId> = set.into_iter().collect();
                loans.sort_unstable();
                loans
            })
            .collect();
        InScopeLoans {
            in_scope,
            iterations,
        }
    }

    /// Merges the `out` sets of the computed predecessors. Under
    /// intersection, predecessors not yet computed do not restrict the result.
    fn join(&self, node: NodeId, out_sets: &[Option<FxHashSet<LoanId>>]) -> FxHashSet<LoanId> {
        let mut computed = self
            .cfg
            .predecessors(node)
            .iter()
            .filter_map(|pred| out_sets[pred.index()].as_ref());

        match self.config.join_policy {
            JoinPolicy::Union => computed.flatten().copied().collect(),
            JoinPolicy::Intersection => {
                let Some(first) = computed.next() else {
                    return FxHashSet::default();
                };
                computed.fold(first.clone(), |acc, set| {
                    acc.intersection(set).copied().collect()
                })
            }
        }
    }

    /// Loans whose loaned path is built on a path shallowly written at `node`.
    fn kill_set(&self, node: NodeId) -> FxHashSet<LoanId> {
        if !self.config.kill_loans_on_overwrite {
            return FxHashSet::default();
        }
        let overwritten: Vec<_> = self.annotations[node.index()]
            .accesses()
            .iter()
            .filter(|access| access.is_shallow_write())
            .map(|access| &access.path)
            .collect();
        self.loans
            .iter()
            .filter(|loan| {
                overwritten
                    .iter()
                    .any(|path| path.is_prefix_of(&loan.loaned_path))
            })
            .map(|loan| loan.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        region::RegionVid,
        test_utils::{Built, TestFunction},
    };
    use cr_cfg::CfgNodeKind;

    /// ```c
    /// int a = 1; int b = 2; int *p = &b;   // 1
    /// if (a)                               // 2
    ///     p = &a;                          // 3
    /// else ;                               // 4
    /// *p;                                  // 5
    /// ```
    fn one_sided_borrow() -> Built {
        let mut t = TestFunction::new();
        let int = t.int();
        let int_ptr = t.ptr(int);
        let one = t.lit(1);
        let two = t.lit(2);
        let decl_a = t.local("a", int, Some(one));
        let decl_b = t.local("b", int, Some(two));
        let b = t.var("b");
        let borrow_b = t.addr_of(b);
        let decl_p = t.local("p", int_ptr, Some(borrow_b));
        let cond = t.var("a");
        let p = t.var("p");
        let a = t.var("a");
        let borrow_a = t.addr_of(a);
        let reassign = t.assign(p, borrow_a);
        let p = t.var("p");
        let deref_p = t.deref(p);
        let use_p = t.stmt(deref_p);

        let start = t.node(CfgNodeKind::Start);
        let decls = t.inst(vec![decl_a, decl_b, decl_p]);
        let branch = t.node(CfgNodeKind::If { cond });
        let then = t.inst(vec![reassign]);
        let otherwise = t.node(CfgNodeKind::Jump);
        let join = t.inst(vec![use_p]);
        let end = t.node(CfgNodeKind::End);
        t.builder
            .add_path(&[start, decls, branch, then, join, end])
            .add_path(&[branch, otherwise, join]);
        t.live_in(branch, &["a", "p"]);
        t.live_in(then, &["a"]);
        t.live_in(otherwise, &["p"]);
        t.live_in(join, &["p"]);
        t.finish()
    }

    #[test]
    fn test_union_keeps_loans_from_either_branch() {
        let built = one_sided_borrow();
        let regionck = built.check().unwrap();
        let in_scope = |node: u32| regionck.annotation(NodeId(node)).unwrap().in_scope_loans();

        assert_eq!(in_scope(2), &[LoanId(0)]);
        assert_eq!(in_scope(3), &[] as &[LoanId]);
        assert_eq!(in_scope(4), &[LoanId(0)]);
        assert_eq!(in_scope(5), &[LoanId(0), LoanId(1)]);
        assert_eq!(in_scope(6), &[] as &[LoanId]);
    }

    #[test]
    fn test_intersection_drops_one_sided_loans() {
        let built = one_sided_borrow();
        let config = RegionckConfig {
            join_policy: JoinPolicy::Intersection,
            ..RegionckConfig::default()
        };
        let regionck = built.check_with(config).unwrap();

        assert_eq!(
            regionck.annotation(NodeId(5)).unwrap().in_scope_loans(),
            &[] as &[LoanId]
        );
        assert_eq!(
            regionck.annotation(NodeId(4)).unwrap().in_scope_loans(),
            &[LoanId(0)]
        );
    }

    /// ```c
    /// void f(int *p) {
    ///     int *q = &*p;   // 1
    ///     p = 0;          // 2
    ///     *q;             // 3
    /// }
    /// ```
    fn overwritten_base() -> Built {
        let mut t = TestFunction::new();
        let int = t.int();
        let int_ptr = t.ptr(int);
        t.param("p", int_ptr);
        let p = t.var("p");
        let deref_p = t.deref(p);
        let reborrow = t.addr_of(deref_p);
        let decl_q = t.local("q", int_ptr, Some(reborrow));
        let p = t.var("p");
        let zero = t.lit(0);
        let overwrite = t.assign(p, zero);
        let q = t.var("q");
        let deref_q = t.deref(q);
        let use_q = t.stmt(deref_q);

        let start = t.node(CfgNodeKind::Start);
        let first = t.inst(vec![decl_q]);
        let second = t.inst(vec![overwrite]);
        let third = t.inst(vec![use_q]);
        t.builder.add_path(&[start, first, second, third]);
        t.live_in(second, &["q"]);
        t.live_in(third, &["q"]);
        t.finish()
    }

    #[test]
    fn test_overwrite_kills_reborrow() {
        let built = overwritten_base();

        let regionck = built.check().unwrap();
        assert_eq!(
            regionck.annotation(NodeId(2)).unwrap().in_scope_loans(),
            &[LoanId(0)]
        );
        assert_eq!(
            regionck.annotation(NodeId(3)).unwrap().in_scope_loans(),
            &[] as &[LoanId]
        );

        let config = RegionckConfig {
            kill_loans_on_overwrite: false,
            ..RegionckConfig::default()
        };
        let regionck = built.check_with(config).unwrap();
        assert_eq!(
            regionck.annotation(NodeId(3)).unwrap().in_scope_loans(),
            &[LoanId(0)]
        );
    }

    #[test]
    fn test_recomputation_is_stable_on_cycles() {
        let mut t = TestFunction::new();
        let int = t.int();
        let int_ptr = t.ptr(int);
        let zero = t.lit(0);
        let decl_a = t.local("a", int, Some(zero));
        let a = t.var("a");
        let borrow = t.addr_of(a);
        let decl_p = t.local("p", int_ptr, Some(borrow));
        let p = t.var("p");
        let cond = t.deref(p);
        let a = t.var("a");
        let one = t.lit(1);
        let bump = t.assign(a, one);

        let start = t.node(CfgNodeKind::Start);
        let decls = t.inst(vec![decl_a, decl_p]);
        let header = t.node(CfgNodeKind::Loop { cond });
        let body = t.inst(vec![bump]);
        let end = t.node(CfgNodeKind::End);
        t.builder
            .add_path(&[start, decls, header, body, header])
            .add_edge(header, end);
        t.live_in(header, &["p"]);
        t.live_in(body, &["p"]);
        let built = t.finish();

        let mut regionck = built.check().unwrap();
        let first: Vec<Vec<LoanId>> = regionck
            .annotations()
            .iter()
            .map(|annotation| annotation.in_scope_loans().to_vec())
            .collect();
        regionck.borrow_check();
        let second: Vec<Vec<LoanId>> = regionck
            .annotations()
            .iter()
            .map(|annotation| annotation.in_scope_loans().to_vec())
            .collect();

        assert_eq!(first, second);
        assert_eq!(first[header.index()], vec![LoanId(0)]);
        assert_eq!(first[body.index()], vec![LoanId(0)]);
        assert!(first[end.index()].is_empty());
    }

    #[test]
    fn test_unreachable_nodes_stay_empty() {
        let mut t = TestFunction::new();
        let int = t.int();
        let int_ptr = t.ptr(int);
        let decl_a = t.local("a", int, None);
        let a = t.var("a");
        let borrow = t.addr_of(a);
        let decl_p = t.local("p", int_ptr, Some(borrow));
        let start = t.node(CfgNodeKind::Start);
        let orphan = t.inst(vec![decl_a, decl_p]);
        let after = t.node(CfgNodeKind::Jump);
        t.builder.add_edge(orphan, after);
        t.live_in(after, &["p"]);
        let built = t.finish();

        let regionck = built.check().unwrap();
        assert_eq!(regionck.loans().len(), 1);
        assert!(
            regionck
                .annotations()
                .iter()
                .all(|annotation| annotation.in_scope_loans().is_empty())
        );
        assert_eq!(regionck.annotation(start).unwrap().loans(), &[] as &[LoanId]);
    }

    /// ```c
    /// int a = 1; int *x = &a;   // 1
    /// *x;                       // 2
    /// int b = 2; int *x = &b;   // 3
    /// *x;                       // 4
    /// ```
    #[test]
    fn test_reused_name_keeps_first_loan_live() {
        let mut t = TestFunction::new();
        let int = t.int();
        let int_ptr = t.ptr(int);
        let one = t.lit(1);
        let decl_a = t.local("a", int, Some(one));
        let a = t.var("a");
        let borrow_a = t.addr_of(a);
        let decl_first_x = t.local("x", int_ptr, Some(borrow_a));
        let x = t.var("x");
        let deref_first_x = t.deref(x);
        let use_first_x = t.stmt(deref_first_x);
        let two = t.lit(2);
        let decl_b = t.local("b", int, Some(two));
        let b = t.var("b");
        let borrow_b = t.addr_of(b);
        let decl_second_x = t.local("x", int_ptr, Some(borrow_b));
        let x = t.var("x");
        let deref_second_x = t.deref(x);
        let use_second_x = t.stmt(deref_second_x);

        let start = t.node(CfgNodeKind::Start);
        let first = t.inst(vec![decl_a, decl_first_x]);
        let second = t.inst(vec![use_first_x]);
        let third = t.inst(vec![decl_b, decl_second_x]);
        let fourth = t.inst(vec![use_second_x]);
        t.builder.add_path(&[start, first, second, third, fourth]);
        t.live_in(second, &["x"]);
        t.live_in(fourth, &["x"]);
        let built = t.finish();

        let regionck = built.check().unwrap();
        let in_scope = |node: NodeId| regionck.annotation(node).unwrap().in_scope_loans();

        assert!(regionck.regions()[RegionVid(1)].contains(second));
        assert_eq!(in_scope(second), &[LoanId(0)]);
        assert_eq!(in_scope(fourth), &[LoanId(1)]);
    }
}
